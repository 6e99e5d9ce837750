use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Diversity above which exact enumeration is refused.
pub const DEFAULT_ENUMERATION_LIMIT: u64 = 1_000_000;

/// Engine policy knobs supplied by the surrounding tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest theoretical diversity `enumerate_exact` will accept.
    pub enumeration_limit: u64,
    /// Seed for reproducible sampling; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enumeration_limit: DEFAULT_ENUMERATION_LIMIT,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_enumeration_limit(mut self, limit: u64) -> Self {
        self.enumeration_limit = limit;
        self
    }

    /// Random source for sampling, seeded from `seed` when set.
    pub fn rng(&self) -> Xoshiro256PlusPlus {
        match self.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_seed(rand::rng().random()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DegenError;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.enumeration_limit, 1_000_000);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"seed": 42}"#).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.enumeration_limit, DEFAULT_ENUMERATION_LIMIT);

        let config = EngineConfig::from_json(r#"{"enumeration_limit": 10}"#).unwrap();
        assert_eq!(config.enumeration_limit, 10);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"enumeration_limit": -1}"#),
            Err(DegenError::Config(_))
        ));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = EngineConfig::default().with_seed(9);
        let a: Vec<u64> = (0..4).map(|_| config.rng().random()).collect();
        let mut rng = config.rng();
        let b: u64 = rng.random();
        assert_eq!(a[0], b);
        assert!(a.iter().all(|&x| x == a[0]));
    }
}
