use num_bigint::BigUint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DegenError {
    #[error("Unknown nucleotide symbol: '{0}'")]
    UnknownSymbol(char),
    #[error("Cannot define symbol '{symbol}': {reason}")]
    InvalidSymbolDefinition { symbol: char, reason: &'static str },
    #[error("Unsupported genetic code table: {0}")]
    InvalidTableId(u32),
    #[error("Invalid codon: {0}")]
    InvalidCodon(String),
    #[error("Codon is not fully unambiguous: {0}")]
    AmbiguousCodon(String),
    #[error("Sample count must be non-negative, got {0}")]
    InvalidSampleCount(i64),
    #[error("Diversity {diversity} exceeds the exact enumeration limit of {limit}")]
    DiversityTooLarge { diversity: BigUint, limit: u64 },
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DegenError>;
