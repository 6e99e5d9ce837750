//! A single three-symbol window of a degenerate template.

use std::collections::BTreeMap;

use rand::Rng;

use crate::alphabet::{BaseSet, NucleotideAlphabet};
use crate::codon::{Codon, GeneticCode};
use crate::error::{DegenError, Result};
use crate::stats::shannon_entropy;

/// Three ambiguity symbols read against a genetic code.
///
/// Each concrete codon in the window's expansion is taken to be equally
/// likely, so output probabilities are codon counts over [`cardinality`].
///
/// [`cardinality`]: DegenerateCodon::cardinality
#[derive(Debug, Clone, Copy)]
pub struct DegenerateCodon<'a> {
    label: [char; 3],
    bases: [BaseSet; 3],
    code: &'a GeneticCode,
}

impl<'a> DegenerateCodon<'a> {
    pub fn new(symbols: &str, code: &'a GeneticCode) -> Result<Self> {
        Self::with_alphabet(symbols, code, NucleotideAlphabet::iupac())
    }

    pub fn with_alphabet(
        symbols: &str,
        code: &'a GeneticCode,
        alphabet: &NucleotideAlphabet,
    ) -> Result<Self> {
        let resolved = alphabet.resolve(symbols)?;
        let [(s1, b1), (s2, b2), (s3, b3)] = resolved[..] else {
            return Err(DegenError::InvalidCodon(symbols.to_string()));
        };
        Ok(Self::from_parts([s1, s2, s3], [b1, b2, b3], code))
    }

    pub(crate) fn from_parts(label: [char; 3], bases: [BaseSet; 3], code: &'a GeneticCode) -> Self {
        DegenerateCodon { label, bases, code }
    }

    pub fn label(&self) -> String {
        self.label.iter().collect()
    }

    pub fn base_sets(&self) -> [BaseSet; 3] {
        self.bases
    }

    pub fn genetic_code(&self) -> &'a GeneticCode {
        self.code
    }

    /// Number of concrete codons the window can realise, in `[1, 64]`.
    pub fn cardinality(&self) -> u32 {
        self.bases.iter().map(|b| b.len() as u32).product()
    }

    pub fn is_degenerate(&self) -> bool {
        self.cardinality() > 1
    }

    /// Concrete codons, lexicographic over A, C, G, T at each position.
    /// Calling again restarts the sequence.
    pub fn expand(&self) -> impl Iterator<Item = Codon> {
        let [first, second, third] = self.bases;
        first.iter().flat_map(move |a| {
            second
                .iter()
                .flat_map(move |b| third.iter().map(move |c| Codon::new(a, b, c)))
        })
    }

    /// Number of expanded codons per output symbol.
    pub fn outcome_counts(&self) -> BTreeMap<char, u32> {
        let mut counts = BTreeMap::new();
        for codon in self.expand() {
            *counts.entry(self.code.translate_codon(codon)).or_insert(0) += 1;
        }
        counts
    }

    /// Probability of each output symbol; values sum to 1.
    pub fn outcome_distribution(&self) -> BTreeMap<char, f64> {
        let total = f64::from(self.cardinality());
        self.outcome_counts()
            .into_iter()
            .map(|(output, count)| (output, f64::from(count) / total))
            .collect()
    }

    /// Shannon entropy (bits) of the output distribution.
    pub fn entropy(&self) -> f64 {
        shannon_entropy(self.outcome_distribution().into_values())
    }

    /// One concrete codon: an independent uniform draw per position.
    pub fn sample_unambiguous_codon<R: Rng + ?Sized>(&self, rng: &mut R) -> Codon {
        let [first, second, third] = self.bases;
        Codon::new(first.sample(rng), second.sample(rng), third.sample(rng))
    }

    /// Translated output of one sampled codon.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        self.code.translate_codon(self.sample_unambiguous_codon(rng))
    }
}
