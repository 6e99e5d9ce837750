use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use num_bigint::BigUint;
use rand::Rng;

use crate::alphabet::{BaseSet, NucleotideAlphabet};
use crate::codon::GeneticCode;
use crate::config::DEFAULT_ENUMERATION_LIMIT;
use crate::degenerate::DegenerateCodon;
use crate::error::{DegenError, Result};
use crate::stats::LibraryStats;

/// A degenerate DNA template read in frame from position 0.
///
/// The template is split into non-overlapping codon windows. Up to two
/// trailing symbols that do not fill a window are kept in the label but take
/// no part in translation or statistics.
#[derive(Debug, Clone)]
pub struct Oligonucleotide {
    symbols: Vec<char>,
    bases: Vec<BaseSet>,
    code: Arc<GeneticCode>,
}

impl Oligonucleotide {
    /// Build from an IUPAC template. Unknown symbols are rejected here.
    pub fn new(symbols: &str, code: Arc<GeneticCode>) -> Result<Self> {
        Self::with_alphabet(symbols, code, NucleotideAlphabet::iupac())
    }

    pub fn with_alphabet(
        symbols: &str,
        code: Arc<GeneticCode>,
        alphabet: &NucleotideAlphabet,
    ) -> Result<Self> {
        let (symbols, bases): (Vec<char>, Vec<BaseSet>) =
            alphabet.resolve(symbols)?.into_iter().unzip();
        let oligo = Oligonucleotide { symbols, bases, code };
        tracing::debug!(
            length = oligo.len(),
            codons = oligo.codon_count(),
            table = oligo.code.id(),
            "built oligonucleotide"
        );
        Ok(oligo)
    }

    /// Normalized template (uppercase, `U` read as `T`).
    pub fn label(&self) -> String {
        self.symbols.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn codon_count(&self) -> usize {
        self.len() / 3
    }

    /// Trailing symbols outside any codon window (0, 1 or 2).
    pub fn remainder(&self) -> usize {
        self.len() % 3
    }

    pub fn genetic_code(&self) -> &GeneticCode {
        &self.code
    }

    /// Codon windows in order.
    pub fn codons(&self) -> impl Iterator<Item = DegenerateCodon<'_>> + '_ {
        self.symbols
            .chunks_exact(3)
            .zip(self.bases.chunks_exact(3))
            .map(|(s, b)| DegenerateCodon::from_parts([s[0], s[1], s[2]], [b[0], b[1], b[2]], &self.code))
    }

    /// Label with runs of identical codons collapsed, e.g.
    /// `NNKNNKNNKAAANNK` becomes `NNK<3>AAANNK`.
    ///
    /// Trailing symbols that do not fill a codon are appended as written, so
    /// for a length that is not a multiple of 3 the result is longer than
    /// the codon-only shorthand (`NNKNNKAT` gives `NNK<2>AT`, not `NNK<2>`).
    pub fn compact_label(&self) -> String {
        let mut out = String::new();
        let mut previous: Option<String> = None;
        let mut run = 0;
        for codon in self.codons().map(|c| c.label()) {
            if previous.as_ref() == Some(&codon) {
                run += 1;
                continue;
            }
            if run > 1 {
                out.push_str(&format!("<{run}>"));
            }
            out.push_str(&codon);
            previous = Some(codon);
            run = 1;
        }
        if run > 1 {
            out.push_str(&format!("<{run}>"));
        }
        out.extend(&self.symbols[self.codon_count() * 3..]);
        out
    }

    /// Number of distinct DNA sequences over the codon windows.
    /// Remainder symbols do not contribute.
    pub fn theoretical_diversity(&self) -> BigUint {
        self.codons().map(|c| BigUint::from(c.cardinality())).product()
    }

    /// Number of distinct protein strings the template can encode.
    pub fn protein_diversity(&self) -> BigUint {
        self.codons()
            .map(|c| BigUint::from(c.outcome_counts().len()))
            .product()
    }

    pub fn amino_acid_distribution_per_position(&self) -> Vec<BTreeMap<char, f64>> {
        self.codons().map(|c| c.outcome_distribution()).collect()
    }

    /// Shannon entropy (bits) of each window's output distribution.
    pub fn entropy_per_position(&self) -> Vec<f64> {
        self.codons().map(|c| c.entropy()).collect()
    }

    /// Entropy of the whole protein distribution; positions are independent.
    pub fn entropy(&self) -> f64 {
        self.entropy_per_position().iter().sum()
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::from_outcome_counts(self.codons().map(|c| c.outcome_counts()).collect())
    }

    /// One translated protein of length `codon_count`.
    pub fn sample_protein<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.codons().map(|c| c.sample(rng)).collect()
    }

    /// One concrete DNA sequence, remainder symbols included.
    pub fn sample_dna<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.bases.iter().map(|b| b.sample(rng).as_char()).collect()
    }

    /// `n` independently sampled protein strings.
    pub fn samples<R: Rng + ?Sized>(&self, n: i64, rng: &mut R) -> Result<Vec<String>> {
        let n = usize::try_from(n).map_err(|_| DegenError::InvalidSampleCount(n))?;
        Ok((0..n).map(|_| self.sample_protein(rng)).collect())
    }

    /// Exact protein distribution, refused above the default diversity limit.
    pub fn enumerate_exact(&self) -> Result<HashMap<String, f64>> {
        self.enumerate_exact_with_limit(DEFAULT_ENUMERATION_LIMIT)
    }

    /// Exact protein distribution as the product of the per-window
    /// distributions. Fails with [`DegenError::DiversityTooLarge`] when
    /// [`theoretical_diversity`](Self::theoretical_diversity) exceeds `limit`.
    pub fn enumerate_exact_with_limit(&self, limit: u64) -> Result<HashMap<String, f64>> {
        let diversity = self.theoretical_diversity();
        if diversity > BigUint::from(limit) {
            return Err(DegenError::DiversityTooLarge { diversity, limit });
        }

        let mut proteins = HashMap::from([(String::new(), 1.0)]);
        for distribution in self.amino_acid_distribution_per_position() {
            let mut next = HashMap::with_capacity(proteins.len() * distribution.len());
            for (prefix, p) in &proteins {
                for (&output, &q) in &distribution {
                    let mut protein = String::with_capacity(prefix.len() + 1);
                    protein.push_str(prefix);
                    protein.push(output);
                    *next.entry(protein).or_insert(0.0) += p * q;
                }
            }
            proteins = next;
        }

        tracing::debug!(%diversity, proteins = proteins.len(), "enumerated protein space");
        Ok(proteins)
    }

    /// Translate a fully unambiguous template.
    pub fn translate(&self) -> Result<String> {
        self.codons()
            .map(|c| {
                let label = c.label();
                if c.is_degenerate() {
                    return Err(DegenError::AmbiguousCodon(label));
                }
                self.code.translate(&label)
            })
            .collect()
    }

    /// Reverse complement under the same genetic code. Symbols are rewritten
    /// as their IUPAC equivalents.
    pub fn reverse_complement(&self) -> Self {
        let bases: Vec<BaseSet> = self.bases.iter().rev().map(|b| b.complement()).collect();
        Oligonucleotide {
            symbols: bases.iter().map(|b| b.iupac_symbol()).collect(),
            bases,
            code: Arc::clone(&self.code),
        }
    }
}

impl fmt::Display for Oligonucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
