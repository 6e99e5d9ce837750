//! Library-level statistics over the protein ensemble of a template.
//!
//! Every window contributes an independent output distribution, so
//! protein-level quantities factor over positions. Counts that grow with
//! template length are kept as [`BigUint`]; ratios between them go through
//! logarithms so they stay finite for long templates.

use std::collections::BTreeMap;
use std::f64::consts::LN_2;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// Shannon entropy in bits. Zero-probability terms are skipped.
pub fn shannon_entropy<I: IntoIterator<Item = f64>>(probabilities: I) -> f64 {
    probabilities
        .into_iter()
        .filter(|&p| p > 0.0)
        .map(|p| p * (1.0 / p).log2())
        .sum()
}

/// Natural log of an arbitrarily large integer. `ln(0)` is `-inf`.
pub(crate) fn big_ln(x: &BigUint) -> f64 {
    let bits = x.bits();
    if bits <= 1000 {
        return x.to_f64().map_or(f64::INFINITY, f64::ln);
    }
    let shift = bits - 64;
    let head = (x >> shift).to_f64().unwrap_or(f64::INFINITY);
    head.ln() + shift as f64 * LN_2
}

/// `a / b` as a float, for operands that may not fit in an `f64`.
fn big_ratio(a: &BigUint, b: &BigUint) -> f64 {
    if a.is_zero() {
        return 0.0;
    }
    (big_ln(a) - big_ln(b)).exp()
}

/// One row of the degeneracy table: all proteins encoded by exactly
/// `degeneracy` DNA sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegeneracyRow {
    pub degeneracy: BigUint,
    /// Distinct proteins in this group.
    pub proteins: BigUint,
    /// DNA sequences in this group, `degeneracy * proteins`.
    pub oligonucleotides: BigUint,
    /// Cumulative fraction of DNA sequences up to and including this row.
    pub dna_quantile: f64,
    /// Cumulative fraction of distinct proteins up to and including this row.
    pub protein_quantile: f64,
}

/// Degeneracy analysis of a template's protein ensemble.
#[derive(Debug, Clone)]
pub struct LibraryStats {
    // per position: output symbol -> number of codons encoding it
    counts: Vec<BTreeMap<char, u32>>,
}

impl LibraryStats {
    pub fn from_outcome_counts(counts: Vec<BTreeMap<char, u32>>) -> Self {
        LibraryStats { counts }
    }

    pub fn positions(&self) -> usize {
        self.counts.len()
    }

    /// Number of distinct DNA sequences (translated windows only).
    pub fn dna_diversity(&self) -> BigUint {
        self.counts
            .iter()
            .map(|c| BigUint::from(c.values().sum::<u32>()))
            .product()
    }

    /// Number of distinct protein strings.
    pub fn protein_diversity(&self) -> BigUint {
        self.counts.iter().map(|c| BigUint::from(c.len())).product()
    }

    /// Per position: codons-per-output -> number of outputs with that many codons.
    ///
    /// `NNK` under amber suppression gives `{1: 11, 2: 6, 3: 3}`.
    pub fn amino_acid_degeneracy_profile(&self) -> Vec<BTreeMap<u32, u32>> {
        self.counts
            .iter()
            .map(|position| {
                let mut profile = BTreeMap::new();
                for &count in position.values() {
                    *profile.entry(count).or_insert(0) += 1;
                }
                profile
            })
            .collect()
    }

    /// Degeneracy -> number of distinct proteins with that degeneracy.
    pub fn protein_degeneracy_table(&self) -> BTreeMap<BigUint, BigUint> {
        let mut table = BTreeMap::from([(BigUint::one(), BigUint::one())]);
        for profile in self.amino_acid_degeneracy_profile() {
            let mut next: BTreeMap<BigUint, BigUint> = BTreeMap::new();
            for (degeneracy, proteins) in &table {
                for (&codons, &outputs) in &profile {
                    *next.entry(degeneracy * codons).or_default() += proteins * outputs;
                }
            }
            table = next;
        }
        table
    }

    /// Degeneracy groups in ascending order with cumulative quantiles.
    pub fn degeneracy_table(&self) -> Vec<DegeneracyRow> {
        let groups = self.protein_degeneracy_table();
        let total_dna = self.dna_diversity();
        let total_proteins = self.protein_diversity();

        let mut dna_so_far = BigUint::zero();
        let mut proteins_so_far = BigUint::zero();
        groups
            .into_iter()
            .map(|(degeneracy, proteins)| {
                let oligonucleotides = &degeneracy * &proteins;
                dna_so_far += &oligonucleotides;
                proteins_so_far += &proteins;
                DegeneracyRow {
                    dna_quantile: big_ratio(&dna_so_far, &total_dna),
                    protein_quantile: big_ratio(&proteins_so_far, &total_proteins),
                    degeneracy,
                    proteins,
                    oligonucleotides,
                }
            })
            .collect()
    }

    /// Gini coefficient of protein abundance: 0 when every protein is
    /// encoded equally often, approaching 1 as abundance concentrates.
    pub fn gini_index(&self) -> f64 {
        let mut area = 0.0;
        let (mut x, mut y) = (0.0, 0.0);
        for row in self.degeneracy_table() {
            area += (row.protein_quantile - x) * (row.dna_quantile + y) / 2.0;
            x = row.protein_quantile;
            y = row.dna_quantile;
        }
        (2.0 * (0.5 - area)).max(0.0)
    }

    /// Makowski & Soares diversity, `1 / (P * prod_i sum_j p_ij^2)`.
    ///
    /// Equals 1 when every encodable protein is equally likely.
    pub fn makowski_diversity(&self) -> f64 {
        self.counts
            .iter()
            .map(|position| {
                let total = f64::from(position.values().sum::<u32>());
                let sum_sq: f64 = position
                    .values()
                    .map(|&c| (f64::from(c) / total).powi(2))
                    .sum();
                1.0 / (position.len() as f64 * sum_sq)
            })
            .product()
    }

    /// Shannon entropy of the protein distribution in bits.
    pub fn entropy_bits(&self) -> f64 {
        self.counts
            .iter()
            .map(|position| {
                let total = f64::from(position.values().sum::<u32>());
                shannon_entropy(position.values().map(|&c| f64::from(c) / total))
            })
            .sum()
    }

    /// Shannon entropy of the protein distribution in the given log base.
    /// `base` must be greater than 1; NaN otherwise.
    pub fn library_entropy(&self, base: f64) -> f64 {
        if base.is_nan() || base <= 1.0 {
            return f64::NAN;
        }
        self.entropy_bits() / base.log2()
    }

    /// Expected fraction of distinct proteins seen at least once in
    /// `sample_size` independent draws from the library.
    pub fn expected_coverage(&self, sample_size: u64) -> f64 {
        if sample_size == 0 {
            return 0.0;
        }
        let total_dna = self.dna_diversity();
        let total_proteins = self.protein_diversity();
        let draws = sample_size as f64;

        self.protein_degeneracy_table()
            .iter()
            .map(|(degeneracy, proteins)| {
                let p = big_ratio(degeneracy, &total_dna);
                let missed = (draws * (-p).ln_1p()).exp();
                big_ratio(proteins, &total_proteins) * (1.0 - missed)
            })
            .sum()
    }

    /// Number of DNA sequences in the library encoding `protein`.
    /// Zero if the protein cannot be produced.
    pub fn protein_degeneracy(&self, protein: &str) -> BigUint {
        if protein.chars().count() != self.counts.len() {
            return BigUint::zero();
        }
        protein
            .chars()
            .zip(&self.counts)
            .map(|(output, position)| BigUint::from(position.get(&output).copied().unwrap_or(0)))
            .product()
    }

    /// Protein quantile of the degeneracy group `protein` falls in.
    /// Zero if the protein cannot be produced.
    pub fn protein_quantile(&self, protein: &str) -> f64 {
        let degeneracy = self.protein_degeneracy(protein);
        if degeneracy.is_zero() {
            return 0.0;
        }
        self.degeneracy_table()
            .into_iter()
            .find(|row| row.degeneracy == degeneracy)
            .map_or(0.0, |row| row.protein_quantile)
    }

    /// Mean number of DNA sequences per distinct protein.
    pub fn average_degeneracy(&self) -> f64 {
        big_ratio(&self.dna_diversity(), &self.protein_diversity())
    }

    /// Number of distinct degeneracies among the library's proteins.
    pub fn degeneracy_groups(&self) -> usize {
        self.protein_degeneracy_table().len()
    }

    /// Probability that a random library member translates to `protein`.
    pub fn protein_probability(&self, protein: &str) -> f64 {
        big_ratio(&self.protein_degeneracy(protein), &self.dna_diversity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::codon::GeneticCode;
    use crate::oligo::Oligonucleotide;

    fn library(template: &str, code: GeneticCode) -> LibraryStats {
        Oligonucleotide::new(template, Arc::new(code)).unwrap().stats()
    }

    #[test]
    fn test_shannon_entropy() {
        assert_eq!(shannon_entropy([1.0]), 0.0);
        assert!((shannon_entropy([0.5, 0.5]) - 1.0).abs() < 1e-12);
        assert!((shannon_entropy([0.25; 4]) - 2.0).abs() < 1e-12);
        assert!((shannon_entropy([0.5, 0.5, 0.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_big_ln_large_values() {
        let x = BigUint::from(2u32).pow(5000);
        assert!((big_ln(&x) - 5000.0 * LN_2).abs() < 1e-6);
        assert!((big_ln(&BigUint::from(1000u32)) - 1000f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_nnk_degeneracy_profile() {
        let stats = library("NNK", GeneticCode::supe());
        let profile = stats.amino_acid_degeneracy_profile();
        assert_eq!(profile.len(), 1);
        assert_eq!(profile[0], BTreeMap::from([(1, 11), (2, 6), (3, 3)]));
    }

    #[test]
    fn test_nnk2_protein_degeneracy_table() {
        let stats = library("NNKNNK", GeneticCode::supe());
        let table: BTreeMap<u32, u32> = stats
            .protein_degeneracy_table()
            .into_iter()
            .map(|(d, n)| (d.to_u32().unwrap(), n.to_u32().unwrap()))
            .collect();
        let expected = BTreeMap::from([(1, 121), (2, 132), (3, 66), (4, 36), (6, 36), (9, 9)]);
        assert_eq!(table, expected);
        assert_eq!(stats.protein_diversity(), BigUint::from(400u32));
        assert_eq!(stats.dna_diversity(), BigUint::from(1024u32));
    }

    #[test]
    fn test_degeneracy_table_totals() {
        let stats = library("NNKNNKGCC", GeneticCode::supe());
        let rows = stats.degeneracy_table();
        let dna: BigUint = rows.iter().map(|r| r.oligonucleotides.clone()).sum();
        let proteins: BigUint = rows.iter().map(|r| r.proteins.clone()).sum();
        assert_eq!(dna, stats.dna_diversity());
        assert_eq!(proteins, stats.protein_diversity());
        let last = rows.last().unwrap();
        assert!((last.dna_quantile - 1.0).abs() < 1e-12);
        assert!((last.protein_quantile - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_gini_index() {
        // every protein encoded exactly once
        assert!(library("ATGAAA", GeneticCode::standard()).gini_index().abs() < 1e-12);
        assert!(library("NNK", GeneticCode::standard()).gini_index() > 0.0);
        assert!(library("NNK", GeneticCode::standard()).gini_index() < 1.0);
    }

    #[test]
    fn test_makowski_diversity() {
        assert!((library("AAA", GeneticCode::standard()).makowski_diversity() - 1.0).abs() < 1e-12);
        // TTN: F x2, L x2, evenly split
        assert!((library("TTN", GeneticCode::standard()).makowski_diversity() - 1.0).abs() < 1e-12);
        let nnk = library("NNK", GeneticCode::supe()).makowski_diversity();
        // sum p^2 = (11 + 6*4 + 3*9) / 32^2 = 62 / 1024
        assert!((nnk - 1024.0 / (20.0 * 62.0)).abs() < 1e-12);
    }

    #[test]
    fn test_library_entropy() {
        let stats = library("TTNTTN", GeneticCode::standard());
        assert!((stats.entropy_bits() - 2.0).abs() < 1e-12);
        assert!((stats.library_entropy(4.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_expected_coverage() {
        let stats = library("NNK", GeneticCode::supe());
        assert_eq!(stats.expected_coverage(0), 0.0);
        let small = stats.expected_coverage(10);
        let large = stats.expected_coverage(1000);
        assert!(small > 0.0 && small < large);
        assert!((large - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_expected_coverage_single_protein() {
        for template in ["ATG", ""] {
            let stats = library(template, GeneticCode::standard());
            assert_eq!(stats.expected_coverage(0), 0.0, "{template:?}");
            assert_eq!(stats.expected_coverage(1), 1.0, "{template:?}");
        }
    }

    #[test]
    fn test_library_entropy_rejects_small_base() {
        let stats = library("NNK", GeneticCode::supe());
        assert!(stats.library_entropy(1.0).is_nan());
        assert!(stats.library_entropy(0.5).is_nan());
        assert!((stats.library_entropy(2.0) - stats.entropy_bits()).abs() < 1e-12);
    }

    #[test]
    fn test_protein_quantile() {
        let stats = library("NNKNNK", GeneticCode::supe());
        let rows = stats.degeneracy_table();
        // degeneracy 1 is the first group, 9 the last
        assert!((stats.protein_quantile("MW") - rows[0].protein_quantile).abs() < 1e-12);
        assert!((stats.protein_quantile("MW") - 121.0 / 400.0).abs() < 1e-12);
        assert!((stats.protein_quantile("LL") - 1.0).abs() < 1e-12);
        assert_eq!(stats.protein_quantile("M*"), 0.0);
        assert_eq!(stats.protein_quantile("M"), 0.0);
    }

    #[test]
    fn test_summary_figures() {
        let stats = library("NNKNNK", GeneticCode::supe());
        assert!((stats.average_degeneracy() - 1024.0 / 400.0).abs() < 1e-12);
        assert_eq!(stats.degeneracy_groups(), 6);
        let single = library("ATG", GeneticCode::standard());
        assert!((single.average_degeneracy() - 1.0).abs() < 1e-12);
        assert_eq!(single.degeneracy_groups(), 1);
    }

    #[test]
    fn test_protein_degeneracy() {
        let stats = library("NNKNNK", GeneticCode::supe());
        assert_eq!(stats.protein_degeneracy("LL"), BigUint::from(9u32));
        assert_eq!(stats.protein_degeneracy("MW"), BigUint::from(1u32));
        assert_eq!(stats.protein_degeneracy("M"), BigUint::zero());
        assert_eq!(stats.protein_degeneracy("M*"), BigUint::zero());
        assert!((stats.protein_probability("LL") - 9.0 / 1024.0).abs() < 1e-12);
    }
}
