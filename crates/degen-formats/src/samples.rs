//! Sampled protein outputs: plain text (one protein per line) and FASTA.

use std::collections::BTreeMap;

use degen_core::{AMINO_ACIDS, STOP};

use crate::ParseError;

/// One protein per line.
pub fn serialize(samples: &[String]) -> String {
    let mut out = String::with_capacity(samples.iter().map(|s| s.len() + 1).sum());
    for sample in samples {
        out.push_str(sample);
        out.push('\n');
    }
    out
}

/// Read proteins written by [`serialize`]. Blank lines are empty proteins.
pub fn parse(input: &str) -> Result<Vec<String>, ParseError> {
    input
        .lines()
        .enumerate()
        .map(|(number, line)| {
            let protein = line.trim_end();
            match protein.chars().find(|&c| c != STOP && !AMINO_ACIDS.contains(c)) {
                Some(c) => Err(ParseError::InvalidFormat(format!(
                    "line {}: unexpected residue '{}'",
                    number + 1,
                    c
                ))),
                None => Ok(protein.to_string()),
            }
        })
        .collect()
}

/// FASTA records named `<prefix>_1`, `<prefix>_2`, ... wrapped at 80 columns.
pub fn serialize_fasta(prefix: &str, samples: &[String]) -> String {
    let mut out = String::new();

    for (i, sample) in samples.iter().enumerate() {
        out.push('>');
        out.push_str(prefix);
        out.push('_');
        out.push_str(&(i + 1).to_string());
        out.push('\n');

        for chunk in sample.as_bytes().chunks(80) {
            out.push_str(&String::from_utf8_lossy(chunk));
            out.push('\n');
        }
    }

    out
}

/// Occurrences of each distinct protein.
pub fn tally(samples: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for sample in samples {
        *counts.entry(sample.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proteins(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_roundtrip() {
        let samples = proteins(&["MKW", "L*Q", ""]);
        let text = serialize(&samples);
        assert_eq!(text, "MKW\nL*Q\n\n");
        assert_eq!(parse(&text).unwrap(), samples);
    }

    #[test]
    fn test_parse_rejects_unknown_residue() {
        assert!(matches!(parse("MKW\nMXW\n"), Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_fasta() {
        let long = "A".repeat(100);
        let fasta = serialize_fasta("nnk", &proteins(&["MK", &long]));
        let lines: Vec<&str> = fasta.lines().collect();
        assert_eq!(lines[0], ">nnk_1");
        assert_eq!(lines[1], "MK");
        assert_eq!(lines[2], ">nnk_2");
        assert_eq!(lines[3].len(), 80);
        assert_eq!(lines[4].len(), 20);
    }

    #[test]
    fn test_tally() {
        let counts = tally(&proteins(&["MK", "LL", "MK"]));
        assert_eq!(counts["MK"], 2);
        assert_eq!(counts["LL"], 1);
        assert_eq!(counts.len(), 2);
    }
}
