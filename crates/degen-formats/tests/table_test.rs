use std::sync::Arc;

use degen_core::{EngineConfig, Oligonucleotide};
use degen_formats::{samples, table};
use pretty_assertions::assert_eq;

const SUPPRESSOR: &str = include_str!("fixtures/suppressor.tsv");

#[test]
fn test_parse_suppressor_rows() {
    let rows = table::parse_rows(SUPPRESSOR).unwrap();
    let pairs: Vec<(String, char)> = rows.into_iter().map(|r| (r.codon, r.output)).collect();
    assert_eq!(
        pairs,
        vec![
            ("TAG".to_string(), 'Q'),
            ("TGA".to_string(), 'W'),
            ("TAA".to_string(), '*'),
        ]
    );
}

#[test]
fn test_suppressor_code() {
    let code = table::parse(11, SUPPRESSOR).unwrap();
    assert_eq!(code.id(), 11);
    assert_eq!(code.translate("TAG").unwrap(), 'Q');
    assert_eq!(code.translate("TGA").unwrap(), 'W');
    assert_eq!(code.stop_codons().len(), 1);
}

#[test]
fn test_table_roundtrip() {
    let code = table::parse(11, SUPPRESSOR).unwrap();
    let reparsed = table::parse(1, &table::serialize(&code)).unwrap();
    let original: Vec<_> = code.codons().collect();
    let restored: Vec<_> = reparsed.codons().collect();
    assert_eq!(original, restored);
}

#[test]
fn test_sample_pipeline() {
    let code = Arc::new(table::parse(11, SUPPRESSOR).unwrap());
    let oligo = Oligonucleotide::new("NNKNNKNNK", code).unwrap();
    let mut rng = EngineConfig::default().with_seed(5).rng();
    let drawn = oligo.samples(250, &mut rng).unwrap();

    let text = samples::serialize(&drawn);
    assert_eq!(text.lines().count(), 250);
    let restored = samples::parse(&text).unwrap();
    assert_eq!(restored, drawn);

    let counts = samples::tally(&restored);
    assert_eq!(counts.values().sum::<usize>(), 250);
    // no stop codon is reachable through NNK once TAG is suppressed
    assert!(counts.keys().all(|p| !p.contains('*')));
}
