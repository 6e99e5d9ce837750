pub mod alphabet;
pub mod codon;
pub mod config;
pub mod degenerate;
pub mod error;
pub mod oligo;
pub mod stats;

pub use alphabet::{Base, BaseSet, NucleotideAlphabet};
pub use codon::{Codon, GeneticCode, AMINO_ACIDS, STOP};
pub use config::EngineConfig;
pub use degenerate::DegenerateCodon;
pub use error::{DegenError, Result};
pub use num_bigint::BigUint;
pub use oligo::Oligonucleotide;
pub use stats::{DegeneracyRow, LibraryStats};
