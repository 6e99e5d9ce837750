use std::fmt;
use std::str::FromStr;

use crate::alphabet::{Base, NucleotideAlphabet};
use crate::error::{DegenError, Result};

/// Output symbol for a stop codon.
pub const STOP: char = '*';

/// The twenty standard amino acids, one-letter codes.
pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// Unambiguous codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Codon([Base; 3]);

impl Codon {
    pub const fn new(first: Base, second: Base, third: Base) -> Self {
        Codon([first, second, third])
    }

    pub fn bases(self) -> [Base; 3] {
        self.0
    }

    /// Position in the 64-codon table, `AAA` = 0 through `TTT` = 63.
    pub fn index(self) -> usize {
        let [a, b, c] = self.0;
        a.index() * 16 + b.index() * 4 + c.index()
    }

    pub fn from_index(index: usize) -> Option<Self> {
        if index >= 64 {
            return None;
        }
        Some(Codon([
            Base::from_index(index >> 4)?,
            Base::from_index((index >> 2) & 3)?,
            Base::from_index(index & 3)?,
        ]))
    }

    /// All 64 codons in index order.
    pub fn all() -> impl Iterator<Item = Codon> {
        (0..64).filter_map(Codon::from_index)
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}{b}{c}")
    }
}

impl FromStr for Codon {
    type Err = DegenError;

    /// Parse a codon string. Lowercase and `U` are accepted; IUPAC ambiguity
    /// codes are rejected with [`DegenError::AmbiguousCodon`].
    fn from_str(s: &str) -> Result<Self> {
        let symbols: Vec<char> = s.chars().collect();
        let [first, second, third] = symbols[..] else {
            return Err(DegenError::InvalidCodon(s.to_string()));
        };
        let base = |c: char| match Base::from_char(c) {
            Some(b) => Ok(b),
            None if NucleotideAlphabet::iupac().contains(c) => {
                Err(DegenError::AmbiguousCodon(s.to_string()))
            }
            None => Err(DegenError::UnknownSymbol(c)),
        };
        Ok(Codon::new(base(first)?, base(second)?, base(third)?))
    }
}

struct NcbiTable {
    id: u32,
    name: &'static str,
    // Outputs in codon index order (AAA, AAC, AAG, AAT, ACA, ... TTT)
    outputs: &'static [u8; 64],
}

const NCBI_TABLES: &[NcbiTable] = &[
    NcbiTable {
        id: 1,
        name: "Standard",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF",
    },
    NcbiTable {
        id: 2,
        name: "Vertebrate Mitochondrial",
        outputs: b"KNKNTTTT*S*SMIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF",
    },
    NcbiTable {
        id: 3,
        name: "Yeast Mitochondrial",
        outputs: b"KNKNTTTTRSRSMIMIQHQHPPPPRRRRTTTTEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF",
    },
    NcbiTable {
        id: 4,
        name: "Mold Mitochondrial; Protozoan Mitochondrial; Coelenterate Mitochondrial; Mycoplasma; Spiroplasma",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF",
    },
    NcbiTable {
        id: 5,
        name: "Invertebrate Mitochondrial",
        outputs: b"KNKNTTTTSSSSMIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF",
    },
    NcbiTable {
        id: 6,
        name: "Ciliate Nuclear; Dasycladacean Nuclear; Hexamita Nuclear",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVVQYQYSSSS*CWCLFLF",
    },
    NcbiTable {
        id: 9,
        name: "Echinoderm Mitochondrial; Flatworm Mitochondrial",
        outputs: b"NNKNTTTTSSSSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF",
    },
    NcbiTable {
        id: 10,
        name: "Euplotid Nuclear",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSCCWCLFLF",
    },
    NcbiTable {
        id: 11,
        name: "Bacterial, Archaeal and Plant Plastid",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF",
    },
    NcbiTable {
        id: 12,
        name: "Alternative Yeast Nuclear",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLSLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF",
    },
    NcbiTable {
        id: 13,
        name: "Ascidian Mitochondrial",
        outputs: b"KNKNTTTTGSGSMIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF",
    },
    NcbiTable {
        id: 14,
        name: "Alternative Flatworm Mitochondrial",
        outputs: b"NNKNTTTTSSSSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVVYY*YSSSSWCWCLFLF",
    },
    NcbiTable {
        id: 15,
        name: "Blepharisma Macronuclear",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*YQYSSSS*CWCLFLF",
    },
    NcbiTable {
        id: 16,
        name: "Chlorophycean Mitochondrial",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*YLYSSSS*CWCLFLF",
    },
    NcbiTable {
        id: 21,
        name: "Trematode Mitochondrial",
        outputs: b"NNKNTTTTSSSSMIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF",
    },
    NcbiTable {
        id: 22,
        name: "Scenedesmus obliquus Mitochondrial",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*YLY*SSS*CWCLFLF",
    },
    NcbiTable {
        id: 23,
        name: "Thraustochytrium Mitochondrial",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWC*FLF",
    },
    NcbiTable {
        id: 24,
        name: "Pterobranchia Mitochondrial",
        outputs: b"KNKNTTTTSSKSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF",
    },
    NcbiTable {
        id: 25,
        name: "Candidate Division SR1 and Gracilibacteria",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSGCWCLFLF",
    },
    NcbiTable {
        id: 26,
        name: "Pachysolen tannophilus Nuclear",
        outputs: b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLALEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF",
    },
];

fn ncbi_table(id: u32) -> Option<&'static NcbiTable> {
    NCBI_TABLES.iter().find(|t| t.id == id)
}

/// Supported NCBI table identifiers, ascending.
pub fn table_ids() -> impl Iterator<Item = u32> {
    NCBI_TABLES.iter().map(|t| t.id)
}

/// Published name of an NCBI table.
pub fn table_name(id: u32) -> Option<&'static str> {
    ncbi_table(id).map(|t| t.name)
}

/// A complete codon-to-amino-acid mapping.
///
/// Built from a numbered NCBI table, optionally with codons reassigned on top
/// (e.g. amber suppression, `TAG -> Q`). Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneticCode {
    id: u32,
    name: String,
    outputs: [char; 64],
}

impl GeneticCode {
    /// Load NCBI table `table_id` and apply `overrides` (codon -> output).
    ///
    /// Override keys must be unambiguous codons; values must be a single
    /// amino-acid letter or [`STOP`].
    pub fn new<I, K, V>(table_id: u32, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let table = ncbi_table(table_id).ok_or(DegenError::InvalidTableId(table_id))?;
        let mut code = Self::from_ncbi(table);

        let mut reassigned = 0usize;
        for (key, value) in overrides {
            let (key, value) = (key.as_ref(), value.as_ref());
            let codon: Codon = key
                .trim()
                .parse()
                .map_err(|_| DegenError::InvalidCodon(key.to_string()))?;
            let output = parse_output(value)
                .ok_or_else(|| DegenError::InvalidCodon(format!("{key} -> {value}")))?;
            code.outputs[codon.index()] = output;
            reassigned += 1;
        }

        tracing::debug!(
            table = table_id,
            overrides = reassigned,
            "built genetic code"
        );
        Ok(code)
    }

    /// NCBI table without overrides.
    pub fn from_table(table_id: u32) -> Result<Self> {
        Self::new(table_id, std::iter::empty::<(&str, &str)>())
    }

    /// Standard genetic code (NCBI table 1).
    pub fn standard() -> Self {
        Self::from_ncbi(&NCBI_TABLES[0])
    }

    /// Standard code with the amber stop `TAG` read as glutamine, as in supE strains.
    pub fn supe() -> Self {
        let mut code = Self::standard().with_name("supE");
        code.outputs[Codon::new(Base::T, Base::A, Base::G).index()] = 'Q';
        code
    }

    fn from_ncbi(table: &NcbiTable) -> Self {
        GeneticCode {
            id: table.id,
            name: table.name.to_string(),
            outputs: (*table.outputs).map(char::from),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// NCBI table the code was built from.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn translate_codon(&self, codon: Codon) -> char {
        self.outputs[codon.index()]
    }

    /// Translate a codon string. Fails with [`DegenError::AmbiguousCodon`]
    /// unless all three symbols are unambiguous bases.
    pub fn translate(&self, codon: &str) -> Result<char> {
        codon.parse().map(|c| self.translate_codon(c))
    }

    /// Translate an unambiguous DNA sequence. A trailing partial codon is ignored.
    pub fn translate_sequence(&self, dna: &str) -> Result<String> {
        let symbols: Vec<char> = dna.chars().collect();
        symbols
            .chunks_exact(3)
            .map(|chunk| self.translate(&chunk.iter().collect::<String>()))
            .collect()
    }

    pub fn is_stop(&self, output: char) -> bool {
        output == STOP
    }

    /// All 64 codons with their outputs, in index order.
    pub fn codons(&self) -> impl Iterator<Item = (Codon, char)> + '_ {
        Codon::all().map(move |c| (c, self.translate_codon(c)))
    }

    /// Codons translating to `output`.
    pub fn synonymous_codons(&self, output: char) -> Vec<Codon> {
        self.codons()
            .filter(|&(_, o)| o == output)
            .map(|(c, _)| c)
            .collect()
    }

    pub fn stop_codons(&self) -> Vec<Codon> {
        self.synonymous_codons(STOP)
    }
}

impl Default for GeneticCode {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for GeneticCode {
    /// One row per codon: `AAA K`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (codon, output) in self.codons() {
            writeln!(f, "{codon} {output}")?;
        }
        Ok(())
    }
}

fn parse_output(value: &str) -> Option<char> {
    let mut chars = value.trim().chars();
    let output = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    (output == STOP || AMINO_ACIDS.contains(output)).then_some(output)
}
