//! Nucleotide ambiguity alphabet.
//!
//! Every symbol resolves to a [`BaseSet`], the non-empty set of unambiguous
//! bases it stands for. The IUPAC alphabet is built once per process and
//! shared; custom alphabets extend it with user-defined symbols.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DegenError, Result};

/// One of the four unambiguous DNA bases, ordered A < C < G < T.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Base {
    A,
    C,
    G,
    T,
}

impl Base {
    pub const ALL: [Base; 4] = [Base::A, Base::C, Base::G, Base::T];

    /// Parse an unambiguous base. `U` is read as `T`.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Base::A),
            'C' => Some(Base::C),
            'G' => Some(Base::G),
            'T' | 'U' => Some(Base::T),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::C => 'C',
            Base::G => 'G',
            Base::T => 'T',
        }
    }

    /// Position in A, C, G, T order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Base::ALL.get(index).copied()
    }

    pub fn complement(self) -> Self {
        match self {
            Base::A => Base::T,
            Base::C => Base::G,
            Base::G => Base::C,
            Base::T => Base::A,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// IUPAC symbol for each 4-bit mask (A=1, C=2, G=4, T=8). Index 0 is unused.
const IUPAC_BY_MASK: [char; 16] = [
    '-', 'A', 'C', 'M', 'G', 'R', 'S', 'V', 'T', 'W', 'Y', 'H', 'K', 'D', 'B', 'N',
];

/// Non-empty set of unambiguous bases.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BaseSet(u8);

impl BaseSet {
    pub const fn single(base: Base) -> Self {
        BaseSet(1 << base as u8)
    }

    /// Collect bases into a set. Returns `None` when no base is given.
    pub fn from_bases<I: IntoIterator<Item = Base>>(bases: I) -> Option<Self> {
        let mask = bases
            .into_iter()
            .fold(0u8, |mask, base| mask | (1 << base.index()));
        (mask != 0).then_some(BaseSet(mask))
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Sets built through this module are never empty.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, base: Base) -> bool {
        self.0 & (1 << base.index()) != 0
    }

    /// Members in A, C, G, T order.
    pub fn iter(self) -> impl Iterator<Item = Base> + Clone {
        Base::ALL.into_iter().filter(move |&b| self.contains(b))
    }

    /// The `n`-th member in A, C, G, T order.
    pub fn nth(self, n: usize) -> Option<Base> {
        self.iter().nth(n)
    }

    /// Draw one member uniformly at random.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Base {
        let n = rng.random_range(0..self.len());
        match self.nth(n) {
            Some(base) => base,
            None => unreachable!("index drawn within set size"),
        }
    }

    pub fn complement(self) -> Self {
        BaseSet(
            self.iter()
                .fold(0u8, |mask, b| mask | (1 << b.complement().index())),
        )
    }

    /// Canonical IUPAC symbol denoting exactly this set.
    pub fn iupac_symbol(self) -> char {
        IUPAC_BY_MASK[self.0 as usize & 0b1111]
    }
}

impl fmt::Debug for BaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BaseSet({})", self)
    }
}

impl fmt::Display for BaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.iter() {
            write!(f, "{}", base)?;
        }
        Ok(())
    }
}

static IUPAC: LazyLock<NucleotideAlphabet> = LazyLock::new(|| {
    let symbols = (1..16u8)
        .map(|mask| (IUPAC_BY_MASK[mask as usize], BaseSet(mask)))
        .collect();
    NucleotideAlphabet { symbols }
});

/// Mapping from ambiguity symbols to the bases they represent.
#[derive(Debug, Clone)]
pub struct NucleotideAlphabet {
    symbols: BTreeMap<char, BaseSet>,
}

impl NucleotideAlphabet {
    /// The 4 bases plus the 11 IUPAC ambiguity codes.
    pub fn iupac() -> &'static NucleotideAlphabet {
        &IUPAC
    }

    /// Uppercase and read `U` as `T`.
    pub fn normalize(symbol: char) -> char {
        match symbol.to_ascii_uppercase() {
            'U' => 'T',
            other => other,
        }
    }

    /// Extend the alphabet with a user-defined symbol.
    ///
    /// `bases` lists the unambiguous bases the symbol represents. The four
    /// unambiguous bases themselves cannot be redefined.
    pub fn with_symbol(mut self, symbol: char, bases: &str) -> Result<Self> {
        let symbol = Self::normalize(symbol);
        let invalid = |reason| DegenError::InvalidSymbolDefinition { symbol, reason };
        if Base::from_char(symbol).is_some() {
            return Err(invalid("unambiguous bases cannot be redefined"));
        }
        if symbol.is_whitespace() {
            return Err(invalid("whitespace is not a symbol"));
        }
        let members = bases
            .chars()
            .map(|c| Base::from_char(c).ok_or(DegenError::UnknownSymbol(c)))
            .collect::<Result<Vec<_>>>()?;
        let set = BaseSet::from_bases(members).ok_or_else(|| invalid("no bases given"))?;
        self.symbols.insert(symbol, set);
        Ok(self)
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains_key(&Self::normalize(symbol))
    }

    pub fn bases_of(&self, symbol: char) -> Result<BaseSet> {
        self.symbols
            .get(&Self::normalize(symbol))
            .copied()
            .ok_or(DegenError::UnknownSymbol(symbol))
    }

    pub fn degeneracy(&self, symbol: char) -> Result<usize> {
        self.bases_of(symbol).map(BaseSet::len)
    }

    /// Symbol denoting exactly `set`, preferring the IUPAC code.
    pub fn symbol_for(&self, set: BaseSet) -> Option<char> {
        let iupac = set.iupac_symbol();
        if self.symbols.get(&iupac) == Some(&set) {
            return Some(iupac);
        }
        self.symbols
            .iter()
            .find(|&(_, &s)| s == set)
            .map(|(&c, _)| c)
    }

    /// Ambiguity-aware complement, always expressed as an IUPAC symbol.
    pub fn complement(&self, symbol: char) -> Result<char> {
        self.bases_of(symbol)
            .map(|set| set.complement().iupac_symbol())
    }

    /// Resolve every symbol of a template into its normalized label and base set.
    pub fn resolve(&self, symbols: &str) -> Result<Vec<(char, BaseSet)>> {
        symbols
            .chars()
            .map(|c| self.bases_of(c).map(|set| (Self::normalize(c), set)))
            .collect()
    }

    pub fn symbols(&self) -> impl Iterator<Item = (char, BaseSet)> + '_ {
        self.symbols.iter().map(|(&c, &set)| (c, set))
    }
}

/// Bases denoted by an IUPAC symbol.
pub fn bases_of(symbol: char) -> Result<BaseSet> {
    NucleotideAlphabet::iupac().bases_of(symbol)
}

/// Number of bases denoted by an IUPAC symbol.
pub fn degeneracy(symbol: char) -> Result<usize> {
    NucleotideAlphabet::iupac().degeneracy(symbol)
}

/// Reverse complement of an IUPAC template.
pub fn reverse_complement(symbols: &str) -> Result<String> {
    let alphabet = NucleotideAlphabet::iupac();
    symbols.chars().rev().map(|c| alphabet.complement(c)).collect()
}
