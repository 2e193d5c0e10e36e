use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Glyphs used when no alphabet is configured, enough for a 4×4 grid.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGH";

/// Opaque tile identity, an index into the round's [`Alphabet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(CellCount);

impl Symbol {
    pub const fn new(index: CellCount) -> Self {
        Self(index)
    }

    pub const fn index(self) -> CellCount {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered set of distinct glyphs, one per symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    glyphs: Vec<char>,
}

impl Alphabet {
    pub fn new(glyphs: &str) -> core::result::Result<Self, ConfigError> {
        let glyphs: Vec<char> = glyphs.chars().collect();

        let mut sorted = glyphs.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(ConfigError::DuplicateGlyph);
        }

        Ok(Self { glyphs })
    }

    pub fn len(&self) -> CellCount {
        self.glyphs.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph(&self, symbol: Symbol) -> Option<char> {
        self.glyphs.get(usize::from(symbol.index())).copied()
    }

    /// Reverse lookup, mostly useful to spell layouts out in tests.
    pub fn symbol_of(&self, glyph: char) -> Option<Symbol> {
        self.glyphs
            .iter()
            .position(|&g| g == glyph)
            .and_then(|index| index.try_into().ok())
            .map(Symbol::new)
    }

    /// The first `count` symbols of the alphabet.
    pub fn symbols(&self, count: CellCount) -> impl Iterator<Item = Symbol> + use<> {
        (0..count.min(self.len())).map(Symbol::new)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            glyphs: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

impl TryFrom<String> for Alphabet {
    type Error = ConfigError;

    fn try_from(value: String) -> core::result::Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Alphabet> for String {
    fn from(value: Alphabet) -> Self {
        value.glyphs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_alphabet_has_eight_glyphs() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.len(), 8);
        assert_eq!(alphabet.glyph(Symbol::new(0)), Some('A'));
        assert_eq!(alphabet.glyph(Symbol::new(7)), Some('H'));
        assert_eq!(alphabet.glyph(Symbol::new(8)), None);
    }

    #[test]
    fn duplicate_glyphs_are_rejected() {
        assert_eq!(Alphabet::new("ABCA"), Err(ConfigError::DuplicateGlyph));
    }

    #[test]
    fn symbol_lookup_matches_glyph_order() {
        let alphabet = Alphabet::new("xyz").unwrap();
        assert_eq!(alphabet.symbol_of('z'), Some(Symbol::new(2)));
        assert_eq!(alphabet.symbol_of('q'), None);
    }
}
