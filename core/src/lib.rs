#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use symbol::*;
pub use types::*;
pub use view::*;

mod engine;
mod error;
mod generator;
mod session;
mod symbol;
mod types;
mod view;

/// Grid dimension used when nothing else is configured.
pub const DEFAULT_GRID_SIZE: Coord = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub alphabet: Alphabet,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, alphabet: Alphabet) -> Self {
        Self { size, alphabet }
    }

    pub fn new(size: Coord, alphabet: Alphabet) -> Result<Self> {
        let config = Self::new_unchecked(size, alphabet);
        config.validate()?;
        Ok(config)
    }

    pub fn with_size(size: Coord) -> Result<Self> {
        Self::new(size, Alphabet::default())
    }

    /// Checks that the grid is non-empty, has an even side and that the alphabet can cover every pair.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(ConfigError::EmptyGrid.into());
        }
        if self.size % 2 != 0 {
            return Err(ConfigError::OddGridSize.into());
        }

        let needed = self.pair_count();
        let available = self.alphabet.len();
        if needed > available {
            return Err(ConfigError::AlphabetTooSmall { needed, available }.into());
        }

        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    pub const fn pair_count(&self) -> CellCount {
        self.total_cells() / 2
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(DEFAULT_GRID_SIZE, Alphabet::default())
    }
}

/// The hidden answer of a round: which symbol sits under every tile.
///
/// Serialized as the bare symbol grid; deserializing runs the same checks as [`AnswerLayout::from_symbols`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Symbol>", into = "Array2<Symbol>")]
pub struct AnswerLayout {
    symbols: Array2<Symbol>,
}

impl AnswerLayout {
    /// Accepts a square, even-sided grid where every symbol appears exactly twice.
    pub fn from_symbols(symbols: Array2<Symbol>) -> Result<Self> {
        let (rows, cols) = symbols.dim();
        if rows == 0 || rows != cols || rows % 2 != 0 || Coord::try_from(rows).is_err() {
            return Err(ConfigError::InvalidLayout.into());
        }

        let mut sorted: Vec<Symbol> = symbols.iter().copied().collect();
        sorted.sort_unstable();
        let paired = sorted
            .chunks_exact(2)
            .enumerate()
            .all(|(i, pair)| pair[0] == pair[1] && (i == 0 || sorted[2 * i - 1] != pair[0]));
        if !paired {
            return Err(ConfigError::InvalidLayout.into());
        }

        Ok(Self { symbols })
    }

    /// Builds a layout from one string of glyphs per row.
    pub fn from_glyph_rows(alphabet: &Alphabet, rows: &[&str]) -> Result<Self> {
        let size = rows.len();
        let mut flat = Vec::with_capacity(size * size);
        for row in rows {
            for glyph in row.chars() {
                let symbol = alphabet
                    .symbol_of(glyph)
                    .ok_or(ConfigError::InvalidLayout)?;
                flat.push(symbol);
            }
        }

        let symbols =
            Array2::from_shape_vec((size, size), flat).map_err(|_| ConfigError::InvalidLayout)?;
        Self::from_symbols(symbols)
    }

    pub fn size(&self) -> Coord {
        // dimension is checked to fit on construction
        self.symbols.nrows().try_into().unwrap_or(Coord::MAX)
    }

    pub fn total_cells(&self) -> CellCount {
        mult(self.size(), self.size())
    }

    pub fn pair_count(&self) -> CellCount {
        self.total_cells() / 2
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidPosition)
        }
    }

    pub fn symbol_at(&self, coords: Coord2) -> Symbol {
        self[coords]
    }

    /// The other cell holding the same symbol as `coords`.
    pub fn partner_of(&self, coords: Coord2) -> Option<Coord2> {
        let symbol = self.symbols.get(coords.to_nd_index())?;
        iter_positions(self.size()).find(|&pos| pos != coords && self[pos] == *symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Symbol)> + '_ {
        iter_positions(self.size()).map(|pos| (pos, self[pos]))
    }
}

impl TryFrom<Array2<Symbol>> for AnswerLayout {
    type Error = GameError;

    fn try_from(symbols: Array2<Symbol>) -> Result<Self> {
        Self::from_symbols(symbols)
    }
}

impl From<AnswerLayout> for Array2<Symbol> {
    fn from(layout: AnswerLayout) -> Self {
        layout.symbols
    }
}

impl Index<Coord2> for AnswerLayout {
    type Output = Symbol;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.symbols[coords.to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlipOutcome {
    First(Symbol),
    Second(Symbol),
}

impl FlipOutcome {
    pub const fn symbol(self) -> Symbol {
        match self {
            Self::First(symbol) | Self::Second(symbol) => symbol,
        }
    }

    /// Whether the flip completed a pair that now waits for [`PlayEngine::resolve_match`].
    pub const fn pair_pending(self) -> bool {
        matches!(self, Self::Second(_))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Matched,
    Mismatched,
}

impl MatchOutcome {
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_four_by_four() {
        let config = GameConfig::default();
        assert_eq!(config.size, 4);
        assert_eq!(config.pair_count(), 8);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn config_rejects_bad_sizes() {
        assert_eq!(
            GameConfig::with_size(0),
            Err(GameError::Configuration(ConfigError::EmptyGrid))
        );
        assert_eq!(
            GameConfig::with_size(3),
            Err(GameError::Configuration(ConfigError::OddGridSize))
        );
    }

    #[test]
    fn config_rejects_grid_larger_than_alphabet() {
        assert_eq!(
            GameConfig::with_size(6),
            Err(GameError::Configuration(ConfigError::AlphabetTooSmall {
                needed: 18,
                available: 8
            }))
        );

        let wide = Alphabet::new("ABCDEFGHIJKLMNOPQR").unwrap();
        assert!(GameConfig::new(6, wide).is_ok());
    }

    #[test]
    fn layout_from_glyph_rows() {
        let alphabet = Alphabet::default();
        let layout = AnswerLayout::from_glyph_rows(&alphabet, &["AB", "BA"]).unwrap();

        assert_eq!(layout.size(), 2);
        assert_eq!(layout[(0, 0)], layout[(1, 1)]);
        assert_eq!(layout.partner_of((0, 1)), Some((1, 0)));
    }

    #[test]
    fn layout_rejects_unpaired_symbols() {
        let alphabet = Alphabet::default();
        let invalid = Err(GameError::Configuration(ConfigError::InvalidLayout));

        assert_eq!(AnswerLayout::from_glyph_rows(&alphabet, &["AB", "BB"]), invalid);
        assert_eq!(AnswerLayout::from_glyph_rows(&alphabet, &["AA", "AA"]), invalid);
        assert_eq!(AnswerLayout::from_glyph_rows(&alphabet, &["AAB"]), invalid);
        assert_eq!(AnswerLayout::from_glyph_rows(&alphabet, &["AZ", "ZA"]), invalid);
    }

    #[test]
    fn layout_deserialization_checks_pairing() {
        let layout = AnswerLayout::from_glyph_rows(&Alphabet::default(), &["AB", "BA"]).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(serde_json::from_str::<AnswerLayout>(&json).unwrap(), layout);

        let four_of_a_kind = r#"{"v":1,"dim":[2,2],"data":[0,0,0,0]}"#;
        assert!(serde_json::from_str::<AnswerLayout>(four_of_a_kind).is_err());

        let not_square = r#"{"v":1,"dim":[4,2],"data":[0,0,1,1,2,2,3,3]}"#;
        assert!(serde_json::from_str::<AnswerLayout>(not_square).is_err());
    }

    #[test]
    fn layout_validates_coords() {
        let layout = AnswerLayout::from_glyph_rows(&Alphabet::default(), &["AB", "BA"]).unwrap();

        assert_eq!(layout.validate_coords((1, 1)), Ok((1, 1)));
        assert_eq!(layout.validate_coords((2, 0)), Err(GameError::InvalidPosition));
        assert_eq!(layout.validate_coords((0, 2)), Err(GameError::InvalidPosition));
    }
}
