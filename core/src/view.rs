use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a player is allowed to see of a round, suitable to hand to a renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundView {
    pub size: Coord,
    pub state: RoundState,
    pub moves: u32,
    pub matched_pairs: CellCount,
    pub total_pairs: CellCount,
    pub cells: Array2<Option<Symbol>>,
}

impl RoundView {
    pub fn from_engine(engine: &PlayEngine) -> Self {
        Self {
            size: engine.size(),
            state: engine.state(),
            moves: engine.move_count(),
            matched_pairs: engine.matched_pairs(),
            total_pairs: engine.total_pairs(),
            cells: engine.visible_board().clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let side = usize::from(self.size);
        if self.cells.dim() != (side, side) || self.matched_pairs > self.total_pairs {
            return Err(ConfigError::InvalidLayout.into());
        }
        Ok(())
    }

    /// Glyph for every cell, `None` where the tile is face down.
    pub fn glyphs(&self, alphabet: &Alphabet) -> Array2<Option<char>> {
        self.cells
            .map(|cell| cell.and_then(|symbol| alphabet.glyph(symbol)))
    }
}
