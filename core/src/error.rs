use thiserror::Error;

use crate::CellCount;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid position")]
    InvalidPosition,
    #[error("Round state does not match its board")]
    InvalidRoundState,
    #[error("Protocol violation: {0}")]
    ProtocolViolation(#[from] Violation),
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
}

/// Reason a flip or resolve request was rejected by the round protocol.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("A pair is waiting to be resolved")]
    Processing,
    #[error("Tile is already flipped")]
    AlreadyFlipped,
    #[error("Two tiles must be flipped before resolving")]
    NoPairSelected,
    #[error("Round is already complete")]
    RoundComplete,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Grid size must be positive")]
    EmptyGrid,
    #[error("Grid size must be even")]
    OddGridSize,
    #[error("Alphabet has {available} symbols but the grid needs {needed} pairs")]
    AlphabetTooSmall {
        needed: CellCount,
        available: CellCount,
    },
    #[error("Alphabet contains duplicate glyphs")]
    DuplicateGlyph,
    #[error("Layout is not a square grid where every symbol appears exactly twice")]
    InvalidLayout,
}

pub type Result<T> = core::result::Result<T, GameError>;
