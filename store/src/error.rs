use pairs_core::GameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Score file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Score file is not valid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed score row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid game settings: {0}")]
    Game(#[from] GameError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
