//! Player-facing settings, read from a TOML file.
//!
//! Lookup order for [`Settings::load`]:
//! 1. Path in the `PAIRS_CONFIG` environment variable
//! 2. `pairs.toml` in the working directory
//! 3. Built-in defaults
//!
//! `PAIRS_GRID_SIZE`, `PAIRS_PLAYER` and `PAIRS_SCORES` override the loaded values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pairs_core::{Alphabet, Coord, DEFAULT_ALPHABET, DEFAULT_GRID_SIZE, GameConfig, GameError};
use serde::{Deserialize, Serialize};

use crate::{CsvScoreStore, SettingsError, StoreError};

pub const CONFIG_ENV: &str = "PAIRS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "pairs.toml";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub grid_size: Coord,
    pub alphabet: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            alphabet: DEFAULT_ALPHABET.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub name: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSettings {
    pub path: PathBuf,
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("scores.csv"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// How long a mismatched pair stays face up before the presentation resolves it.
    pub reveal_delay_ms: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { reveal_delay_ms: 500 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameSettings,
    pub player: PlayerSettings,
    pub scores: ScoreSettings,
    pub display: DisplaySettings,
}

impl Settings {
    /// Finds and loads settings, never failing: problems are logged and defaults used instead.
    pub fn load() -> Self {
        let path = match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                let path = PathBuf::from(path);
                if path.exists() {
                    log::info!("Loading settings from {}: {}", CONFIG_ENV, path.display());
                    Some(path)
                } else {
                    log::warn!("{}={} not found, searching defaults", CONFIG_ENV, path.display());
                    None
                }
            }
            Err(_) => None,
        }
        .or_else(|| {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            path.exists().then_some(path)
        });

        let settings = match path {
            Some(path) => Self::load_from_path(&path),
            None => {
                log::debug!("No settings file found, using defaults");
                Self::default()
            }
        };
        settings.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Reads `path`, falling back to defaults with a warning when it cannot be read or parsed.
    pub fn load_from_path(path: &Path) -> Self {
        Self::read(path).unwrap_or_else(|err| {
            log::warn!("{} ({}), using default settings", err, path.display());
            Self::default()
        })
    }

    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `PAIRS_*` overrides fetched through `var`; unparsable values are ignored.
    pub fn apply_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = var("PAIRS_GRID_SIZE") {
            match value.parse() {
                Ok(size) => self.game.grid_size = size,
                Err(err) => log::warn!("Ignoring PAIRS_GRID_SIZE={}: {}", value, err),
            }
        }
        if let Some(value) = var("PAIRS_PLAYER") {
            self.player.name = value;
        }
        if let Some(value) = var("PAIRS_SCORES") {
            self.scores.path = PathBuf::from(value);
        }
        self
    }

    pub fn game_config(&self) -> Result<GameConfig, GameError> {
        let alphabet = Alphabet::new(&self.game.alphabet)?;
        GameConfig::new(self.game.grid_size, alphabet)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.display.reveal_delay_ms)
    }

    pub fn open_store(&self) -> Result<CsvScoreStore, StoreError> {
        CsvScoreStore::open(&self.scores.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairs_core::ConfigError;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let settings = Settings::default();

        assert_eq!(settings.game.grid_size, 4);
        assert_eq!(settings.game.alphabet, "ABCDEFGH");
        assert_eq!(settings.player.name, "Player");
        assert_eq!(settings.scores.path, PathBuf::from("scores.csv"));
        assert_eq!(settings.reveal_delay(), Duration::from_millis(500));
        assert_eq!(settings.game_config().unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [game]
            grid_size = 2

            [player]
            name = "ada"
            "#,
        )
        .unwrap();

        assert_eq!(settings.game.grid_size, 2);
        assert_eq!(settings.game.alphabet, "ABCDEFGH");
        assert_eq!(settings.player.name, "ada");
        assert_eq!(settings.display.reveal_delay_ms, 500);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(matches!(
            Settings::from_toml_str("[game]\ngrid_size = \"big\""),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn load_from_path_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pairs.toml");

        assert_eq!(Settings::load_from_path(&path), Settings::default());

        std::fs::write(&path, "not = [valid").unwrap();
        assert_eq!(Settings::load_from_path(&path), Settings::default());

        std::fs::write(&path, "[display]\nreveal_delay_ms = 750\n").unwrap();
        assert_eq!(Settings::load_from_path(&path).display.reveal_delay_ms, 750);
    }

    #[test]
    fn overrides_apply_and_bad_values_are_ignored() {
        let env = HashMap::from([
            ("PAIRS_GRID_SIZE", "two"),
            ("PAIRS_PLAYER", "bo"),
            ("PAIRS_SCORES", "/tmp/bo.csv"),
        ]);

        let settings = Settings::default().apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(settings.game.grid_size, 4);
        assert_eq!(settings.player.name, "bo");
        assert_eq!(settings.scores.path, PathBuf::from("/tmp/bo.csv"));
    }

    #[test]
    fn game_config_is_validated() {
        let mut settings = Settings::default();
        settings.game.grid_size = 6;
        assert_eq!(
            settings.game_config(),
            Err(GameError::Configuration(ConfigError::AlphabetTooSmall {
                needed: 18,
                available: 8
            }))
        );

        settings.game.alphabet = "AABB".to_string();
        assert_eq!(
            settings.game_config(),
            Err(GameError::Configuration(ConfigError::DuplicateGlyph))
        );
    }

    #[test]
    fn open_store_uses_configured_path() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.scores.path = dir.path().join("history.csv");

        let store = settings.open_store().unwrap();

        assert_eq!(store.path(), settings.scores.path);
        assert!(settings.scores.path.exists());
    }
}
