use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;
use core::time::Duration;
use rand::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use web_time::Instant;

use crate::*;

/// Round duration kept in hundredths of a second, written as `S.CC`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeTaken(u64);

impl TimeTaken {
    pub const fn from_centis(centis: u64) -> Self {
        Self(centis)
    }

    /// Rounds half up to the nearest hundredth.
    pub fn from_duration(duration: Duration) -> Self {
        let centis = (duration.as_millis() + 5) / 10;
        Self(centis.try_into().unwrap_or(u64::MAX))
    }

    pub const fn centis(self) -> u64 {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    fn from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        Some(Self((secs * 100.0 + 0.5) as u64))
    }
}

impl fmt::Display for TimeTaken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Invalid time taken, expected a non-negative number of seconds")]
pub struct ParseTimeTakenError;

impl FromStr for TimeTaken {
    type Err = ParseTimeTakenError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let secs: f64 = s.trim().parse().map_err(|_| ParseTimeTakenError)?;
        Self::from_secs_f64(secs).ok_or(ParseTimeTakenError)
    }
}

impl Serialize for TimeTaken {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TimeTaken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = TimeTaken;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("seconds with up to two decimals")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> core::result::Result<TimeTaken, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> core::result::Result<TimeTaken, E> {
                TimeTaken::from_secs_f64(v).ok_or_else(|| E::custom(ParseTimeTakenError))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> core::result::Result<TimeTaken, E> {
                Ok(TimeTaken(v.saturating_mul(100)))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// What a finished round hands to the score store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinishedRound {
    pub player_name: String,
    pub moves: u32,
    pub time_taken: TimeTaken,
}

/// Persistence boundary for finished rounds.
pub trait ScoreStore {
    type Error: core::error::Error;

    /// Stores one round and returns the game number assigned to it.
    fn append(&mut self, round: &FinishedRound) -> core::result::Result<u64, Self::Error>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for &mut S {
    type Error = S::Error;

    fn append(&mut self, round: &FinishedRound) -> core::result::Result<u64, Self::Error> {
        (**self).append(round)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinishError<E> {
    #[error("Round is not complete yet")]
    NotComplete,
    #[error("Round was already recorded as game {0}")]
    AlreadyRecorded(u64),
    #[error("Could not store score: {0}")]
    Store(#[source] E),
}

/// A player's sequence of rounds, wired to a score store.
///
/// The session owns the timing the engine deliberately leaves out: the clock starts on the first accepted flip and
/// freezes once the round completes.
pub struct Session<S> {
    config: GameConfig,
    player_name: String,
    store: S,
    rng: SmallRng,
    engine: PlayEngine,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    recorded: Option<u64>,
}

impl<S: ScoreStore> Session<S> {
    pub fn new(config: GameConfig, player_name: impl Into<String>, store: S, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let engine = PlayEngine::generate(&config, RandomBoardGenerator::new(rng.random()))?;
        Ok(Self {
            config,
            player_name: player_name.into(),
            store,
            rng,
            engine,
            started_at: None,
            finished_at: None,
            recorded: None,
        })
    }

    /// Abandons the current round and deals a new one with the same configuration.
    pub fn new_round(&mut self) -> Result<()> {
        let engine = PlayEngine::generate(&self.config, RandomBoardGenerator::new(self.rng.random()))?;
        self.replace_round(engine);
        Ok(())
    }

    /// Like [`Session::new_round`] but switching grid size; an invalid size leaves the current round untouched.
    pub fn new_round_with_size(&mut self, size: Coord) -> Result<()> {
        let config = GameConfig::new(size, self.config.alphabet.clone())?;
        let engine = PlayEngine::generate(&config, RandomBoardGenerator::new(self.rng.random()))?;
        self.config = config;
        self.replace_round(engine);
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn view(&self) -> RoundView {
        RoundView::from_engine(&self.engine)
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, player_name: impl Into<String>) {
        self.player_name = player_name.into();
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn flip_card(&mut self, coords: Coord2) -> Result<FlipOutcome> {
        let outcome = self.engine.flip_card(coords)?;
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        Ok(outcome)
    }

    pub fn resolve_match(&mut self) -> Result<MatchOutcome> {
        let outcome = self.engine.resolve_match()?;
        if self.engine.is_complete() && self.finished_at.is_none() {
            self.finished_at = Some(Instant::now());
            log::debug!(
                "Round complete in {} moves, {}s",
                self.engine.move_count(),
                TimeTaken::from_duration(self.elapsed())
            );
        }
        Ok(outcome)
    }

    pub fn is_complete(&self) -> bool {
        self.engine.is_complete()
    }

    pub fn move_count(&self) -> u32 {
        self.engine.move_count()
    }

    /// Time since the first flip, frozen at completion.
    pub fn elapsed(&self) -> Duration {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => start.elapsed(),
            (None, _) => Duration::ZERO,
        }
    }

    /// Game number of the current round once it has been stored.
    pub fn recorded_as(&self) -> Option<u64> {
        self.recorded
    }

    /// Stores the completed round using the session clock.
    pub fn finish(&mut self) -> core::result::Result<u64, FinishError<S::Error>> {
        self.finish_with(self.elapsed())
    }

    /// Stores the completed round with a duration measured by the caller.
    ///
    /// A store failure is reported but leaves the round as it was, so it can be retried.
    pub fn finish_with(&mut self, elapsed: Duration) -> core::result::Result<u64, FinishError<S::Error>> {
        if let Some(game_number) = self.recorded {
            return Err(FinishError::AlreadyRecorded(game_number));
        }
        if !self.engine.is_complete() {
            return Err(FinishError::NotComplete);
        }

        let round = FinishedRound {
            player_name: self.player_name.clone(),
            moves: self.engine.move_count(),
            time_taken: TimeTaken::from_duration(elapsed),
        };
        match self.store.append(&round) {
            Ok(game_number) => {
                log::debug!("Recorded {:?} as game {}", round, game_number);
                self.recorded = Some(game_number);
                Ok(game_number)
            }
            Err(err) => {
                log::warn!("Failed to record score for {}: {}", round.player_name, err);
                Err(FinishError::Store(err))
            }
        }
    }

    fn replace_round(&mut self, engine: PlayEngine) {
        if !self.engine.is_complete() && self.started_at.is_some() {
            log::debug!("Abandoning round after {} moves", self.engine.move_count());
        }
        self.engine = engine;
        self.started_at = None;
        self.finished_at = None;
        self.recorded = None;
    }
}
