//! Sorting and summary statistics over stored scores.

use std::cmp::Ordering;
use std::str::FromStr;

use pairs_core::TimeTaken;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ScoreRecord;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    Game,
    Player,
    Moves,
    TimeTaken,
    Date,
    Time,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        Self::Game,
        Self::Player,
        Self::Moves,
        Self::TimeTaken,
        Self::Date,
        Self::Time,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Game => "Game",
            Self::Player => "Player",
            Self::Moves => "Moves",
            Self::TimeTaken => "Time Taken",
            Self::Date => "Date",
            Self::Time => "Time",
        }
    }

    pub fn compare(self, a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
        match self {
            Self::Game => a.game_number.cmp(&b.game_number),
            Self::Player => a.player_name.cmp(&b.player_name),
            Self::Moves => a.moves.cmp(&b.moves),
            Self::TimeTaken => a.time_taken.cmp(&b.time_taken),
            Self::Date => a.date.cmp(&b.date),
            Self::Time => a.time.cmp(&b.time),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sort key {0:?}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSortKey(s.to_string()))
    }
}

/// Stable ascending sort, ties keep file order.
pub fn sort_records(records: &mut [ScoreRecord], key: SortKey) {
    records.sort_by(|a, b| key.compare(a, b));
}

/// Distinct player names in the order they first appear.
pub fn players(records: &[ScoreRecord]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for record in records {
        if !names.contains(&record.player_name.as_str()) {
            names.push(&record.player_name);
        }
    }
    names
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub games: usize,
    pub average_moves: f64,
    pub best_moves: u32,
    /// Seconds.
    pub average_time: f64,
    pub best_time: TimeTaken,
}

impl Summary {
    /// `None` when there is nothing to summarize.
    pub fn of<'a>(records: impl IntoIterator<Item = &'a ScoreRecord>) -> Option<Self> {
        let mut games = 0;
        let mut total_moves = 0u64;
        let mut total_centis = 0u64;
        let mut best_moves = u32::MAX;
        let mut best_time = TimeTaken::from_centis(u64::MAX);

        for record in records {
            games += 1;
            total_moves += u64::from(record.moves);
            total_centis = total_centis.saturating_add(record.time_taken.centis());
            best_moves = best_moves.min(record.moves);
            best_time = best_time.min(record.time_taken);
        }

        if games == 0 {
            return None;
        }

        Some(Self {
            games,
            average_moves: total_moves as f64 / games as f64,
            best_moves,
            average_time: total_centis as f64 / 100.0 / games as f64,
            best_time,
        })
    }
}

/// One player's results next to everybody's.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerComparison {
    pub player: String,
    pub overall: Summary,
    pub player_summary: Option<Summary>,
}

impl PlayerComparison {
    pub fn new(records: &[ScoreRecord], player: &str) -> Option<Self> {
        let overall = Summary::of(records)?;
        let player_summary = Summary::of(records.iter().filter(|r| r.player_name == player));
        Some(Self {
            player: player.to_string(),
            overall,
            player_summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn record(game_number: u64, player: &str, moves: u32, centis: u64) -> ScoreRecord {
        ScoreRecord {
            game_number,
            player_name: player.to_string(),
            moves,
            time_taken: TimeTaken::from_centis(centis),
            date: date!(2026 - 10 - 19),
            time: time!(12:00:00),
        }
    }

    fn sample() -> Vec<ScoreRecord> {
        vec![
            record(1, "cy", 14, 6_010),
            record(2, "ada", 10, 4_500),
            record(3, "bo", 12, 9_000),
            record(4, "ada", 8, 3_000),
        ]
    }

    #[test]
    fn sort_by_numeric_and_text_keys() {
        let mut records = sample();

        sort_records(&mut records, SortKey::Moves);
        let moves: Vec<u32> = records.iter().map(|r| r.moves).collect();
        assert_eq!(moves, [8, 10, 12, 14]);

        sort_records(&mut records, SortKey::Player);
        let games: Vec<u64> = records.iter().map(|r| r.game_number).collect();
        // stable: ada's games keep the order from the previous sort
        assert_eq!(games, [4, 2, 3, 1]);

        sort_records(&mut records, SortKey::TimeTaken);
        assert_eq!(records[0].time_taken, TimeTaken::from_centis(3_000));
        assert_eq!(records[3].game_number, 3);
    }

    #[test]
    fn sort_key_parses_labels() {
        assert_eq!("time taken".parse::<SortKey>(), Ok(SortKey::TimeTaken));
        assert_eq!("Game".parse::<SortKey>(), Ok(SortKey::Game));
        assert_eq!("score".parse::<SortKey>(), Err(UnknownSortKey("score".to_string())));
    }

    #[test]
    fn players_in_first_seen_order() {
        assert_eq!(players(&sample()), ["cy", "ada", "bo"]);
    }

    #[test]
    fn summary_of_all_games() {
        let summary = Summary::of(&sample()).unwrap();

        assert_eq!(summary.games, 4);
        assert!((summary.average_moves - 11.0).abs() < 1e-9);
        assert_eq!(summary.best_moves, 8);
        assert!((summary.average_time - 56.275).abs() < 1e-9);
        assert_eq!(summary.best_time, TimeTaken::from_centis(3_000));
    }

    #[test]
    fn summary_of_nothing_is_none() {
        assert_eq!(Summary::of(&Vec::<ScoreRecord>::new()), None);
    }

    #[test]
    fn comparison_against_one_player() {
        let records = sample();
        let comparison = PlayerComparison::new(&records, "ada").unwrap();

        assert_eq!(comparison.overall.games, 4);
        let ada = comparison.player_summary.unwrap();
        assert_eq!(ada.games, 2);
        assert!((ada.average_moves - 9.0).abs() < 1e-9);
        assert_eq!(ada.best_time, TimeTaken::from_centis(3_000));

        let stranger = PlayerComparison::new(&records, "zed").unwrap();
        assert_eq!(stranger.player_summary, None);
        assert_eq!(PlayerComparison::new(&[], "ada"), None);
    }
}
