use pairs_core::{FinishedRound, TimeTaken};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};

/// Column titles of the score file, in file order.
pub const HEADER: [&str; 6] = ["Game Number", "Player Name", "Moves", "Time Taken", "Date", "Time"];

time::serde::format_description!(date_format, Date, "[year]-[month]-[day]");
time::serde::format_description!(time_format, Time, "[hour]:[minute]:[second]");

/// One stored round, as it appears in the score file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(rename = "Game Number")]
    pub game_number: u64,
    #[serde(rename = "Player Name")]
    pub player_name: String,
    #[serde(rename = "Moves")]
    pub moves: u32,
    #[serde(rename = "Time Taken")]
    pub time_taken: TimeTaken,
    #[serde(rename = "Date", with = "date_format")]
    pub date: Date,
    #[serde(rename = "Time", with = "time_format")]
    pub time: Time,
}

impl ScoreRecord {
    pub fn new(game_number: u64, round: &FinishedRound, at: OffsetDateTime) -> Self {
        Self {
            game_number,
            player_name: round.player_name.clone(),
            moves: round.moves,
            time_taken: round.time_taken,
            date: at.date(),
            // sub-second precision is not stored
            time: at.time().replace_nanosecond(0).unwrap_or(at.time()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn new_copies_round_and_stamp() {
        let round = FinishedRound {
            player_name: "ada".to_string(),
            moves: 12,
            time_taken: TimeTaken::from_centis(4_213),
        };

        let record = ScoreRecord::new(3, &round, datetime!(2026-10-19 14:05:09.75 UTC));

        assert_eq!(record.game_number, 3);
        assert_eq!(record.player_name, "ada");
        assert_eq!(record.moves, 12);
        assert_eq!(record.time_taken.to_string(), "42.13");
        assert_eq!(record.date.to_string(), "2026-10-19");
        assert_eq!(record.time.nanosecond(), 0);
        assert_eq!(record.time.second(), 9);
    }
}
