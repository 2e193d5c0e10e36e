use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use pairs_core::{FinishedRound, ScoreStore};
use time::OffsetDateTime;

use crate::*;

/// Score history kept in a CSV file with a header row.
///
/// The next game number is derived once when the file is opened, so appending never rereads the file.
#[derive(Debug)]
pub struct CsvScoreStore {
    path: PathBuf,
    next_game_number: u64,
    /// The last row on disk lacks its terminator and the next append must supply one.
    needs_line_break: bool,
}

impl CsvScoreStore {
    /// Opens the score file, creating it (and its parent directories) with a header row if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let has_content = fs::metadata(&path).map(|meta| meta.len() > 0).unwrap_or(false);
        let (existing, needs_line_break) = if has_content {
            (count_rows(&path)?, !ends_with_line_break(&path)?)
        } else {
            write_header(&path)?;
            (0, false)
        };

        log::debug!("Opened score file {} with {} records", path.display(), existing);
        Ok(Self {
            path,
            next_game_number: existing + 1,
            needs_line_break,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn next_game_number(&self) -> u64 {
        self.next_game_number
    }

    /// Appends a round stamped with the current local date and time.
    pub fn record(&mut self, round: &FinishedRound) -> Result<ScoreRecord> {
        self.record_at(round, now())
    }

    pub fn record_at(&mut self, round: &FinishedRound, at: OffsetDateTime) -> Result<ScoreRecord> {
        let record = ScoreRecord::new(self.next_game_number, round, at);

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        if self.needs_line_break {
            file.write_all(b"\n")?;
            self.needs_line_break = false;
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(&record)?;
        writer.flush()?;

        self.next_game_number += 1;
        Ok(record)
    }

    /// Every stored record in file order, failing on the first malformed row.
    pub fn history(&self) -> Result<Vec<ScoreRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader
            .deserialize()
            .enumerate()
            .map(|(index, row)| row.map_err(|err| row_error(index, err)))
            .collect()
    }

    /// Like [`CsvScoreStore::history`] but skips rows that cannot be read.
    pub fn history_lenient(&self) -> Result<Vec<ScoreRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for (index, row) in reader.deserialize().enumerate() {
            match row.map_err(|err| row_error(index, err)) {
                Ok(record) => records.push(record),
                Err(StoreError::MalformedRow { line, reason }) => {
                    log::warn!("Skipping score row at line {}: {}", line, reason);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(records)
    }
}

impl ScoreStore for CsvScoreStore {
    type Error = StoreError;

    fn append(&mut self, round: &FinishedRound) -> Result<u64> {
        self.record(round).map(|record| record.game_number)
    }
}

fn write_header(path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    writer.flush()?;
    Ok(())
}

fn ends_with_line_break(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn count_rows(path: &Path) -> Result<u64> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut count = 0;
    for row in reader.byte_records() {
        row?;
        count += 1;
    }
    Ok(count)
}

fn row_error(index: usize, err: csv::Error) -> StoreError {
    if let csv::ErrorKind::Io(_) = err.kind() {
        return StoreError::Csv(err);
    }
    // header is line 1
    let line = err
        .position()
        .map(|pos| pos.line())
        .unwrap_or(index as u64 + 2);
    StoreError::MalformedRow {
        line,
        reason: err.to_string(),
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|err| {
        log::warn!("Local time offset unavailable ({}), stamping scores in UTC", err);
        OffsetDateTime::now_utc()
    })
}
