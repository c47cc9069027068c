use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::*;

/// Number of entries kept on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
}

impl LeaderboardEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Top scores, highest first. Equal scores keep their insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(LEADERBOARD_SIZE + 1),
        }
    }

    /// Builds a board from entries in insertion order, sorting and trimming
    /// them the same way [`Leaderboard::insert`] does.
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `score` would make it onto the board.
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < LEADERBOARD_SIZE
            || self.entries.last().is_some_and(|last| score > last.score)
    }

    /// Adds an entry and returns its 1-based rank, or `None` if it fell off
    /// the bottom of the board.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .filter(|existing| existing.score >= entry.score)
            .count();
        self.entries.push(entry);
        self.normalize();
        (position < LEADERBOARD_SIZE).then_some(position + 1)
    }

    fn normalize(&mut self) {
        // `sort_by` is stable, so ties keep insertion order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_SIZE);
    }
}

/// Persistence for the leaderboard. Only whole boards are read and written.
pub trait LeaderboardStore {
    fn read(&self) -> Result<Leaderboard>;

    fn write(&mut self, board: &Leaderboard) -> Result<()>;

    /// Reads the board, treating any storage problem as an empty board.
    fn load(&self) -> Leaderboard {
        match self.read() {
            Ok(board) => board,
            Err(err) => {
                log::warn!("Falling back to an empty leaderboard: {}", err);
                Leaderboard::new()
            }
        }
    }

    /// Records a score and returns its rank on the updated board.
    fn submit(&mut self, name: &str, score: u32) -> Result<Option<usize>> {
        let mut board = self.load();
        let rank = board.insert(LeaderboardEntry::new(name, score));
        self.write(&board)?;
        log::info!("Submitted score {} for {:?}, rank {:?}", score, name, rank);
        Ok(rank)
    }
}

/// Leaderboard kept as a JSON array of `{"name", "score"}` records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub const DEFAULT_FILE_NAME: &'static str = "leaderboard.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(Self::DEFAULT_FILE_NAME));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_to(path: &Path, board: &Leaderboard) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, board)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE_NAME)
    }
}

impl LeaderboardStore for FileStore {
    fn read(&self) -> Result<Leaderboard> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No leaderboard at {}", self.path.display());
                return Ok(Leaderboard::new());
            }
            Err(err) => return Err(err.into()),
        };
        let entries: Vec<LeaderboardEntry> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Leaderboard::from_entries(entries))
    }

    fn write(&mut self, board: &Leaderboard) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.temp_path();
        let written = Self::write_to(&temp_path, board)
            .and_then(|()| fs::rename(&temp_path, &self.path).map_err(GameError::from));
        if written.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        written
    }
}

/// Leaderboard held in memory only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    board: Leaderboard,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_board(board: Leaderboard) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }
}

impl LeaderboardStore for MemoryStore {
    fn read(&self) -> Result<Leaderboard> {
        Ok(self.board.clone())
    }

    fn write(&mut self, board: &Leaderboard) -> Result<()> {
        self.board = board.clone();
        Ok(())
    }
}
