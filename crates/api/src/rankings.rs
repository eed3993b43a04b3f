use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

const DEFAULT_LIST_LIMIT: usize = 20;
const MAX_LIST_LIMIT: usize = 100;
const RETENTION_CAP: usize = 1_000;
const MAX_NAME_CHARS: usize = 10;
const MIN_RETURN_RATE: f64 = -100.0;
const MAX_RETURN_RATE: f64 = 10_000.0;
const MAX_FINAL_VALUE: f64 = 100_000_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub id: u64,
    pub name: String,
    pub return_rate: f64,
    pub final_value: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRanking {
    pub name: String,
    pub return_rate: f64,
    pub final_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingError {
    EmptyName,
    NameTooLong,
    InvalidReturnRate,
    InvalidFinalValue,
}

impl fmt::Display for RankingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name is required"),
            Self::NameTooLong => write!(f, "name must be 1-10 characters"),
            Self::InvalidReturnRate => write!(f, "return rate is out of range"),
            Self::InvalidFinalValue => write!(f, "final value is out of range"),
        }
    }
}

impl std::error::Error for RankingError {}

/// The ranking collaborator: ordered by descending return rate, capped at the
/// top 1000 entries, optionally persisted to a JSON file. A failed save never
/// fails the request; the entry stays in memory.
#[derive(Clone)]
pub struct RankingStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    entries: Mutex<Vec<Ranking>>,
    next_id: AtomicU64,
    path: Option<PathBuf>,
}

impl RankingStore {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                entries: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
                path: None,
            }),
        }
    }

    /// Loads any existing rankings from `path`; a missing or unreadable file
    /// starts the store empty.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries = load_entries(&path);
        entries.sort_by(|a, b| b.return_rate.total_cmp(&a.return_rate));
        let max_id = entries.iter().map(|entry| entry.id).max().unwrap_or(0);

        Self {
            inner: Arc::new(StoreInner {
                entries: Mutex::new(entries),
                next_id: AtomicU64::new(max_id),
                path: Some(path),
            }),
        }
    }

    pub fn create(&self, new: NewRanking) -> Result<Ranking, RankingError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(RankingError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(RankingError::NameTooLong);
        }
        if !new.return_rate.is_finite()
            || !(MIN_RETURN_RATE..=MAX_RETURN_RATE).contains(&new.return_rate)
        {
            return Err(RankingError::InvalidReturnRate);
        }
        if !new.final_value.is_finite()
            || new.final_value < 0.0
            || new.final_value > MAX_FINAL_VALUE
        {
            return Err(RankingError::InvalidFinalValue);
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let ranking = Ranking {
            id,
            name: name.to_owned(),
            return_rate: new.return_rate,
            final_value: new.final_value.floor() as u64,
            created_at: OffsetDateTime::now_utc(),
        };

        let mut entries = self.lock_entries();
        entries.push(ranking.clone());
        entries.sort_by(|a, b| b.return_rate.total_cmp(&a.return_rate));
        entries.truncate(RETENTION_CAP);
        self.persist(&entries);

        Ok(ranking)
    }

    /// Top entries by descending return rate; `limit` is clamped to 1..=100
    /// and defaults to 20.
    pub fn list(&self, limit: Option<usize>) -> Vec<Ranking> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        self.lock_entries().iter().take(limit).cloned().collect()
    }

    pub fn clear(&self) {
        let mut entries = self.lock_entries();
        entries.clear();
        self.persist(&entries);
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    fn lock_entries(&self) -> MutexGuard<'_, Vec<Ranking>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &[Ranking]) {
        let Some(path) = self.inner.path.as_deref() else {
            return;
        };
        if let Err(err) = write_entries(path, entries) {
            warn!(path = %path.display(), %err, "failed to save rankings; entries remain in memory");
        }
    }
}

fn load_entries(path: &Path) -> Vec<Ranking> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read rankings file; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&data) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %path.display(), %err, "rankings file is not valid JSON; starting empty");
            Vec::new()
        }
    }
}

fn write_entries(path: &Path, entries: &[Ranking]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(entries).map_err(io::Error::other)?;
    fs::write(path, data)
}
