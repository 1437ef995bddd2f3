//! # Order Sequence Module
//!
//! Produces human-readable order numbers `T<YYYYMMDD>-<seq>` where the
//! sequence restarts at 1 every calendar day and survives process restarts
//! through a small JSON file `{"date": "YYYYMMDD", "seq": n}`.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Source of unique order numbers
pub trait OrderCounter: Send + Sync {
    fn next_order_number(&self) -> String;
}

/// Persisted counter state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceState {
    pub date: String,
    pub seq: u32,
}

impl SequenceState {
    /// Advance to the next number for `today`, resetting on a new date
    pub fn advance(&mut self, today: NaiveDate) -> String {
        let date = today.format("%Y%m%d").to_string();
        if self.date != date {
            self.date = date;
            self.seq = 0;
        }
        self.seq += 1;
        format_order_number(&self.date, self.seq)
    }
}

pub fn format_order_number(date: &str, seq: u32) -> String {
    format!("T{date}-{seq:04}")
}

/// Order counter backed by a JSON file
#[derive(Debug)]
pub struct FileOrderCounter {
    path: PathBuf,
    state: Mutex<SequenceState>,
}

impl FileOrderCounter {
    /// Open the counter file, starting fresh when it is missing or unreadable
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = Self::load(&path);
        debug!(path = %path.display(), date = %state.date, seq = state.seq, "Loaded order sequence");
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    fn load(path: &Path) -> SequenceState {
        if !path.exists() {
            return SequenceState::default();
        }
        match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from))
        {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Order sequence file unreadable, starting a new sequence");
                SequenceState::default()
            }
        }
    }

    fn save(&self, state: &SequenceState) -> anyhow::Result<()> {
        let content = serde_json::to_string(state)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Next order number for an explicit date
    pub fn next_for_date(&self, today: NaiveDate) -> String {
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let order_number = state.advance(today);
        if let Err(e) = self.save(&state) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist order sequence");
        }
        order_number
    }
}

impl OrderCounter for FileOrderCounter {
    fn next_order_number(&self) -> String {
        self.next_for_date(Local::now().date_naive())
    }
}
