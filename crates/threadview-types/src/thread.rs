use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque thread identifier handed out by the search engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One conversation of the archive, as returned by a thread search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub thread_id: ThreadId,
    pub title_text: String,
    pub date_unixtime: i64,
}

impl Thread {
    pub fn new(
        thread_id: impl Into<ThreadId>,
        title_text: impl Into<String>,
        date_unixtime: i64,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            title_text: title_text.into(),
            date_unixtime,
        }
    }

    /// Thread date in UTC, `None` when the timestamp is out of range
    pub fn date(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date_unixtime, 0)
    }
}
