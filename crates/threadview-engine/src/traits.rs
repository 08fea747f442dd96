use async_trait::async_trait;
use threadview_types::{Message, MessageId, Thread, ThreadId};

use crate::error::Result;

/// First window of an opened thread together with its boundary flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialWindow {
    pub messages: Vec<Message>,
    pub more_before: bool,
    pub more_after: bool,
}

impl InitialWindow {
    pub fn new(messages: Vec<Message>, more_before: bool, more_after: bool) -> Self {
        Self {
            messages,
            more_before,
            more_after,
        }
    }
}

/// Search/index engine operations the browser depends on
///
/// Only `load_archive` mutates the engine. The read operations may be
/// issued concurrently against the loaded archive. `query` arguments on the
/// window operations carry the active search so matches can be highlighted;
/// an empty query highlights nothing.
#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Parse and install an archive, replacing the previous one
    async fn load_archive(&self, raw: &str) -> Result<()>;

    /// Threads matching `query`; an empty query returns every thread
    async fn find_threads(&self, query: &str) -> Result<Vec<Thread>>;

    /// Default-sized window anchored at the start of the thread
    async fn load_initial_window(&self, thread_id: &ThreadId, query: &str)
        -> Result<InitialWindow>;

    /// Messages with `lo <= message_id <= hi`, in id order
    async fn load_range(&self, lo: MessageId, hi: MessageId, query: &str)
        -> Result<Vec<Message>>;
}
