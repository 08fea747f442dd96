use std::fmt;

use threadview_engine::{EngineError, InitialWindow, SearchEngine};
use threadview_types::{Edge, Message, MessageId, Thread, ThreadId};

/// Identifies one episode of the controller (an archive load, a navigation,
/// an open-thread session). Tokens are unique and increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl SessionToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    LoadArchive,
    /// `query` is the text as the user typed it, kept for display
    Search { query: String },
    SelectThread { thread_id: ThreadId },
    Fetch(Edge),
}

/// Captured at request time and checked when the result comes back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Archive epoch the request was issued under
    pub archive: SessionToken,
    /// Navigation or thread session the request belongs to
    pub token: SessionToken,
    pub kind: CallKind,
}

pub enum EngineRequest {
    LoadArchive { raw: String },
    FindThreads { query: String },
    LoadInitialWindow { thread_id: ThreadId, query: String },
    LoadRange { lo: MessageId, hi: MessageId, query: String },
}

impl fmt::Debug for EngineRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineRequest::LoadArchive { raw } => f
                .debug_struct("LoadArchive")
                .field("bytes", &raw.len())
                .finish(),
            EngineRequest::FindThreads { query } => {
                f.debug_struct("FindThreads").field("query", query).finish()
            }
            EngineRequest::LoadInitialWindow { thread_id, query } => f
                .debug_struct("LoadInitialWindow")
                .field("thread_id", thread_id)
                .field("query", query)
                .finish(),
            EngineRequest::LoadRange { lo, hi, query } => f
                .debug_struct("LoadRange")
                .field("lo", lo)
                .field("hi", hi)
                .field("query", query)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    ArchiveLoaded,
    Threads(Vec<Thread>),
    InitialWindow(InitialWindow),
    Range(Vec<Message>),
}

/// A request the controller wants run against the engine
#[derive(Debug)]
pub struct EngineCall {
    pub ticket: Ticket,
    pub request: EngineRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutcome {
    pub ticket: Ticket,
    pub result: Result<EngineReply, EngineError>,
}

impl EngineCall {
    pub fn new(ticket: Ticket, request: EngineRequest) -> Self {
        Self { ticket, request }
    }

    /// Run the request. Never touches controller state.
    pub async fn execute(self, engine: &dyn SearchEngine) -> EngineOutcome {
        let result = match self.request {
            EngineRequest::LoadArchive { raw } => engine
                .load_archive(&raw)
                .await
                .map(|()| EngineReply::ArchiveLoaded),
            EngineRequest::FindThreads { query } => {
                engine.find_threads(&query).await.map(EngineReply::Threads)
            }
            EngineRequest::LoadInitialWindow { thread_id, query } => engine
                .load_initial_window(&thread_id, &query)
                .await
                .map(EngineReply::InitialWindow),
            EngineRequest::LoadRange { lo, hi, query } => engine
                .load_range(lo, hi, &query)
                .await
                .map(EngineReply::Range),
        };

        EngineOutcome {
            ticket: self.ticket,
            result,
        }
    }

    /// The inclusive id range of a paging request
    pub fn range(&self) -> Option<(MessageId, MessageId)> {
        match self.request {
            EngineRequest::LoadRange { lo, hi, .. } => Some((lo, hi)),
            _ => None,
        }
    }
}

impl EngineOutcome {
    pub fn new(ticket: Ticket, result: Result<EngineReply, EngineError>) -> Self {
        Self { ticket, result }
    }
}
