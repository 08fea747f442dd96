use serde::{Deserialize, Serialize};

use crate::thread::ThreadId;

/// Older (`Before`) or newer (`After`) boundary of the message window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Before,
    After,
}

/// User intents emitted by a view renderer
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "value", rename_all = "snake_case")]
pub enum Intent {
    /// Raw archive text to hand to the engine
    LoadArchive(String),
    Search(String),
    SelectThread(ThreadId),
    LoadMoreBefore,
    LoadMoreAfter,
    /// Leave the open thread and return to the listing it was opened from
    CloseThread,
}

impl Intent {
    pub fn load_more(edge: Edge) -> Self {
        match edge {
            Edge::Before => Intent::LoadMoreBefore,
            Edge::After => Intent::LoadMoreAfter,
        }
    }

    /// The window edge this intent extends, if it is a paging intent
    pub fn edge(&self) -> Option<Edge> {
        match self {
            Intent::LoadMoreBefore => Some(Edge::Before),
            Intent::LoadMoreAfter => Some(Edge::After),
            _ => None,
        }
    }
}

// Archive text can be megabytes; keep it out of logs.
impl std::fmt::Debug for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::LoadArchive(raw) => f
                .debug_struct("LoadArchive")
                .field("bytes", &raw.len())
                .finish(),
            Intent::Search(query) => f.debug_tuple("Search").field(query).finish(),
            Intent::SelectThread(id) => f.debug_tuple("SelectThread").field(id).finish(),
            Intent::LoadMoreBefore => f.write_str("LoadMoreBefore"),
            Intent::LoadMoreAfter => f.write_str("LoadMoreAfter"),
            Intent::CloseThread => f.write_str("CloseThread"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_more_edges() {
        assert_eq!(Intent::load_more(Edge::Before), Intent::LoadMoreBefore);
        assert_eq!(Intent::LoadMoreAfter.edge(), Some(Edge::After));
        assert_eq!(Intent::Search("trip".into()).edge(), None);
    }

    #[test]
    fn test_load_archive_debug_hides_payload() {
        let intent = Intent::LoadArchive("{\"messages\": []}".into());
        let debug = format!("{:?}", intent);

        assert!(debug.contains("bytes"));
        assert!(!debug.contains("messages"));
    }
}
