use serde::{Deserialize, Serialize};

use crate::message::{Message, MessageId};
use crate::thread::{Thread, ThreadId};

/// Render-ready snapshot of the browsing state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewModel {
    /// Nothing loaded yet; `loading` while an archive load is outstanding
    Empty { loading: bool },
    Threads(ThreadListView),
    Thread(ThreadView),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadListView {
    pub query: String,
    pub threads: Vec<Thread>,
    /// A search or thread selection is outstanding
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadView {
    pub thread_id: ThreadId,
    pub title: Option<String>,
    pub messages: Vec<Message>,
    pub more_before: bool,
    pub more_after: bool,
    pub loading_before: bool,
    pub loading_after: bool,
}

impl ViewModel {
    pub fn threads(&self) -> Option<&[Thread]> {
        match self {
            ViewModel::Threads(list) => Some(&list.threads),
            _ => None,
        }
    }

    pub fn thread(&self) -> Option<&ThreadView> {
        match self {
            ViewModel::Thread(view) => Some(view),
            _ => None,
        }
    }
}

impl ThreadView {
    pub fn message_ids(&self) -> Vec<MessageId> {
        self.messages.iter().map(|m| m.message_id).collect()
    }
}
