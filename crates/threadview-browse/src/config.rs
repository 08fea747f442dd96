use serde::{Deserialize, Serialize};
use threadview_types::MessageId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
    /// Ids requested beyond the window edge per paging step (the range spans
    /// `page_size + 1` ids)
    pub page_size: MessageId,
    /// Capacity of the intent and event channels of a spawned browser
    pub event_buffer: usize,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            event_buffer: 64,
        }
    }
}

impl BrowseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: MessageId) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }
}
