use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveEngineConfig {
    /// Messages returned when a thread is first opened
    pub initial_window: usize,
    /// Words shorter than this (in characters) are neither indexed nor searched
    pub min_word_len: usize,
    /// Thread titles are cut to this many characters
    pub title_max_chars: usize,
    /// Stemming language for index and query words (`none` matches exact words)
    pub language: String,
}

impl Default for ArchiveEngineConfig {
    fn default() -> Self {
        Self {
            initial_window: 20,
            min_word_len: 4,
            title_max_chars: 80,
            language: "english".to_string(),
        }
    }
}

impl ArchiveEngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_window(mut self, size: usize) -> Self {
        self.initial_window = size;
        self
    }

    pub fn with_min_word_len(mut self, len: usize) -> Self {
        self.min_word_len = len;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_title_max_chars(mut self, max: usize) -> Self {
        self.title_max_chars = max;
        self
    }
}
