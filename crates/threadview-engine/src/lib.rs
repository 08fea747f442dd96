pub mod error;
pub mod traits;
pub mod config;
pub mod lemmatizer;
pub mod archive;

pub use error::{EngineError, Result};
pub use traits::{InitialWindow, SearchEngine};
pub use config::ArchiveEngineConfig;
pub use lemmatizer::{lemmatizer_for, Lemmatizer, LowercaseLemmatizer, StemmingLemmatizer};
pub use archive::ArchiveEngine;
