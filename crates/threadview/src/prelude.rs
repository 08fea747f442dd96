//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use threadview::prelude::*;
//! ```

pub use crate::{
    ArchiveEngine, ArchiveEngineConfig, BrowseConfig, BrowseEvent, Browser, BrowserHandle,
    BrowsingController, Edge, EngineError, Intent, Message, SearchEngine, Thread, ThreadId,
    ViewModel,
};
