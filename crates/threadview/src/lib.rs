//! # Threadview
//!
//! Browse an exported chat archive without loading it into the view at once:
//! search threads by keyword, open one, and page through its messages in
//! either direction.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use threadview::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let raw = std::fs::read_to_string("result.json")?;
//!     let engine = Arc::new(ArchiveEngine::default());
//!
//!     let (browser, mut events) = Browser::new(engine).spawn();
//!     browser.load_archive(raw).await?;
//!     browser.search("trip").await?;
//!
//!     while let Some(event) = events.recv().await {
//!         if let BrowseEvent::View(ViewModel::Threads(list)) = event {
//!             if !list.loading {
//!                 for thread in &list.threads {
//!                     println!("{} {}", thread.thread_id, thread.title_text);
//!                 }
//!                 break;
//!             }
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`threadview-types`**: threads, messages, intents and view models
//! - **`threadview-engine`**: the `SearchEngine` contract and an in-memory
//!   engine over Telegram JSON exports
//! - **`threadview-browse`**: the browsing controller, its window store and
//!   an async runtime driving it
//!
//! Results are tagged with the session they were requested for; anything the
//! user has since navigated away from is discarded, so the open window never
//! mixes messages of two threads and never shows gaps or duplicates.

pub use threadview_types::{
    Edge, Intent, Message, MessageId, TextSpan, Thread, ThreadId, ThreadListView, ThreadView,
    ViewModel,
};

pub use threadview_engine::{
    ArchiveEngine, ArchiveEngineConfig, EngineError, InitialWindow, Lemmatizer,
    LowercaseLemmatizer, SearchEngine, StemmingLemmatizer,
};

pub use threadview_browse::{
    fetch_range, BrowseConfig, BrowseEvent, BrowseState, Browser, BrowserClosed, BrowserHandle,
    BrowsingController, EngineCall, EngineOutcome, Listing, ThreadSession, WindowStore,
};

pub mod prelude;

// Re-export async-trait for custom engines
pub use async_trait::async_trait;
