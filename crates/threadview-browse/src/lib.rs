pub mod config;
pub mod window;
pub mod call;
pub mod controller;
pub mod runtime;

pub use config::BrowseConfig;
pub use window::WindowStore;
pub use call::{CallKind, EngineCall, EngineOutcome, EngineReply, EngineRequest, SessionToken, Ticket};
pub use controller::{fetch_range, BrowseState, BrowsingController, Listing, ThreadSession};
pub use runtime::{BrowseEvent, Browser, BrowserClosed, BrowserHandle};

// Re-export the contract the controller drives
pub use threadview_engine::{EngineError, InitialWindow, SearchEngine};
pub use threadview_types::{Edge, Intent, Message, MessageId, Thread, ThreadId, ViewModel};
