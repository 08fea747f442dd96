pub mod thread;
pub mod message;
pub mod intent;
pub mod view;

pub use thread::{Thread, ThreadId};
pub use message::{Message, MessageId, TextSpan};
pub use intent::{Edge, Intent};
pub use view::{ThreadListView, ThreadView, ViewModel};
