pub mod command;
pub mod config;
pub mod error;
pub mod render;

pub use command::{Command, HELP};
pub use crate::config::{Config, DisplayConfig, LoggingConfig};
pub use error::{CliError, Result};
pub use render::Renderer;
