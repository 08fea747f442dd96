use std::path::PathBuf;

use thiserror::Error;
use threadview_browse::BrowserClosed;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to read archive {}: {source}", .path.display())]
    ReadArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown command `{0}` (try `help`)")]
    UnknownCommand(String),

    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Browser(#[from] BrowserClosed),
}

pub type Result<T> = std::result::Result<T, CliError>;
