use std::path::PathBuf;

use threadview_types::{Intent, ThreadId};

use crate::error::{CliError, Result};

pub const HELP: &str = "\
Commands:
  load <path>       load a chat export (result.json)
  search <query>    find threads; `/ <query>` for short, empty lists all
                    words are ANDed, `|` or `or` for OR, parentheses group
  open <thread-id>  open a thread
  older             load older messages
  newer             load newer messages
  back              return to the thread list
  help              show this text
  quit              exit";

/// One line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Search(String),
    Open(ThreadId),
    Older,
    Newer,
    Back,
    Help,
    Quit,
}

impl Command {
    /// Parse a line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        if let Some(query) = line.strip_prefix('/') {
            return Ok(Some(Command::Search(query.trim().to_string())));
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "load" => Command::Load(PathBuf::from(required(rest, "load")?)),
            "search" | "s" => Command::Search(rest.to_string()),
            "open" | "o" => Command::Open(ThreadId::new(required(rest, "open")?)),
            "older" | "k" => Command::Older,
            "newer" | "j" => Command::Newer,
            "back" | "close" => Command::Back,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(CliError::UnknownCommand(word.to_string())),
        };
        Ok(Some(command))
    }

    /// Intent for commands the browser handles directly. `Load` needs the
    /// file read first; `Help` and `Quit` never reach the browser.
    pub fn into_intent(self) -> Option<Intent> {
        match self {
            Command::Search(query) => Some(Intent::Search(query)),
            Command::Open(thread_id) => Some(Intent::SelectThread(thread_id)),
            Command::Older => Some(Intent::LoadMoreBefore),
            Command::Newer => Some(Intent::LoadMoreAfter),
            Command::Back => Some(Intent::CloseThread),
            Command::Load(_) | Command::Help | Command::Quit => None,
        }
    }
}

fn required<'a>(arg: &'a str, command: &'static str) -> Result<&'a str> {
    if arg.is_empty() {
        Err(CliError::MissingArgument(command))
    } else {
        Ok(arg)
    }
}
