use std::fmt::Write;

use threadview_browse::BrowseEvent;
use threadview_types::{Edge, Message, TextSpan, Thread, ThreadListView, ThreadView, ViewModel};

use crate::config::DisplayConfig;

/// Plain-text presentation of view models. Holds no browsing state.
pub struct Renderer {
    date_format: String,
}

/// Message text with highlighted spans in brackets
pub fn render_spans(spans: &[TextSpan]) -> String {
    spans
        .iter()
        .map(|span| match span {
            TextSpan::Plain(text) => text.clone(),
            TextSpan::Highlight(text) => format!("[{}]", text),
        })
        .collect()
}

impl Renderer {
    pub fn new(display: &DisplayConfig) -> Self {
        Self {
            date_format: display.date_format.clone(),
        }
    }

    pub fn format_date(&self, thread: &Thread) -> String {
        match thread.date() {
            Some(date) => date.format(&self.date_format).to_string(),
            None => "unknown date".to_string(),
        }
    }

    /// Text for an event, `None` for views still waiting on the engine
    pub fn render_event(&self, event: &BrowseEvent) -> Option<String> {
        match event {
            BrowseEvent::View(view) if is_settled(view) => Some(self.render(view)),
            BrowseEvent::View(_) => None,
            BrowseEvent::NothingToFetch(Edge::Before) => Some("No older messages.".to_string()),
            BrowseEvent::NothingToFetch(Edge::After) => Some("No newer messages.".to_string()),
            BrowseEvent::Failed(e) => Some(format!("Error: {}", e)),
        }
    }

    pub fn render(&self, view: &ViewModel) -> String {
        match view {
            ViewModel::Empty { loading: true } => "Loading archive...".to_string(),
            ViewModel::Empty { loading: false } => {
                "No archive loaded. Use `load <path>`.".to_string()
            }
            ViewModel::Threads(list) => self.render_threads(list),
            ViewModel::Thread(thread) => render_thread(thread),
        }
    }

    fn render_threads(&self, list: &ThreadListView) -> String {
        let mut out = String::new();
        if list.query.is_empty() {
            let _ = writeln!(out, "All threads ({})", list.threads.len());
        } else {
            let _ = writeln!(out, "Threads matching \"{}\" ({})", list.query, list.threads.len());
        }

        if list.threads.is_empty() {
            out.push_str("  no threads found\n");
        }
        for thread in &list.threads {
            let _ = writeln!(
                out,
                "  {:>8}  {}  {}",
                thread.thread_id,
                self.format_date(thread),
                thread.title_text
            );
        }
        if list.loading {
            out.push_str("  (searching...)\n");
        }
        out.truncate(out.trim_end().len());
        out
    }
}

fn is_settled(view: &ViewModel) -> bool {
    match view {
        ViewModel::Empty { loading } => !loading,
        ViewModel::Threads(list) => !list.loading,
        ViewModel::Thread(thread) => !thread.loading_before && !thread.loading_after,
    }
}

fn render_message(out: &mut String, message: &Message) {
    if let Some(reply) = &message.reply_to_text {
        let first_line = reply.lines().next().unwrap_or("");
        let _ = writeln!(out, "          > {}", first_line);
    }
    let text = render_spans(&message.text);
    let mut lines = text.lines();
    let _ = writeln!(out, "  {:>6}  {}", format!("#{}", message.message_id), lines.next().unwrap_or(""));
    for line in lines {
        let _ = writeln!(out, "          {}", line);
    }
}

fn render_thread(thread: &ThreadView) -> String {
    let mut out = String::new();
    match &thread.title {
        Some(title) => {
            let _ = writeln!(out, "Thread {}: {}", thread.thread_id, title);
        }
        None => {
            let _ = writeln!(out, "Thread {}", thread.thread_id);
        }
    }

    if thread.more_before {
        out.push_str("  ... `older` for earlier messages\n");
    }
    for message in &thread.messages {
        render_message(&mut out, message);
    }
    if thread.more_after {
        out.push_str("  ... `newer` for later messages\n");
    }
    out.truncate(out.trim_end().len());
    out
}
