use serde::{Deserialize, Serialize};

/// Global, strictly increasing message identifier. Gaps are allowed.
pub type MessageId = u64;

/// A run of message text, highlighted when it matches the active search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum TextSpan {
    Plain(String),
    Highlight(String),
}

impl TextSpan {
    pub fn as_str(&self) -> &str {
        match self {
            TextSpan::Plain(text) | TextSpan::Highlight(text) => text,
        }
    }

    pub fn is_highlight(&self) -> bool {
        matches!(self, TextSpan::Highlight(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub text: Vec<TextSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_text: Option<String>,
}

impl Message {
    /// Message with a single plain span
    pub fn new(message_id: MessageId, text: impl Into<String>) -> Self {
        let text = text.into();
        let spans = if text.is_empty() {
            Vec::new()
        } else {
            vec![TextSpan::Plain(text)]
        };
        Self {
            message_id,
            text: spans,
            reply_to_text: None,
        }
    }

    pub fn with_spans(message_id: MessageId, spans: Vec<TextSpan>) -> Self {
        Self {
            message_id,
            text: spans,
            reply_to_text: None,
        }
    }

    pub fn with_reply_to(mut self, reply_to_text: impl Into<String>) -> Self {
        self.reply_to_text = Some(reply_to_text.into());
        self
    }

    /// Full message text with highlighting stripped
    pub fn plain_text(&self) -> String {
        self.text.iter().map(TextSpan::as_str).collect()
    }

    pub fn has_highlight(&self) -> bool {
        self.text.iter().any(TextSpan::is_highlight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_joins_spans() {
        let message = Message::with_spans(
            7,
            vec![
                TextSpan::Plain("see you at the ".into()),
                TextSpan::Highlight("station".into()),
                TextSpan::Plain("!".into()),
            ],
        );

        assert_eq!(message.plain_text(), "see you at the station!");
        assert!(message.has_highlight());
    }

    #[test]
    fn test_empty_text_has_no_spans() {
        let message = Message::new(1, "");
        assert!(message.text.is_empty());
        assert_eq!(message.plain_text(), "");
    }

    #[test]
    fn test_span_serialization() {
        let span = TextSpan::Highlight("trip".into());
        let json = serde_json::to_value(&span).unwrap();

        assert_eq!(json["type"], "highlight");
        assert_eq!(json["text"], "trip");
    }
}
