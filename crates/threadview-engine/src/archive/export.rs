//! Telegram desktop JSON export reader.

use serde::Deserialize;
use threadview_types::MessageId;

use crate::error::{EngineError, Result};

/// A piece of message text. Only `Lemmatizable` text is indexed and highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TextEntity {
    Lemmatizable(String),
    Verbatim(String),
}

impl TextEntity {
    fn classify(kind: &str, text: String) -> Self {
        match kind {
            "link" | "text_link" | "url" | "mention" | "mention_name" | "email" | "phone"
            | "code" | "pre" | "bot_command" | "hashtag" | "cashtag" | "custom_emoji"
            | "bank_card" => TextEntity::Verbatim(text),
            _ => TextEntity::Lemmatizable(text),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match self {
            TextEntity::Lemmatizable(text) | TextEntity::Verbatim(text) => text,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ArchivedMessage {
    pub id: MessageId,
    pub date_unixtime: i64,
    pub entities: Vec<TextEntity>,
    pub reply_to: Option<MessageId>,
}

impl ArchivedMessage {
    pub(crate) fn text(&self) -> String {
        self.entities.iter().map(TextEntity::as_str).collect()
    }
}

#[derive(Deserialize)]
struct ExportFile {
    messages: Vec<RawMessage>,
}

#[derive(Deserialize)]
struct RawMessage {
    id: MessageId,
    #[serde(rename = "type", default = "default_kind")]
    kind: String,
    #[serde(default)]
    date_unixtime: Option<RawUnixTime>,
    #[serde(default)]
    text: Option<RawText>,
    #[serde(default)]
    text_entities: Option<Vec<RawEntity>>,
    #[serde(default)]
    reply_to_message_id: Option<MessageId>,
}

fn default_kind() -> String {
    "message".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUnixTime {
    Int(i64),
    Str(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Plain(String),
    Parts(Vec<RawTextPart>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTextPart {
    Plain(String),
    Entity(RawEntity),
}

#[derive(Deserialize)]
struct RawEntity {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

impl RawMessage {
    fn into_archived(self) -> Result<ArchivedMessage> {
        let date_unixtime = match self.date_unixtime {
            None => 0,
            Some(RawUnixTime::Int(secs)) => secs,
            Some(RawUnixTime::Str(secs)) => secs.trim().parse().map_err(|_| {
                EngineError::MalformedArchive(format!(
                    "message {}: invalid date_unixtime {:?}",
                    self.id, secs
                ))
            })?,
        };

        let entities = match (self.text_entities, self.text) {
            (Some(entities), _) => entities
                .into_iter()
                .map(|e| TextEntity::classify(&e.kind, e.text))
                .collect(),
            (None, Some(RawText::Plain(text))) => vec![TextEntity::Lemmatizable(text)],
            (None, Some(RawText::Parts(parts))) => parts
                .into_iter()
                .map(|part| match part {
                    RawTextPart::Plain(text) => TextEntity::Lemmatizable(text),
                    RawTextPart::Entity(e) => TextEntity::classify(&e.kind, e.text),
                })
                .collect(),
            (None, None) => Vec::new(),
        };

        Ok(ArchivedMessage {
            id: self.id,
            date_unixtime,
            entities: entities
                .into_iter()
                .filter(|e| !e.as_str().is_empty())
                .collect(),
            reply_to: self.reply_to_message_id,
        })
    }
}

/// Parse an export into its chat messages, sorted by id.
///
/// Service entries (joins, pins, calls) are dropped, which leaves gaps in the
/// id sequence.
pub(crate) fn parse_export(raw: &str) -> Result<Vec<ArchivedMessage>> {
    let export: ExportFile = serde_json::from_str(raw)?;

    let mut messages = export
        .messages
        .into_iter()
        .filter(|m| m.kind == "message")
        .map(RawMessage::into_archived)
        .collect::<Result<Vec<_>>>()?;

    messages.sort_by_key(|m| m.id);
    if let Some(pair) = messages.windows(2).find(|pair| pair[0].id == pair[1].id) {
        return Err(EngineError::MalformedArchive(format!(
            "duplicate message id {}",
            pair[0].id
        )));
    }

    Ok(messages)
}
