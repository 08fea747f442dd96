use std::collections::HashSet;

use threadview_types::TextSpan;

use super::export::TextEntity;
use super::index::normalize_word;
use crate::lemmatizer::Lemmatizer;

/// Search terms used to mark highlighted words in rendered messages
pub(crate) struct Highlighter<'a> {
    terms: HashSet<String>,
    lemmatizer: &'a dyn Lemmatizer,
    min_word_len: usize,
}

impl<'a> Highlighter<'a> {
    pub(crate) fn new(
        words: impl IntoIterator<Item = String>,
        lemmatizer: &'a dyn Lemmatizer,
        min_word_len: usize,
    ) -> Self {
        let terms = words
            .into_iter()
            .filter_map(|w| normalize_word(&w, lemmatizer, min_word_len))
            .collect();
        Self {
            terms,
            lemmatizer,
            min_word_len,
        }
    }

    fn matches(&self, word: &str) -> bool {
        normalize_word(word, self.lemmatizer, self.min_word_len)
            .is_some_and(|lemma| self.terms.contains(&lemma))
    }

    pub(crate) fn spans(&self, entities: &[TextEntity]) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        for entity in entities {
            match entity {
                TextEntity::Lemmatizable(text) if !self.terms.is_empty() => {
                    self.split_into(text, &mut spans)
                }
                other => push_plain(&mut spans, other.as_str()),
            }
        }
        spans
    }

    fn split_into(&self, text: &str, spans: &mut Vec<TextSpan>) {
        let mut rest = text;
        while !rest.is_empty() {
            let word_end = rest
                .find(|c: char| !c.is_alphanumeric())
                .unwrap_or(rest.len());
            let (word, tail) = rest.split_at(word_end);
            if !word.is_empty() {
                if self.matches(word) {
                    spans.push(TextSpan::Highlight(word.to_string()));
                } else {
                    push_plain(spans, word);
                }
            }

            let gap_end = tail.find(char::is_alphanumeric).unwrap_or(tail.len());
            let (gap, tail) = tail.split_at(gap_end);
            push_plain(spans, gap);
            rest = tail;
        }
    }
}

fn push_plain(spans: &mut Vec<TextSpan>, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(TextSpan::Plain(last)) => last.push_str(text),
        _ => spans.push(TextSpan::Plain(text.to_string())),
    }
}
