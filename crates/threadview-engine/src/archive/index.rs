use std::collections::{HashMap, HashSet};

use super::export::{ArchivedMessage, TextEntity};
use crate::lemmatizer::Lemmatizer;

/// Alphanumeric runs of `text`
pub(crate) fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Index key for `word`, or `None` when the word is too short to index
pub(crate) fn normalize_word(
    word: &str,
    lemmatizer: &dyn Lemmatizer,
    min_word_len: usize,
) -> Option<String> {
    if word.chars().count() < min_word_len {
        return None;
    }
    Some(lemmatizer.lemmatize(&word.to_lowercase()))
}

/// Inverted index from lemma to the ascending list of threads using it
#[derive(Debug, Default)]
pub(crate) struct WordIndex {
    postings: HashMap<String, Vec<usize>>,
}

impl WordIndex {
    pub(crate) fn build(
        messages: &[ArchivedMessage],
        threads: &[Vec<usize>],
        lemmatizer: &dyn Lemmatizer,
        min_word_len: usize,
    ) -> Self {
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();

        for (thread, members) in threads.iter().enumerate() {
            let mut seen = HashSet::new();
            let texts = members
                .iter()
                .flat_map(|&pos| messages[pos].entities.iter())
                .filter_map(|entity| match entity {
                    TextEntity::Lemmatizable(text) => Some(text.as_str()),
                    TextEntity::Verbatim(_) => None,
                });

            for text in texts {
                for lemma in words(text).filter_map(|w| normalize_word(w, lemmatizer, min_word_len)) {
                    if seen.insert(lemma.clone()) {
                        postings.entry(lemma).or_default().push(thread);
                    }
                }
            }
        }

        Self { postings }
    }

    pub(crate) fn lookup(&self, lemma: &str) -> &[usize] {
        self.postings.get(lemma).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn len(&self) -> usize {
        self.postings.len()
    }
}
