use rust_stemmers::{Algorithm, Stemmer};

/// Maps a lowercased word to the form stored in the index
pub trait Lemmatizer: Send + Sync {
    fn lemmatize(&self, word: &str) -> String;
}

/// Case folding only; every word is its own lemma
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseLemmatizer;

impl Lemmatizer for LowercaseLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        word.to_lowercase()
    }
}

/// Snowball stemming, so inflected forms ("trips", "planning") share a lemma
pub struct StemmingLemmatizer {
    stemmer: Stemmer,
}

impl StemmingLemmatizer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            stemmer: Stemmer::create(algorithm),
        }
    }

    /// Stemmer for a language name such as `english` or `russian`
    pub fn for_language(language: &str) -> Option<Self> {
        let algorithm = match language.trim().to_lowercase().as_str() {
            "arabic" => Algorithm::Arabic,
            "danish" => Algorithm::Danish,
            "dutch" => Algorithm::Dutch,
            "english" => Algorithm::English,
            "finnish" => Algorithm::Finnish,
            "french" => Algorithm::French,
            "german" => Algorithm::German,
            "greek" => Algorithm::Greek,
            "hungarian" => Algorithm::Hungarian,
            "italian" => Algorithm::Italian,
            "norwegian" => Algorithm::Norwegian,
            "portuguese" => Algorithm::Portuguese,
            "romanian" => Algorithm::Romanian,
            "russian" => Algorithm::Russian,
            "spanish" => Algorithm::Spanish,
            "swedish" => Algorithm::Swedish,
            "tamil" => Algorithm::Tamil,
            "turkish" => Algorithm::Turkish,
            _ => return None,
        };
        Some(Self::new(algorithm))
    }
}

impl Lemmatizer for StemmingLemmatizer {
    fn lemmatize(&self, word: &str) -> String {
        self.stemmer.stem(&word.to_lowercase()).into_owned()
    }
}

/// Lemmatizer for the configured `language`. `none` disables stemming;
/// unknown names fall back to case folding with a warning.
pub fn lemmatizer_for(language: &str) -> Box<dyn Lemmatizer> {
    if language.trim().eq_ignore_ascii_case("none") {
        return Box::new(LowercaseLemmatizer);
    }
    match StemmingLemmatizer::for_language(language) {
        Some(stemming) => Box::new(stemming),
        None => {
            tracing::warn!(language, "No stemmer for language, matching exact words only");
            Box::new(LowercaseLemmatizer)
        }
    }
}
