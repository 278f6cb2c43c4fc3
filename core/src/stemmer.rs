use crate::czech;
use rust_stemmers::{Algorithm, Stemmer};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Czech,
    German,
    Spanish,
    French,
    Italian,
    Dutch,
    Portuguese,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Czech,
        Language::German,
        Language::Spanish,
        Language::French,
        Language::Italian,
        Language::Dutch,
        Language::Portuguese,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Czech => "cs",
            Language::German => "de",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::Italian => "it",
            Language::Dutch => "nl",
            Language::Portuguese => "pt",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Czech => "czech",
            Language::German => "german",
            Language::Spanish => "spanish",
            Language::French => "french",
            Language::Italian => "italian",
            Language::Dutch => "dutch",
            Language::Portuguese => "portuguese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code() == wanted || lang.name() == wanted)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Reduces a lowercase word to its canonical stem for one language.
pub enum WordStemmer {
    Snowball(Stemmer),
    CzechLight,
    Identity,
}

impl WordStemmer {
    pub fn for_language(language: Language) -> Self {
        let algorithm = match language {
            Language::English => Algorithm::English,
            Language::German => Algorithm::German,
            Language::Spanish => Algorithm::Spanish,
            Language::French => Algorithm::French,
            Language::Italian => Algorithm::Italian,
            Language::Dutch => Algorithm::Dutch,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Czech => return WordStemmer::CzechLight,
        };
        WordStemmer::Snowball(Stemmer::create(algorithm))
    }

    /// Select by language code or name; anything unrecognised disables stemming.
    pub fn from_code(code: &str) -> Self {
        match code.parse::<Language>() {
            Ok(language) => Self::for_language(language),
            Err(err) => {
                tracing::warn!(%err, "stemming disabled");
                WordStemmer::Identity
            }
        }
    }

    pub fn stem<'w>(&self, word: &'w str) -> Cow<'w, str> {
        match self {
            WordStemmer::Snowball(stemmer) => stemmer.stem(word),
            WordStemmer::CzechLight => Cow::Owned(czech::stem(word)),
            WordStemmer::Identity => Cow::Borrowed(word),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, WordStemmer::Identity)
    }
}

impl fmt::Debug for WordStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordStemmer::Snowball(_) => f.write_str("Snowball"),
            WordStemmer::CzechLight => f.write_str("CzechLight"),
            WordStemmer::Identity => f.write_str("Identity"),
        }
    }
}
