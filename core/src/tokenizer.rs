use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

/// Punctuation removed from fragment text before splitting, unless a
/// punctuation file overrides it.
pub const DEFAULT_PUNCTUATION_PATTERN: &str =
    r#"[$\|%,;'()\\/*"{}=!&+<>#‚’‘”“´…\?\u{00A0}]|\[|\]|[-][-]+"#;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"[ \t\n\x0B\x0C\r]+").expect("valid regex");
}

/// Characters treated both as enclosing punctuation and as compound delimiters.
fn is_delimiter(c: char) -> bool {
    matches!(c, '.' | ':' | '-')
}

/// Trim spaces and control characters only; Unicode spaces such as NBSP stay.
pub fn trim_ascii_controls(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    trim_ascii_controls(&WHITESPACE.replace_all(text, " ")).to_string()
}

/// Fixed contribution of one word occurrence, keyed by the enclosing element.
pub fn scoring_weight(element_name: &str) -> u32 {
    match element_name.to_ascii_lowercase().as_str() {
        "h1" => 50,
        "h2" => 45,
        "h3" => 40,
        "h4" => 35,
        "h5" => 30,
        "h6" => 25,
        "b" | "strong" => 5,
        "i" | "em" => 3,
        _ => 1,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordObservation {
    pub word: String,
    pub weight: u32,
}

/// Turns fragment text into index-worthy words.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    punctuation: Regex,
    stopwords: Option<Regex>,
}

impl Tokenizer {
    pub fn new(punctuation: Regex, stopwords: Option<Regex>) -> Self {
        Self { punctuation, stopwords }
    }

    /// Build from pattern strings. An empty stopwords pattern removes nothing.
    pub fn from_patterns(punctuation: &str, stopwords: &str) -> Result<Self, regex::Error> {
        let punctuation = Regex::new(punctuation)?;
        let stopwords = if stopwords.is_empty() { None } else { Some(Regex::new(stopwords)?) };
        Ok(Self::new(punctuation, stopwords))
    }

    /// Words of one fragment in emission order: the surviving raw words first,
    /// then everything derived from them.
    pub fn words(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let spaced = self.punctuation.replace_all(&lowered, " ");
        let cleaned = match &self.stopwords {
            Some(stopwords) => stopwords.replace_all(&spaced, "").into_owned(),
            None => spaced.into_owned(),
        };

        let raw: Vec<&str> = WHITESPACE.split(&cleaned).collect();
        let mut obsolete: BTreeSet<&str> = BTreeSet::new();
        let mut derived: Vec<String> = Vec::new();

        for &word in &raw {
            // keep derived words unique per single word
            let mut forms: BTreeSet<&str> = BTreeSet::new();

            let stripped = word.trim_matches(is_delimiter);
            if stripped.len() != word.len() {
                obsolete.insert(word);
                forms.insert(stripped);
            }

            if stripped.contains(is_delimiter) {
                forms.extend(stripped.split(is_delimiter).filter(|chunk| !chunk.is_empty()));
            }

            derived.extend(forms.into_iter().map(str::to_string));
        }

        raw.iter()
            .filter(|word| !obsolete.contains(*word))
            .map(|word| word.to_string())
            .chain(derived)
            .filter(|word| !word.is_empty())
            .collect()
    }

    pub fn tokenize(&self, text: &str, weight: u32) -> Vec<WordObservation> {
        self.words(text)
            .into_iter()
            .map(|word| WordObservation { word, weight })
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(Regex::new(DEFAULT_PUNCTUATION_PATTERN).expect("valid regex"), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> Tokenizer {
        Tokenizer::from_patterns(r"\x00", "").unwrap()
    }

    #[test]
    fn weights_by_element() {
        assert_eq!(scoring_weight("H1"), 50);
        assert_eq!(scoring_weight("h6"), 25);
        assert_eq!(scoring_weight("strong"), 5);
        assert_eq!(scoring_weight("em"), 3);
        assert_eq!(scoring_weight("p"), 1);
        assert_eq!(scoring_weight(""), 1);
    }

    #[test]
    fn compound_word_is_split() {
        let words = bare().words("foo.bar-baz");
        for w in ["foo", "bar", "baz"] {
            assert!(words.contains(&w.to_string()), "missing {w}");
        }
    }

    #[test]
    fn enclosing_punctuation_replaces_original() {
        let words = bare().words("end. ::x-y:: ...");
        assert!(!words.contains(&"end.".to_string()));
        assert!(!words.contains(&"::x-y::".to_string()));
        assert!(!words.contains(&"...".to_string()));
        assert!(words.contains(&"end".to_string()));
        assert!(words.contains(&"x-y".to_string()));
        assert!(words.contains(&"x".to_string()));
        assert!(words.contains(&"y".to_string()));
        assert!(words.iter().all(|w| !w.is_empty()));
    }

    #[test]
    fn derived_words_follow_raw_words() {
        let words = bare().words("a.b c");
        assert_eq!(words, vec!["a.b", "c", "a", "b"]);
    }

    #[test]
    fn duplicate_chunks_collapse_per_word() {
        let words = bare().words("x-x");
        assert_eq!(words, vec!["x-x", "x"]);
    }

    #[test]
    fn default_punctuation_strips_quotes_and_dashes() {
        let words = Tokenizer::default().words("“Hello”, world -- (again)!");
        assert_eq!(words, vec!["hello", "world", "again"]);
    }

    #[test]
    fn stopwords_act_on_whole_text() {
        let tok = Tokenizer::from_patterns(r"[,]", r"\bthe\b").unwrap();
        let words = tok.words("The cat, the hat");
        assert_eq!(words, vec!["cat", "hat"]);
    }

    #[test]
    fn tokenize_carries_weight() {
        let obs = Tokenizer::default().tokenize("Alpha beta", 45);
        assert_eq!(obs.len(), 2);
        assert!(obs.iter().all(|o| o.weight == 45));
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }

    #[test]
    fn unicode_spaces_survive_trimming() {
        assert_eq!(collapse_whitespace("\u{00A0}Intro\u{2003} "), "\u{00A0}Intro\u{2003}");
        assert_eq!(trim_ascii_controls("\x01word\u{2000}\t"), "word\u{2000}");
    }
}
