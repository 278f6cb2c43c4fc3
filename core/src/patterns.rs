//! Pattern sources: content-scope ids from configuration, punctuation and
//! stopword patterns from their JS side files.

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONTENT_ID_PATTERN: &str = "content";

lazy_static! {
    static ref QUOTED: Regex = Regex::new(r#""([^"]*)""#).expect("valid regex");
}

/// Join identifier patterns into one alternation. No ids selects the default.
pub fn content_scope_pattern<S: AsRef<str>>(ids: &[S]) -> String {
    let ids: Vec<&str> = ids
        .iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty())
        .collect();
    if ids.is_empty() {
        DEFAULT_CONTENT_ID_PATTERN.to_string()
    } else {
        ids.join("|")
    }
}

/// Compile the content-scope pattern so it must match the whole `id`.
pub fn content_scope_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

/// The pattern is the text between the first and last double quote of the
/// first line that has one, with `\\` collapsed to `\`.
pub fn parse_punctuation_pattern(source: &str) -> Option<String> {
    source.lines().find_map(|line| {
        let start = line.find('"')? + 1;
        let end = line.rfind('"')?;
        (start < end).then(|| line[start..end].replace("\\\\", "\\"))
    })
}

pub fn punctuation_pattern_from_file(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("reading punctuation file {}", path.display()))?;
    parse_punctuation_pattern(&source)
        .ok_or_else(|| anyhow!("no quoted pattern found in punctuation file {}", path.display()))
}

/// Build a whole-word alternation from every quoted word in `source`, or from
/// its whitespace-separated tokens when nothing is quoted. Longer words are
/// tried first. Empty input yields an empty (no-op) pattern.
pub fn parse_stopwords_pattern(source: &str) -> String {
    let mut words: Vec<String> = if source.contains('"') {
        QUOTED
            .captures_iter(source)
            .map(|c| c[1].trim().to_lowercase())
            .collect()
    } else {
        source.split_whitespace().map(str::to_lowercase).collect()
    };
    words.retain(|w| !w.is_empty());
    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
    words.dedup();

    if words.is_empty() {
        return String::new();
    }
    let alternation: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    format!(r"\b(?:{})\b", alternation.join("|"))
}

pub fn stopwords_pattern_from_file(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("reading stopwords file {}", path.display()))?;
    Ok(parse_stopwords_pattern(&source))
}
