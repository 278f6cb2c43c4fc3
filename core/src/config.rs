use crate::patterns::{
    content_scope_pattern, content_scope_regex, punctuation_pattern_from_file, stopwords_pattern_from_file,
    DEFAULT_CONTENT_ID_PATTERN,
};
use crate::stemmer::WordStemmer;
use crate::tokenizer::{Tokenizer, DEFAULT_PUNCTUATION_PATTERN};
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Indexer options as read from a JSON config file and/or the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexerConfig {
    pub language: String,
    pub content_ids: Vec<String>,
    pub stopwords_file: Option<PathBuf>,
    pub punctuation_file: Option<PathBuf>,
    pub jobs: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            content_ids: vec!["content".to_string()],
            stopwords_file: None,
            punctuation_file: None,
            jobs: 1,
        }
    }
}

impl IndexerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load pattern files and compile everything the pipeline needs.
    pub fn compile(&self) -> Result<Settings> {
        if self.jobs == 0 {
            bail!("jobs must be at least 1");
        }

        let scope_pattern = content_scope_pattern(&self.content_ids);
        let content_scope = content_scope_regex(&scope_pattern)
            .with_context(|| format!("invalid content id pattern '{scope_pattern}'"))?;

        let punctuation = match &self.punctuation_file {
            Some(path) => punctuation_pattern_from_file(path)?,
            None => DEFAULT_PUNCTUATION_PATTERN.to_string(),
        };
        let stopwords = match &self.stopwords_file {
            Some(path) => stopwords_pattern_from_file(path)?,
            None => String::new(),
        };
        let tokenizer = Tokenizer::from_patterns(&punctuation, &stopwords)
            .context("invalid punctuation or stopwords pattern")?;

        Ok(Settings {
            content_scope,
            tokenizer,
            stemmer: WordStemmer::from_code(&self.language),
            jobs: self.jobs,
        })
    }
}

/// Compiled, ready-to-run configuration.
#[derive(Debug)]
pub struct Settings {
    pub content_scope: Regex,
    pub tokenizer: Tokenizer,
    pub stemmer: WordStemmer,
    pub jobs: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            content_scope: content_scope_regex(DEFAULT_CONTENT_ID_PATTERN).expect("valid regex"),
            tokenizer: Tokenizer::default(),
            stemmer: WordStemmer::from_code("en"),
            jobs: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.json");
        fs::write(&path, r#"{ "language": "de", "content_ids": ["main", "body-content"] }"#).unwrap();
        let config = IndexerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.language, "de");
        assert_eq!(config.content_ids, vec!["main", "body-content"]);
        assert_eq!(config.jobs, 1);
    }

    #[test]
    fn rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("indexer.json");
        fs::write(&path, r#"{ "langauge": "de" }"#).unwrap();
        assert!(IndexerConfig::from_json_file(&path).is_err());
    }

    #[test]
    fn compile_fails_on_bad_patterns() {
        let config = IndexerConfig { content_ids: vec!["(".into()], ..Default::default() };
        assert!(config.compile().is_err());
        let config = IndexerConfig { jobs: 0, ..Default::default() };
        assert!(config.compile().is_err());
        let config = IndexerConfig { stopwords_file: Some("/missing/stopwords.js".into()), ..Default::default() };
        assert!(config.compile().is_err());
    }

    #[test]
    fn unknown_language_still_compiles() {
        let config = IndexerConfig { language: "xx".into(), ..Default::default() };
        let settings = config.compile().unwrap();
        assert!(settings.stemmer.is_identity());
    }
}
