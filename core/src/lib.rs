//! Build-time full-text search index for a tree of static HTML documents.
//!
//! Documents are scanned for content scopes, their text is tokenized and
//! stemmed, and per-stem scores weighted by the enclosing element are folded
//! into sharded JS lookup tables for a browser-side search widget.

pub mod config;
pub mod czech;
pub mod discover;
pub mod index;
pub mod markup;
pub mod patterns;
pub mod persist;
pub mod pipeline;
pub mod stemmer;
pub mod tokenizer;

pub use config::{IndexerConfig, Settings};
pub use index::{DocIndex, DocumentEntry, DocumentTerms, Posting, SearchIndex, StemEntry};
pub use pipeline::{BuildSummary, Indexer};
pub use stemmer::{Language, WordStemmer};
