use crate::stemmer::WordStemmer;
use crate::tokenizer::{trim_ascii_controls, WordObservation};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub type DocIndex = u32;

/// One document's contribution to a stem: `<doc>*<score>` when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc: DocIndex,
    pub score: u32,
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.doc, self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemEntry {
    /// First raw word form seen for the stem in this document.
    pub word: String,
    pub score: u32,
}

/// Per-document stem table, reset for every document.
#[derive(Debug, Clone, Default)]
pub struct DocumentTerms {
    pub title: Option<String>,
    entries: HashMap<String, StemEntry>,
}

impl DocumentTerms {
    pub fn new(title: Option<String>) -> Self {
        Self { title, entries: HashMap::new() }
    }

    pub fn observe(&mut self, stemmer: &WordStemmer, observation: &WordObservation) {
        let normalized = observation.word.to_lowercase();
        let normalized = trim_ascii_controls(&normalized);
        if normalized.is_empty() {
            return;
        }
        let stem = stemmer.stem(normalized).into_owned();
        self.entries
            .entry(stem)
            .and_modify(|entry| entry.score += observation.weight)
            .or_insert_with(|| StemEntry { word: observation.word.clone(), score: observation.weight });
    }

    pub fn get(&self, stem: &str) -> Option<&StemEntry> {
        self.entries.get(stem)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StemEntry)> {
        self.entries.iter().map(|(stem, entry)| (stem.as_str(), entry))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub index: DocIndex,
    /// Path relative to the source root, `/`-separated.
    pub path: String,
    pub title: Option<String>,
}

/// Accumulates the inverted index and the document directory over a run.
/// Documents are committed once each, in index order.
#[derive(Debug, Default)]
pub struct SearchIndex {
    postings: BTreeMap<String, Vec<Posting>>,
    documents: Vec<DocumentEntry>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the next committed document will receive.
    pub fn next_index(&self) -> DocIndex {
        self.documents.len() as DocIndex
    }

    /// Fold one document's stem table into the index and append it to the
    /// directory. Returns the document's index.
    pub fn commit(&mut self, path: String, terms: DocumentTerms) -> DocIndex {
        let doc = self.next_index();
        for (stem, entry) in terms.entries {
            self.postings.entry(stem).or_default().push(Posting { doc, score: entry.score });
        }
        self.documents.push(DocumentEntry { index: doc, path, title: terms.title });
        doc
    }

    pub fn postings(&self, stem: &str) -> Option<&[Posting]> {
        self.postings.get(stem).map(Vec::as_slice)
    }

    /// Stems in ascending byte order with their postings.
    pub fn stems(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.postings.iter().map(|(stem, list)| (stem.as_str(), list.as_slice()))
    }

    pub fn num_stems(&self) -> usize {
        self.postings.len()
    }

    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

/// Join postings as `p1,p2,...`.
pub fn join_postings(postings: &[Posting]) -> String {
    postings.iter().map(Posting::to_string).collect::<Vec<_>>().join(",")
}
