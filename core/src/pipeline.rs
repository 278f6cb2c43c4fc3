use crate::config::Settings;
use crate::discover::{discover_html_files, relative_path};
use crate::index::{DocumentTerms, SearchIndex};
use crate::markup::extract;
use crate::persist::{save_index, OutputPaths};
use crate::tokenizer::scoring_weight;
use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub documents: usize,
    pub stems: usize,
    pub written: bool,
    pub output_dir: PathBuf,
}

pub struct Indexer {
    settings: Settings,
}

impl Indexer {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Extract, tokenize and stem one document's markup into its stem table.
    pub fn index_html(&self, html: &str) -> DocumentTerms {
        let content = extract(html, &self.settings.content_scope);
        let mut terms = DocumentTerms::new(content.title);
        for fragment in &content.fragments {
            let weight = scoring_weight(&fragment.element_name);
            for observation in self.settings.tokenizer.tokenize(&fragment.text, weight) {
                terms.observe(&self.settings.stemmer, &observation);
            }
        }
        terms
    }

    pub fn index_document(&self, path: &Path) -> Result<DocumentTerms> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let terms = self.index_html(&String::from_utf8_lossy(&bytes));
        tracing::debug!(path = %path.display(), stems = terms.len(), "indexed document");
        Ok(terms)
    }

    /// Index `files` (already in document order) and commit them in that order.
    pub fn build(&self, root: &Path, files: &[PathBuf]) -> Result<SearchIndex> {
        let all_terms = self.index_all(files)?;
        let mut index = SearchIndex::new();
        for (path, terms) in files.iter().zip(all_terms) {
            index.commit(relative_path(root, path), terms);
        }
        Ok(index)
    }

    fn index_all(&self, files: &[PathBuf]) -> Result<Vec<DocumentTerms>> {
        let jobs = self.settings.jobs.clamp(1, files.len().max(1));
        if jobs == 1 {
            return files.iter().map(|path| self.index_document(path)).collect();
        }

        let next = AtomicUsize::new(0);
        let slots: Mutex<Vec<Option<Result<DocumentTerms>>>> =
            Mutex::new((0..files.len()).map(|_| None).collect());

        thread::scope(|scope| {
            for _ in 0..jobs {
                scope.spawn(|| loop {
                    let i = next.fetch_add(1, Ordering::Relaxed);
                    let Some(path) = files.get(i) else { break };
                    let result = self.index_document(path);
                    slots.lock()[i] = Some(result);
                });
            }
        });

        slots
            .into_inner()
            .into_iter()
            .zip(files)
            .map(|(slot, path)| slot.unwrap_or_else(|| Err(anyhow!("{} was not indexed", path.display()))))
            .collect()
    }

    /// Index every HTML file under `root` and write the output tables into
    /// `root/search`. Nothing is written when no stems were found.
    pub fn run(&self, root: &Path) -> Result<BuildSummary> {
        let files = discover_html_files(root)?;
        let paths = OutputPaths::under(root);
        tracing::info!(root = %root.display(), documents = files.len(), jobs = self.settings.jobs, "indexing");

        let index = self.build(root, &files)?;
        let written = save_index(&paths, &index)?;
        if written {
            tracing::info!(stems = index.num_stems(), output = %paths.root.display(), "index written");
        } else {
            tracing::warn!(documents = files.len(), "no indexable content found, nothing written");
        }

        Ok(BuildSummary {
            documents: files.len(),
            stems: index.num_stems(),
            written,
            output_dir: paths.root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_and_bold_scores_add_up() {
        let indexer = Indexer::new(Settings::default());
        let terms = indexer.index_html(r#"<div id="content"><h1>Alpha</h1><p><b>alpha</b></p></div>"#);
        assert_eq!(terms.get("alpha").unwrap().score, 55);
    }

    #[test]
    fn text_outside_scope_is_ignored() {
        let indexer = Indexer::new(Settings::default());
        let terms = indexer.index_html("<h1>Nothing</h1><div id=\"sidebar\">here</div>");
        assert!(terms.is_empty());
    }

    #[test]
    fn table_of_contents_is_not_indexed() {
        let indexer = Indexer::new(Settings::default());
        let terms = indexer.index_html(
            r#"<div id="table-of-contents"><p>sidebar</p></div><div id="content"><p>body</p></div>"#,
        );
        assert!(terms.get("sidebar").is_none());
        assert_eq!(terms.len(), 1);
    }

    #[test]
    fn unreadable_document_reports_path() {
        let indexer = Indexer::new(Settings::default());
        let err = indexer.index_document(Path::new("/no/such/page.html")).unwrap_err();
        assert!(err.to_string().contains("/no/such/page.html"));
    }
}
