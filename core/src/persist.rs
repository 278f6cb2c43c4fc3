use crate::index::{join_postings, DocumentEntry, SearchIndex};
use crate::tokenizer::collapse_whitespace;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const OUTPUT_DIR_NAME: &str = "search";
pub const FILE_INFO_LIST_NAME: &str = "file-info-list.js";
pub const SHARD_COUNT: usize = 3;

lazy_static! {
    static ref TITLE_QUOTES: Regex = Regex::new("['\u{FFFD}\"]").expect("valid regex");
}

pub struct OutputPaths {
    pub root: PathBuf,
}

impl OutputPaths {
    /// Output lives in a fixed subdirectory of the source root.
    pub fn under<P: AsRef<Path>>(source_root: P) -> Self {
        Self { root: source_root.as_ref().join(OUTPUT_DIR_NAME) }
    }
    pub fn file_info_list(&self) -> PathBuf { self.root.join(FILE_INFO_LIST_NAME) }
    pub fn shard(&self, shard: usize) -> PathBuf { self.root.join(format!("index-{}.js", shard + 1)) }
}

/// Make a title safe for a double-quoted JS string. Missing titles become `null`.
pub fn sanitize_title(title: Option<&str>) -> String {
    match title {
        Some(title) => {
            let title = collapse_whitespace(title);
            let title = TITLE_QUOTES.replace_all(&title, " ");
            title.replace('\\', "\\\\")
        }
        None => "null".to_string(),
    }
}

/// Contiguous ranges of `ceil(total / shards)` items; trailing ranges may be
/// short or empty.
pub fn shard_ranges(total: usize, shards: usize) -> Vec<Range<usize>> {
    let size = total.div_ceil(shards.max(1));
    (0..shards)
        .map(|i| {
            let start = (i * size).min(total);
            let end = (start + size).min(total);
            start..end
        })
        .collect()
}

pub fn write_file_info_list<W: Write>(out: &mut W, documents: &[DocumentEntry]) -> Result<()> {
    writeln!(out, "fil = new Array();")?;
    for doc in documents {
        writeln!(
            out,
            "fil[\"{}\"] = \"{}@@@{}\";",
            doc.index,
            doc.path.replace('\\', "/"),
            sanitize_title(doc.title.as_deref())
        )?;
    }
    Ok(())
}

/// Write every stem as `w["stem"]="postings";`, split across the shard writers.
pub fn write_shards<W: Write>(outs: &mut [W], index: &SearchIndex) -> Result<()> {
    let stems: Vec<_> = index.stems().collect();
    for (out, range) in outs.iter_mut().zip(shard_ranges(stems.len(), SHARD_COUNT)) {
        for (stem, postings) in &stems[range] {
            writeln!(out, "w[\"{}\"]=\"{}\";", stem, join_postings(postings))?;
        }
    }
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let f = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(f))
}

/// Persist the document directory and the sharded stem table. Nothing is
/// written for an empty index; returns whether output was produced.
pub fn save_index(paths: &OutputPaths, index: &SearchIndex) -> Result<bool> {
    if index.is_empty() {
        return Ok(false);
    }
    create_dir_all(&paths.root).with_context(|| format!("creating {}", paths.root.display()))?;

    let mut f = create(&paths.file_info_list())?;
    write_file_info_list(&mut f, index.documents())?;
    f.flush()?;

    let mut shards = (0..SHARD_COUNT)
        .map(|i| create(&paths.shard(i)))
        .collect::<Result<Vec<_>>>()?;
    write_shards(&mut shards, index)?;
    for shard in &mut shards {
        shard.flush()?;
    }
    Ok(true)
}
