use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use htmlindex_core::{Indexer, IndexerConfig, Language};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "htmlindex")]
#[command(about = "Build a client-side search index for a folder of HTML files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every *.html file under the source folder into <source>/search
    Build {
        /// Folder containing the HTML files
        #[arg(long, value_name = "DIR")]
        source: PathBuf,
        /// JSON file with indexer options; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
        /// Stemming language code (en, cs, de, es, fr, it, nl, pt); others disable stemming
        #[arg(long)]
        language: Option<String>,
        /// Comma-separated id patterns of the elements whose text is indexed
        #[arg(long, value_delimiter = ',')]
        content_ids: Option<Vec<String>>,
        /// JS file listing stopwords
        #[arg(long)]
        stopwords_file: Option<PathBuf>,
        /// JS file holding the punctuation pattern
        #[arg(long)]
        punctuation_file: Option<PathBuf>,
        /// Number of worker threads reading documents
        #[arg(long)]
        jobs: Option<usize>,
        /// Print the build summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the languages with a stemmer
    Languages,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            source,
            config,
            language,
            content_ids,
            stopwords_file,
            punctuation_file,
            jobs,
            json,
        } => {
            let mut cfg = match config {
                Some(path) => IndexerConfig::from_json_file(&path)?,
                None => IndexerConfig::default(),
            };
            if let Some(language) = language { cfg.language = language; }
            if let Some(ids) = content_ids { cfg.content_ids = ids; }
            if stopwords_file.is_some() { cfg.stopwords_file = stopwords_file; }
            if punctuation_file.is_some() { cfg.punctuation_file = punctuation_file; }
            if let Some(jobs) = jobs { cfg.jobs = jobs; }
            build_index(&source, &cfg, json)
        }
        Commands::Languages => {
            for lang in Language::ALL {
                println!("{}\t{}", lang.code(), lang.name());
            }
            Ok(())
        }
    }
}

fn build_index(source: &Path, cfg: &IndexerConfig, json: bool) -> Result<()> {
    let settings = cfg.compile().context("invalid indexer configuration")?;
    tracing::info!(language = %cfg.language, content_ids = ?cfg.content_ids, "configuration loaded");

    let summary = Indexer::new(settings).run(source)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    tracing::info!(documents = summary.documents, stems = summary.stems, "index build complete");
    Ok(())
}
