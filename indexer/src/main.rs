use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

use webdex::persist::{load_page, save_index};
use webdex::{DocId, InvertedIndex};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an inverted index over a crawled page directory")]
struct Cli {
    /// Directory of numbered page files written by the crawler
    page_dir: PathBuf,
    /// Output index file
    index_file: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    if !cli.page_dir.is_dir() {
        bail!("page directory {} does not exist", cli.page_dir.display());
    }

    let index = build_index(&cli.page_dir)?;
    tracing::info!(
        words = index.len(),
        occurrences = index.total_occurrences(),
        "index built"
    );

    save_index(&cli.index_file, &index)
        .with_context(|| format!("saving index to {}", cli.index_file.display()))?;
    Ok(())
}

/// Index every page file in `page_dir`, in ascending document id order.
fn build_index(page_dir: &Path) -> Result<InvertedIndex> {
    let mut ids = Vec::new();
    for entry in WalkDir::new(page_dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("reading {}", page_dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let id = name
            .parse::<DocId>()
            .with_context(|| format!("page file name {name:?} is not a document id"))?;
        ids.push(id);
    }
    ids.sort_unstable();

    let mut index = InvertedIndex::new();
    for id in ids {
        let page = load_page(page_dir, id)?;
        index.index_document(id, &page.html);
        tracing::debug!(doc = id, url = %page.url, bytes = page.html.len(), "indexed page");
    }
    Ok(index)
}
