use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use query::{attach_metadata, evaluate, rank, render, tokenize_query, validate_query};
use webdex::persist::load_index;

#[derive(Parser)]
#[command(name = "query")]
#[command(about = "Interactive boolean queries over a crawled, indexed corpus")]
struct Cli {
    /// Directory of numbered page files written by the crawler
    page_dir: PathBuf,
    /// Index file written by the indexer
    index_file: PathBuf,
    /// Suppress the interactive prompt
    #[arg(short = 'q')]
    quiet: bool,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    if !cli.page_dir.is_dir() {
        bail!("page directory {} does not exist", cli.page_dir.display());
    }
    let index = load_index(&cli.index_file)
        .with_context(|| format!("loading index {}", cli.index_file.display()))?;
    tracing::info!(words = index.len(), "index loaded");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();
    loop {
        if !cli.quiet {
            print!("> ");
            io::stdout().flush()?;
        }
        line.clear();
        if input.read_line(&mut line)? == 0 {
            // EOF closes the dangling prompt.
            if !cli.quiet {
                println!();
            }
            return Ok(());
        }
        let raw = line.trim_end_matches(['\r', '\n']);
        if raw.is_empty() {
            continue;
        }

        let Some(tokens) = tokenize_query(raw).filter(|t| validate_query(t)) else {
            println!("[invalid query]");
            continue;
        };

        let mut results = evaluate(&tokens, &index);
        attach_metadata(&mut results, &cli.page_dir);
        rank(&mut results);
        for doc in &results {
            print!("{}", render(doc));
        }
    }
}
