use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use reqwest::{Client, Url};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use webdex::fetch;
use webdex::persist::{self, PageRecord};
use webdex::DocId;

const NUM_WORKERS: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Breadth-first crawl of an internal site into numbered page files")]
struct Cli {
    /// Seed URL the crawl starts from
    seed_url: String,
    /// Directory the numbered page files are written to
    page_dir: PathBuf,
    /// Maximum link depth to follow from the seed
    max_depth: u32,
}

/// Shared crawl state. Every field is mutated only while holding the one
/// mutex wrapping the whole struct.
struct CrawlState {
    frontier: VecDeque<PageRecord>,
    visited: HashSet<String>,
    next_id: DocId,
    pages_added: u32,
    pages_retrieved: u32,
    aborted: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let seed = Url::parse(&args.seed_url)
        .or_else(|_| Url::parse(&format!("https://{}", args.seed_url)))
        .with_context(|| format!("invalid seed url {:?}", args.seed_url))?;

    fs::create_dir_all(&args.page_dir)
        .with_context(|| format!("creating page directory {}", args.page_dir.display()))?;

    let client = fetch::client()?;
    eprintln!(
        "crawler: seed={} page_dir={} max_depth={} workers={}",
        seed,
        args.page_dir.display(),
        args.max_depth,
        NUM_WORKERS
    );

    // The seed is fetched and saved before any worker starts; a seed fetch
    // failure is fatal.
    let seed_html = fetch::fetch_html(&client, &seed)
        .await
        .with_context(|| format!("fetching seed {seed}"))?;
    let seed_page = PageRecord {
        url: fetch::normalize_url(&seed),
        depth: 0,
        html: seed_html,
    };
    persist::save_page(&args.page_dir, 1, &seed_page)
        .with_context(|| format!("saving seed page {}", seed_page.url))?;

    let state = Arc::new(Mutex::new(CrawlState {
        visited: HashSet::from([seed_page.url.clone()]),
        frontier: VecDeque::from([seed_page]),
        next_id: 2,
        pages_added: 1,
        pages_retrieved: 0,
        aborted: false,
    }));

    let mut workers = Vec::new();
    for worker_id in 0..NUM_WORKERS {
        let state = state.clone();
        let client = client.clone();
        let seed = seed.clone();
        let page_dir = args.page_dir.clone();
        let max_depth = args.max_depth;
        workers.push(tokio::spawn(async move {
            crawl(worker_id, state, client, seed, page_dir, max_depth).await
        }));
    }
    for w in workers {
        w.await.context("crawl worker panicked")??;
    }

    let st = state.lock();
    eprintln!("done: saved={} visited={}", st.pages_added, st.visited.len());
    Ok(())
}

/// One crawl worker: pop a page, expand its links, retire it. A worker that
/// finds the frontier empty may only exit once every added page has been
/// retired, because a page still being expanded can produce successors.
async fn crawl(
    worker_id: usize,
    state: Arc<Mutex<CrawlState>>,
    client: Client,
    seed: Url,
    page_dir: PathBuf,
    max_depth: u32,
) -> Result<()> {
    loop {
        let page = {
            let mut st = state.lock();
            if st.aborted {
                return Ok(());
            }
            match st.frontier.pop_front() {
                Some(p) => Some(p),
                None if st.pages_retrieved < st.pages_added => None,
                None => break,
            }
        };
        let Some(page) = page else {
            tokio::task::yield_now().await;
            continue;
        };

        if page.depth < max_depth {
            if let Err(e) = expand(worker_id, &state, &client, &seed, &page_dir, &page).await {
                state.lock().aborted = true;
                return Err(e);
            }
        }
        state.lock().pages_retrieved += 1;
    }
    Ok(())
}

/// Walk the outbound links of `page`, saving and enqueueing every internal
/// URL not seen before. An unvisited URL is claimed under the lock before
/// the fetch; a failed fetch releases the claim so a later discovery may
/// retry it. A failed save is fatal.
async fn expand(
    worker_id: usize,
    state: &Arc<Mutex<CrawlState>>,
    client: &Client,
    seed: &Url,
    page_dir: &Path,
    page: &PageRecord,
) -> Result<()> {
    let base = Url::parse(&page.url).with_context(|| format!("stored url {:?}", page.url))?;
    for url in fetch::extract_links(&base, &page.html) {
        if !fetch::is_internal(&url, seed) {
            eprintln!("worker {worker_id}: url={url} [external]");
            continue;
        }
        let key = fetch::normalize_url(&url);
        {
            let mut st = state.lock();
            if !st.visited.insert(key.clone()) {
                eprintln!("worker {worker_id}: url={key} [already visited]");
                continue;
            }
        }
        match fetch::fetch_html(client, &url).await {
            Ok(html) => {
                let new_page = PageRecord { url: key, depth: page.depth + 1, html };
                let mut st = state.lock();
                let id = st.next_id;
                persist::save_page(page_dir, id, &new_page)
                    .with_context(|| format!("saving page {id} ({})", new_page.url))?;
                st.next_id += 1;
                st.pages_added += 1;
                eprintln!("worker {worker_id}: url={} [internal] saved doc={id}", new_page.url);
                st.frontier.push_back(new_page);
            }
            Err(e) => {
                state.lock().visited.remove(&key);
                eprintln!("worker {worker_id}: url={key} [fetch failed: {e:#}]");
            }
        }
    }
    Ok(())
}
