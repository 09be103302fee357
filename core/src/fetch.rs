use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use reqwest::{header, Client, Url};
use scraper::{Html, Selector};
use std::time::Duration;

const USER_AGENT: &str = "webdex-bot/0.1 (+https://example.com/bot)";
const REQUEST_TIMEOUT_SECS: u64 = 12;
const MAX_HTML_BYTES: usize = 2 * 1024 * 1024;

lazy_static! {
    static ref LINK_SELECTOR: Selector = Selector::parse("a").expect("valid selector");
}

/// Build the HTTP client shared by every crawl worker.
pub fn client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

/// Fetch one page as HTML. Non-success statuses, non-HTML content types and
/// oversized bodies all count as fetch failures.
pub async fn fetch_html(client: &Client, url: &Url) -> Result<String> {
    let resp = client.get(url.clone()).send().await?;
    if !resp.status().is_success() {
        return Err(anyhow!("{url}: status {}", resp.status()));
    }
    if let Some(ct) = resp.headers().get(header::CONTENT_TYPE) {
        if let Ok(v) = ct.to_str() {
            if !v.starts_with("text/html") {
                return Err(anyhow!("{url}: content type {v}"));
            }
        }
    }
    let bytes = resp.bytes().await?;
    if bytes.len() > MAX_HTML_BYTES {
        return Err(anyhow!("{url}: body too large ({} bytes)", bytes.len()));
    }
    Ok(String::from_utf8_lossy(&bytes).to_string())
}

/// Every http(s) link in `html`, resolved against `base` when relative.
pub fn extract_links(base: &Url, html: &str) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let mut links = Vec::new();
    for a in doc.select(&LINK_SELECTOR) {
        if let Some(href) = a.value().attr("href") {
            if let Ok(u) = Url::parse(href).or_else(|_| base.join(href)) {
                if u.scheme().starts_with("http") {
                    links.push(u);
                }
            }
        }
    }
    links
}

/// A URL is internal when it points at the same host as the crawl seed.
pub fn is_internal(url: &Url, seed: &Url) -> bool {
    url.host_str().is_some() && url.host_str() == seed.host_str()
}

/// Canonical form used as the visited-set key: the URL with its fragment
/// stripped.
pub fn normalize_url(u: &Url) -> String {
    let mut s = u.clone();
    s.set_fragment(None);
    s.to_string()
}
