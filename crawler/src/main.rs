use anyhow::{bail, Context, Result};
use clap::Parser;
use reqwest::blocking::Client;
use reqwest::header;
use search_core::{html, Page, PageDir};
use std::collections::HashSet;
use std::process;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

const MAX_CRAWL_DEPTH: i64 = 10;
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;
const TIMEOUT_SECS: u64 = 12;
const USER_AGENT: &str = "search-core-crawler/0.1";

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Crawl a site from a seed URL into a page directory")]
struct Cli {
    /// Seed URL; the crawl never leaves its host
    seed_url: String,
    /// Output directory for page records
    page_directory: String,
    /// Crawl depth bound, 0..=10
    #[arg(allow_negative_numbers = true)]
    max_depth: i64,
}

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let pages = PageDir::new(&cli.page_directory);
    if let Err(err) = pages.init() {
        eprintln!("invalid page directory {}: {err:#}", cli.page_directory);
        process::exit(2);
    }

    if !(0..=MAX_CRAWL_DEPTH).contains(&cli.max_depth) {
        eprintln!("max depth must be between 0 and {MAX_CRAWL_DEPTH}");
        process::exit(3);
    }

    let seed = match canonicalize(&cli.seed_url) {
        Some(seed) if SiteScope::of(&seed).is_some() => seed,
        _ => {
            eprintln!("invalid seed URL {}", cli.seed_url);
            process::exit(4);
        }
    };

    if let Err(err) = crawl(&seed, &pages, cli.max_depth as u32) {
        eprintln!("crawl failed: {err:#}");
        process::exit(1);
    }
}

/// Parse a raw URL and strip its fragment.
fn canonicalize(raw: &str) -> Option<Url> {
    let mut url = Url::parse(raw).ok()?;
    url.set_fragment(None);
    Some(url)
}

/// Same-site policy captured from the seed URL: a URL is internal iff it
/// shares the seed's scheme, host, and port.
struct SiteScope {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl SiteScope {
    fn of(seed: &Url) -> Option<Self> {
        if seed.scheme() != "http" && seed.scheme() != "https" {
            return None;
        }
        let host = seed.host_str()?.to_string();
        Some(Self { scheme: seed.scheme().to_string(), host, port: seed.port() })
    }

    fn is_internal(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
            && url.host_str() == Some(self.host.as_str())
            && url.port() == self.port
    }
}

/// Frontier of discovered-but-unfetched pages. Extraction order is
/// unspecified; the only contract is that every inserted entry is
/// eventually extracted exactly once.
#[derive(Default)]
struct Frontier(Vec<Page>);

impl Frontier {
    fn insert(&mut self, page: Page) {
        self.0.push(page);
    }

    fn extract(&mut self) -> Option<Page> {
        self.0.pop()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Depth-bounded crawl from `seed`. Fetch failures are logged and skipped;
/// docIDs are assigned sequentially from 1 in fetch order.
fn crawl(seed: &Url, pages: &PageDir, max_depth: u32) -> Result<()> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()?;

    let scope = SiteScope::of(seed).context("seed URL is not crawlable")?;

    let mut frontier = Frontier::default();
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(seed.as_str().to_string());
    frontier.insert(Page { url: seed.as_str().to_string(), depth: 0, content: String::new() });

    let mut doc_id = 0;
    while let Some(mut page) = frontier.extract() {
        match fetch(&client, &page.url) {
            Ok(body) => {
                page.content = body;
                doc_id += 1;
                if let Err(err) = pages.save(&page, doc_id) {
                    tracing::warn!(url = %page.url, %err, "cannot save page");
                }
                if page.depth < max_depth {
                    scan_links(&page, &scope, &mut frontier, &mut seen);
                }
                if doc_id % 10 == 0 {
                    tracing::info!(
                        fetched = doc_id,
                        visited = seen.len(),
                        frontier = frontier.len(),
                        "crawl progress"
                    );
                }
            }
            Err(err) => {
                tracing::warn!(url = %page.url, %err, "fetch failed");
            }
        }
    }

    tracing::info!(fetched = doc_id, visited = seen.len(), "crawl complete");
    Ok(())
}

/// Queue every internal, unseen link of `page` at depth + 1.
fn scan_links(page: &Page, scope: &SiteScope, frontier: &mut Frontier, seen: &mut HashSet<String>) {
    let base = match Url::parse(&page.url) {
        Ok(base) => base,
        Err(_) => return,
    };
    for link in html::extract_links(&page.content, &base) {
        if !scope.is_internal(&link) {
            continue;
        }
        let url = link.to_string();
        if seen.insert(url.clone()) {
            frontier.insert(Page { url, depth: page.depth + 1, content: String::new() });
        }
    }
}

/// Fetch one page body. Non-success statuses, non-HTML content types, and
/// oversized bodies all count as fetch failures; none is retried.
fn fetch(client: &Client, url: &str) -> Result<String> {
    let resp = client.get(url).send()?;
    if !resp.status().is_success() {
        bail!("HTTP {}", resp.status());
    }
    if let Some(ct) = resp.headers().get(header::CONTENT_TYPE) {
        let ct = ct.to_str().unwrap_or("");
        if !ct.starts_with("text/html") {
            bail!("not HTML: {ct}");
        }
    }
    let bytes = resp.bytes()?;
    if bytes.len() > MAX_BODY_BYTES {
        bail!("body too large: {} bytes", bytes.len());
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
