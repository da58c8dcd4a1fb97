//! Royal Road record source: fetches listing pages over HTTP and extracts
//! `{title, link}` pairs from their markup.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::book::{Book, POPULAR_LIMIT, SEARCH_LIMIT};
use crate::config::SourceConfig;
use crate::metrics;

use super::{RecordSource, SourceError};

static POPULAR_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".fiction-list-item").expect("valid selector"));
static POPULAR_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".fiction-title").expect("valid selector"));
static POPULAR_TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".fiction-title a").expect("valid selector"));
static SEARCH_HEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2").expect("valid selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));

/// Record source backed by the public Royal Road website.
pub struct RoyalRoadSource {
    client: Client,
    config: SourceConfig,
}

impl RoyalRoadSource {
    /// Create a new source with the given configuration.
    pub fn new(config: SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                SourceError::ConnectionFailed(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// URL of the active-popular listing.
    pub fn popular_url(&self) -> String {
        format!("{}/fictions/active-popular", self.base_url())
    }

    /// URL of the title search page for `query`.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/fictions/search?title={}",
            self.base_url(),
            urlencoding::encode(query)
        )
    }

    async fn fetch_page(&self, url: &str) -> Result<String, SourceError> {
        let url =
            Url::parse(url).map_err(|e| SourceError::InvalidUrl(format!("{}: {}", url, e)))?;

        debug!(url = %url, "Fetching listing page");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus(status.as_u16()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::Body(e.to_string())
            }
        })
    }
}

#[async_trait]
impl RecordSource for RoyalRoadSource {
    fn name(&self) -> &str {
        "royalroad"
    }

    async fn fetch_popular(&self) -> Result<Vec<Book>, SourceError> {
        let result = self
            .fetch_page(&self.popular_url())
            .await
            .map(|html| parse_popular(&html, self.base_url()));
        metrics::record_fetch("popular", &result);

        let books = result?;
        debug!(count = books.len(), "Fetched popular books");
        Ok(books)
    }

    async fn fetch_search(&self, query: &str) -> Result<Vec<Book>, SourceError> {
        let result = self
            .fetch_page(&self.search_url(query))
            .await
            .map(|html| parse_search(&html, self.base_url()));
        metrics::record_fetch("search", &result);

        let books = result?;
        debug!(query = query, count = books.len(), "Fetched search results");
        Ok(books)
    }
}

/// Extract the popular listing from an active-popular page.
///
/// Each `.fiction-list-item` contributes the text of its `.fiction-title`
/// and the `href` of the anchor inside it.
pub fn parse_popular(html: &str, base_url: &str) -> Vec<Book> {
    let document = Html::parse_document(html);

    let books = document.select(&POPULAR_ITEM).filter_map(|item| {
        let title = item
            .select(&POPULAR_TITLE)
            .next()
            .map(element_text)
            .unwrap_or_default();
        let href = item
            .select(&POPULAR_TITLE_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .unwrap_or_default();
        make_book(title, href, base_url)
    });

    books.take(POPULAR_LIMIT).collect()
}

/// Extract search results from a search page.
///
/// Every `h2` holding an anchor is treated as a result heading.
pub fn parse_search(html: &str, base_url: &str) -> Vec<Book> {
    let document = Html::parse_document(html);

    let books = document.select(&SEARCH_HEADING).filter_map(|heading| {
        let anchor = heading.select(&ANCHOR).next()?;
        let title = element_text(anchor);
        let href = anchor.value().attr("href").unwrap_or_default();
        make_book(title, href, base_url)
    });

    books.take(SEARCH_LIMIT).collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn make_book(title: String, href: &str, base_url: &str) -> Option<Book> {
    let href = href.trim();
    if title.is_empty() || href.is_empty() {
        return None;
    }
    Some(Book::new(title, absolute_link(href, base_url)))
}

fn absolute_link(href: &str, base_url: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    }
}
