use crate::fetch::FetchError;
use crate::i18n::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;

#[derive(Debug, Clone, Copy)]
pub struct FeedSource {
    pub name: &'static str,
    pub url: &'static str,
}

const GERMAN_FEEDS: &[FeedSource] = &[
    FeedSource {
        name: "Tagesschau",
        url: "https://www.tagesschau.de/xml/rss2",
    },
    FeedSource {
        name: "heise",
        url: "https://www.heise.de/rss/heise-atom.xml",
    },
];

const ENGLISH_FEEDS: &[FeedSource] = &[
    FeedSource {
        name: "BBC",
        url: "https://feeds.bbci.co.uk/news/rss.xml",
    },
    FeedSource {
        name: "NASA",
        url: "https://www.nasa.gov/rss/dyn/breaking_news.rss",
    },
];

/// Feed choices follow the dashboard language.
pub fn feeds_for(language: Language) -> &'static [FeedSource] {
    match language {
        Language::De => GERMAN_FEEDS,
        Language::En => ENGLISH_FEEDS,
    }
}

pub const DEFAULT_MAX_ITEMS: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub published: Option<chrono::DateTime<chrono::Utc>>,
    /// Preview image if the entry carries one; never synthesized.
    pub image: Option<String>,
}

static IMG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#).unwrap());

/// Fetch a feed and assemble its item list.
pub fn fetch_feed(
    client: &Client,
    url: &str,
    max_items: usize,
) -> Result<Vec<NewsItem>, FetchError> {
    let resp = client
        .get(url)
        .send()
        .map_err(|err| FetchError::Upstream(err.to_string()))?;
    if !resp.status().is_success() {
        return Err(FetchError::Upstream(format!(
            "http status {}",
            resp.status()
        )));
    }
    let bytes = resp
        .bytes()
        .map_err(|err| FetchError::Upstream(err.to_string()))?;
    parse_feed_items(&bytes, max_items)
}

/// Parse raw RSS/Atom bytes into items sorted newest first and truncated to
/// `max_items`. A feed with zero entries counts as a failed fetch.
pub fn parse_feed_items(bytes: &[u8], max_items: usize) -> Result<Vec<NewsItem>, FetchError> {
    let feed = feed_rs::parser::parse(bytes)
        .map_err(|err| FetchError::Upstream(format!("parse feed: {err}")))?;
    if feed.entries.is_empty() {
        return Err(FetchError::Upstream("feed contained no items".into()));
    }

    let mut items: Vec<NewsItem> = feed.entries.iter().map(convert_entry).collect();
    // Descending by publication date; undated entries sink to the end.
    items.sort_by(|a, b| b.published.cmp(&a.published));
    items.truncate(max_items);
    Ok(items)
}

fn convert_entry(entry: &feed_rs::model::Entry) -> NewsItem {
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Untitled".into());
    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_default();
    let published = entry.published.or(entry.updated);
    let image = media_image(entry).or_else(|| body_image(entry));

    NewsItem {
        title,
        link,
        published,
        image,
    }
}

fn media_image(entry: &feed_rs::model::Entry) -> Option<String> {
    for media in &entry.media {
        for content in &media.content {
            if let Some(url) = &content.url {
                return Some(url.to_string());
            }
        }
        if let Some(thumb) = media.thumbnails.first() {
            return Some(thumb.image.uri.clone());
        }
    }
    None
}

/// Fall back to the first `<img src=…>` embedded in the entry HTML.
fn body_image(entry: &feed_rs::model::Entry) -> Option<String> {
    let mut html = String::new();
    if let Some(summary) = &entry.summary {
        html.push_str(&summary.content);
    }
    if let Some(body) = entry.content.as_ref().and_then(|c| c.body.as_deref()) {
        html.push_str(body);
    }
    IMG_RE
        .captures(&html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
