//! # Feature: Wikipedia Summaries
//!
//! Page summaries from the Wikipedia REST API, with a search-based
//! suggestion when the title does not exist.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release

use anyhow::{anyhow, Result};
use log::{debug, error, info};
use reqwest::StatusCode;
use serde::Deserialize;
use serenity::builder::CreateEmbed;
use serenity::utils::Colour;
use std::time::Duration;

use crate::api::{endpoint, USER_AGENT};
use crate::embeds::truncate;

const SUMMARY_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/summary/";
const SEARCH_URL: &str = "https://en.wikipedia.org/api/rest_v1/page/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const EXTRACT_LIMIT: usize = 1000;
const WIKI_BLUE: Colour = Colour(0x0066cc);

pub const CONNECT_FAILURE: &str = "❌ Could not connect to Wikipedia.";

#[derive(Deserialize, Debug, Default)]
struct RawSummary {
    title: Option<String>,
    extract: Option<String>,
    #[serde(default)]
    content_urls: Option<ContentUrls>,
    #[serde(default)]
    thumbnail: Option<Thumbnail>,
}

#[derive(Deserialize, Debug)]
struct ContentUrls {
    desktop: Option<DesktopUrls>,
}

#[derive(Deserialize, Debug)]
struct DesktopUrls {
    page: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Thumbnail {
    source: Option<String>,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    pages: Vec<SearchPage>,
}

#[derive(Deserialize, Debug)]
struct SearchPage {
    title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub extract: String,
    pub page_url: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WikiLookup {
    Found(Summary),
    Suggestion(String),
    NotFound,
}

/// Spaces become underscores, the way Wikipedia titles are addressed.
pub fn title_slug(topic: &str) -> String {
    topic.trim().replace(' ', "_")
}

pub fn parse_summary(topic: &str, body: &str) -> Result<Summary> {
    let raw: RawSummary = serde_json::from_str(body)
        .map_err(|e| anyhow!("Failed to parse Wikipedia summary: {}", e))?;
    Ok(Summary {
        title: raw.title.unwrap_or_else(|| topic.to_string()),
        extract: truncate(
            raw.extract.as_deref().unwrap_or("No summary available."),
            EXTRACT_LIMIT,
        ),
        page_url: raw
            .content_urls
            .and_then(|c| c.desktop)
            .and_then(|d| d.page)
            .unwrap_or_default(),
        thumbnail: raw.thumbnail.and_then(|t| t.source).filter(|s| !s.is_empty()),
    })
}

pub fn parse_suggestion(body: &str) -> Option<String> {
    let response: SearchResponse = serde_json::from_str(body).ok()?;
    response.pages.into_iter().next().map(|p| p.title)
}

#[derive(Clone)]
pub struct WikiClient {
    client: reqwest::Client,
}

impl Default for WikiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WikiClient {
    pub fn new() -> Self {
        WikiClient {
            client: reqwest::Client::new(),
        }
    }

    pub async fn lookup(&self, topic: &str) -> Result<WikiLookup> {
        let url = endpoint(SUMMARY_URL, &[&title_slug(topic)])?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                info!("📚 Wikipedia summary fetched for '{}'", topic);
                Ok(WikiLookup::Found(parse_summary(topic, &body)?))
            }
            StatusCode::NOT_FOUND => {
                debug!("No Wikipedia page for '{}', searching", topic);
                Ok(match self.search(topic).await {
                    Some(title) => WikiLookup::Suggestion(title),
                    None => WikiLookup::NotFound,
                })
            }
            status => {
                error!("Wikipedia API error (status {})", status);
                Err(anyhow!("Wikipedia API error (status {})", status))
            }
        }
    }

    async fn search(&self, topic: &str) -> Option<String> {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", topic), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        parse_suggestion(&response.text().await.ok()?)
    }
}

pub fn suggestion_message(title: &str) -> String {
    format!(
        "❓ Topic not found. Did you mean: **{}**?\nTry: `?wiki {}`",
        title, title
    )
}

pub fn not_found_message(topic: &str) -> String {
    format!("❌ No Wikipedia article found for **{}**.", topic)
}

pub fn summary_embed(summary: &Summary) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title(format!("📚 {}", summary.title))
        .description(&summary.extract)
        .colour(WIKI_BLUE)
        .field(
            "🔗 Learn More",
            format!("[Read full article on Wikipedia]({})", summary.page_url),
            false,
        )
        .footer(|f| f.text("📖 Wikipedia • Great for learning and research!"));
    if !summary.page_url.is_empty() {
        embed.url(&summary.page_url);
    }
    if let Some(thumbnail) = &summary.thumbnail {
        embed.thumbnail(thumbnail);
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{colour, description, title};

    #[test]
    fn test_title_slug() {
        assert_eq!(title_slug(" black hole "), "black_hole");
    }

    #[test]
    fn test_parse_summary_truncates() {
        let long = "x".repeat(1500);
        let body = format!(
            r#"{{"title":"Black hole","extract":"{}","content_urls":{{"desktop":{{"page":"https://en.wikipedia.org/wiki/Black_hole"}}}},"thumbnail":{{"source":"https://upload/bh.png"}}}}"#,
            long
        );
        let summary = parse_summary("black hole", &body).unwrap();
        assert_eq!(summary.title, "Black hole");
        assert_eq!(summary.extract.chars().count(), EXTRACT_LIMIT);
        assert!(summary.extract.ends_with("..."));
        assert_eq!(summary.page_url, "https://en.wikipedia.org/wiki/Black_hole");
        assert_eq!(summary.thumbnail.as_deref(), Some("https://upload/bh.png"));
    }

    #[test]
    fn test_parse_summary_defaults() {
        let summary = parse_summary("Nothing", "{}").unwrap();
        assert_eq!(summary.title, "Nothing");
        assert_eq!(summary.extract, "No summary available.");
        assert_eq!(summary.thumbnail, None);
    }

    #[test]
    fn test_parse_suggestion() {
        assert_eq!(
            parse_suggestion(r#"{"pages":[{"id":1,"title":"Albert Einstein"}]}"#).as_deref(),
            Some("Albert Einstein")
        );
        assert_eq!(parse_suggestion(r#"{"pages":[]}"#), None);
    }

    #[test]
    fn test_messages_and_embed() {
        assert_eq!(
            suggestion_message("Albert Einstein"),
            "❓ Topic not found. Did you mean: **Albert Einstein**?\nTry: `?wiki Albert Einstein`"
        );
        let summary = Summary {
            title: "Rust".to_string(),
            extract: "A language.".to_string(),
            page_url: "https://en.wikipedia.org/wiki/Rust".to_string(),
            thumbnail: None,
        };
        let embed = summary_embed(&summary);
        assert_eq!(title(&embed), Some("📚 Rust"));
        assert_eq!(description(&embed), Some("A language."));
        assert_eq!(colour(&embed), Some(0x0066cc));
    }
}
