//! # Feature: Word Association
//!
//! Similar-meaning words and rhymes from the Datamuse API.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release

use anyhow::{anyhow, Result};
use log::{debug, error};
use serde::Deserialize;
use serenity::builder::CreateEmbed;
use std::time::Duration;

use crate::api::USER_AGENT;
use crate::embeds::BLUE;
use crate::games::capitalize;

const DATAMUSE_URL: &str = "https://api.datamuse.com/words";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SIMILAR_SHOWN: usize = 8;
const RHYMES_SHOWN: usize = 5;

pub const CONNECT_FAILURE: &str = "❌ Could not connect to the word association service.";

#[derive(Deserialize, Debug)]
struct DatamuseWord {
    word: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Associations {
    pub similar: Vec<String>,
    pub rhymes: Vec<String>,
}

impl Associations {
    pub fn is_empty(&self) -> bool {
        self.similar.is_empty()
    }
}

pub fn parse_words(body: &str, limit: usize) -> Result<Vec<String>> {
    let words: Vec<DatamuseWord> = serde_json::from_str(body)
        .map_err(|e| anyhow!("Failed to parse Datamuse response: {}", e))?;
    Ok(words.into_iter().take(limit).map(|w| w.word).collect())
}

#[derive(Clone)]
pub struct DatamuseClient {
    client: reqwest::Client,
}

impl Default for DatamuseClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DatamuseClient {
    pub fn new() -> Self {
        DatamuseClient {
            client: reqwest::Client::new(),
        }
    }

    /// Fails only when the similar-words request does; rhymes are best effort.
    pub async fn associate(&self, word: &str) -> Result<Associations> {
        let similar = self.query("ml", word, 10).await?;
        let similar = parse_words(&similar, SIMILAR_SHOWN)?;

        let rhymes = match self.query("rel_rhy", word, RHYMES_SHOWN).await {
            Ok(body) => parse_words(&body, RHYMES_SHOWN).unwrap_or_default(),
            Err(e) => {
                debug!("Rhyme lookup failed for '{}': {}", word, e);
                Vec::new()
            }
        };

        Ok(Associations { similar, rhymes })
    }

    async fn query(&self, relation: &str, word: &str, max: usize) -> Result<String> {
        let response = self
            .client
            .get(DATAMUSE_URL)
            .query(&[(relation, word), ("max", &max.to_string())])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Datamuse API error (status {})", status);
            return Err(anyhow!("Datamuse API error (status {})", status));
        }
        Ok(response.text().await?)
    }
}

pub fn empty_message(word: &str) -> String {
    format!("No related words found for **{}**.", word)
}

pub fn associations_embed(word: &str, associations: &Associations) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title(format!("🔗 Words Related to '{}'", capitalize(word)))
        .colour(BLUE)
        .description(format!("**Similar meaning:** {}", associations.similar.join(", ")))
        .footer(|f| f.text("💡 Great for vocabulary building and creative writing!"));

    if !associations.rhymes.is_empty() {
        embed.field("🎵 Rhymes", associations.rhymes.join(", "), false);
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{description, field, title};

    #[test]
    fn test_parse_words_limits() {
        let body = r#"[{"word":"a","score":9},{"word":"b","score":8},{"word":"c","score":7}]"#;
        assert_eq!(parse_words(body, 2).unwrap(), vec!["a", "b"]);
        assert!(parse_words("[]", 5).unwrap().is_empty());
        assert!(parse_words("<html>", 5).is_err());
    }

    #[test]
    fn test_embed_with_rhymes() {
        let associations = Associations {
            similar: vec!["glad".to_string(), "joyful".to_string()],
            rhymes: vec!["snappy".to_string()],
        };
        let embed = associations_embed("happy", &associations);
        assert_eq!(title(&embed), Some("🔗 Words Related to 'Happy'"));
        assert_eq!(description(&embed), Some("**Similar meaning:** glad, joyful"));
        assert_eq!(field(&embed, "🎵 Rhymes"), Some("snappy"));
    }

    #[test]
    fn test_embed_without_rhymes() {
        let associations = Associations {
            similar: vec!["glad".to_string()],
            rhymes: vec![],
        };
        assert!(field(&associations_embed("happy", &associations), "🎵 Rhymes").is_none());
        assert!(Associations::default().is_empty());
    }
}
