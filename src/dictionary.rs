//! # Feature: Dictionary
//!
//! Word definitions from DictionaryAPI.dev with FreeDictionaryAPI as a
//! fallback when the primary source has nothing.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Fallback source
//! - 1.0.0: Initial release

use anyhow::Result;
use log::{debug, info, warn};
use serde::Deserialize;
use serenity::builder::CreateEmbed;
use serenity::model::Timestamp;
use std::time::Duration;

use crate::api::{endpoint, USER_AGENT};
use crate::embeds::{BLUE, GREEN};

const PRIMARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";
const FALLBACK_URL: &str = "https://freedictionaryapi.com/api/v1/entries/en/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/15585/15585721.png";

/// Meanings shown per lookup.
pub const MAX_MEANINGS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    DictionaryApi,
    FreeDictionary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meaning {
    pub part_of_speech: String,
    pub definition: String,
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub word: String,
    pub pronunciation: String,
    pub audio_url: Option<String>,
    pub meanings: Vec<Meaning>,
    pub source: Source,
}

#[derive(Deserialize, Debug, Default)]
struct RawEntry {
    #[serde(default)]
    phonetics: Vec<RawPhonetic>,
    #[serde(default)]
    meanings: Vec<RawMeaning>,
}

#[derive(Deserialize, Debug, Default)]
struct RawPhonetic {
    text: Option<String>,
    audio: Option<String>,
}

#[derive(Deserialize, Debug)]
struct RawMeaning {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<RawDefinition>,
}

#[derive(Deserialize, Debug)]
struct RawDefinition {
    definition: String,
    example: Option<String>,
}

#[derive(Deserialize, Debug)]
struct FallbackResponse {
    #[serde(default)]
    entries: Vec<RawEntry>,
}

impl RawEntry {
    fn into_definition(self, word: &str, source: Source) -> Definition {
        let phonetic = self.phonetics.into_iter().next().unwrap_or_default();
        let meanings = self
            .meanings
            .into_iter()
            .filter_map(|m| {
                let first = m.definitions.into_iter().next()?;
                Some(Meaning {
                    part_of_speech: m.part_of_speech,
                    definition: first.definition,
                    example: first.example.filter(|e| !e.trim().is_empty()),
                })
            })
            .take(MAX_MEANINGS)
            .collect();

        Definition {
            word: word.to_string(),
            pronunciation: phonetic
                .text
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            audio_url: phonetic.audio.filter(|a| !a.is_empty()),
            meanings,
            source,
        }
    }
}

/// Parses a DictionaryAPI.dev body (a JSON array of entries).
pub fn parse_primary(word: &str, body: &str) -> Option<Definition> {
    let entries: Vec<RawEntry> = serde_json::from_str(body).ok()?;
    entries
        .into_iter()
        .next()
        .map(|entry| entry.into_definition(word, Source::DictionaryApi))
}

/// Parses a FreeDictionaryAPI body (`{"entries": [...]}`).
pub fn parse_fallback(word: &str, body: &str) -> Option<Definition> {
    let response: FallbackResponse = serde_json::from_str(body).ok()?;
    response
        .entries
        .into_iter()
        .next()
        .map(|entry| entry.into_definition(word, Source::FreeDictionary))
}

#[derive(Clone)]
pub struct DictionaryClient {
    client: reqwest::Client,
}

impl Default for DictionaryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryClient {
    pub fn new() -> Self {
        DictionaryClient {
            client: reqwest::Client::new(),
        }
    }

    /// Primary source first, then the fallback. `None` when neither knows the word.
    pub async fn lookup(&self, word: &str) -> Option<Definition> {
        match self.fetch(PRIMARY_URL, word).await {
            Ok(Some(body)) => {
                if let Some(definition) = parse_primary(word, &body) {
                    info!("📘 Definition for '{}' from DictionaryAPI.dev", word);
                    return Some(definition);
                }
            }
            Ok(None) => debug!("DictionaryAPI.dev has no entry for '{}'", word),
            Err(e) => warn!("DictionaryAPI.dev request failed for '{}': {}", word, e),
        }

        match self.fetch(FALLBACK_URL, word).await {
            Ok(Some(body)) => {
                let definition = parse_fallback(word, &body);
                if definition.is_some() {
                    info!("📘 Definition for '{}' from FreeDictionaryAPI", word);
                }
                definition
            }
            Ok(None) => None,
            Err(e) => {
                warn!("FreeDictionaryAPI request failed for '{}': {}", word, e);
                None
            }
        }
    }

    async fn fetch(&self, base: &str, word: &str) -> Result<Option<String>> {
        let url = endpoint(base, &[word])?;
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            debug!("Dictionary lookup returned {}", response.status());
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }
}

pub fn not_found_message(word: &str) -> String {
    format!("Couldn't find a definition for **{}**.", word)
}

pub fn definition_embed(definition: &Definition) -> CreateEmbed {
    let (colour, footer) = match definition.source {
        Source::DictionaryApi => (BLUE, "Source: DictionaryAPI.dev"),
        Source::FreeDictionary => (GREEN, "Source: FreeDictionaryAPI.com"),
    };

    let mut embed = CreateEmbed::default();
    embed
        .title(format!("📘 Definition of '{}'", definition.word))
        .description(format!("**Pronunciation:** `{}`", definition.pronunciation))
        .colour(colour)
        .author(|a| a.name("UnderLand Dictionary").icon_url(ICON_URL))
        .thumbnail(ICON_URL)
        .timestamp(Timestamp::now())
        .footer(|f| f.text(footer));

    for meaning in &definition.meanings {
        embed.field(
            format!("🔹 {}", crate::games::capitalize(&meaning.part_of_speech)),
            format!(
                "**Definition:** {}\n**Example:** _{}_",
                meaning.definition,
                meaning.example.as_deref().unwrap_or("No example provided.")
            ),
            false,
        );
    }

    if let Some(audio) = &definition.audio_url {
        embed.field(
            "🔊 Pronunciation Audio",
            format!("[Click here to listen]({})", audio),
            false,
        );
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{colour, description, field, field_names, footer, title};

    const PRIMARY_BODY: &str = r#"[{
        "word": "serendipity",
        "phonetics": [{"text": "/ˌsɛɹənˈdɪpɪti/", "audio": "https://audio.example/serendipity.mp3"}],
        "meanings": [
            {"partOfSpeech": "noun", "definitions": [
                {"definition": "An unsought, unintended discovery.", "example": "It was pure serendipity."},
                {"definition": "Second sense."}
            ]},
            {"partOfSpeech": "verb", "definitions": []},
            {"partOfSpeech": "adjective", "definitions": [{"definition": "Lucky."}]},
            {"partOfSpeech": "adverb", "definitions": [{"definition": "Luckily."}]},
            {"partOfSpeech": "interjection", "definitions": [{"definition": "Hooray."}]}
        ]
    }]"#;

    #[test]
    fn test_parse_primary() {
        let def = parse_primary("serendipity", PRIMARY_BODY).unwrap();
        assert_eq!(def.pronunciation, "/ˌsɛɹənˈdɪpɪti/");
        assert_eq!(def.audio_url.as_deref(), Some("https://audio.example/serendipity.mp3"));
        assert_eq!(def.meanings.len(), MAX_MEANINGS);
        assert_eq!(def.meanings[0].definition, "An unsought, unintended discovery.");
        assert_eq!(def.meanings[1].part_of_speech, "adjective");
        assert_eq!(def.meanings[1].example, None);
        assert_eq!(def.source, Source::DictionaryApi);
    }

    #[test]
    fn test_parse_primary_rejects_error_body() {
        let body = r#"{"title":"No Definitions Found","message":"Sorry pal"}"#;
        assert!(parse_primary("zzz", body).is_none());
        assert!(parse_primary("zzz", "[]").is_none());
    }

    #[test]
    fn test_parse_fallback_defaults() {
        let body = r#"{"entries":[{"meanings":[{"partOfSpeech":"noun","definitions":[{"definition":"A cat.","example":""}]}],"phonetics":[{"audio":""}]}]}"#;
        let def = parse_fallback("cat", body).unwrap();
        assert_eq!(def.pronunciation, "N/A");
        assert_eq!(def.audio_url, None);
        assert_eq!(def.meanings[0].example, None);
        assert_eq!(def.source, Source::FreeDictionary);
    }

    #[test]
    fn test_definition_embed() {
        let def = parse_primary("serendipity", PRIMARY_BODY).unwrap();
        let embed = definition_embed(&def);
        assert_eq!(title(&embed), Some("📘 Definition of 'serendipity'"));
        assert_eq!(description(&embed), Some("**Pronunciation:** `/ˌsɛɹənˈdɪpɪti/`"));
        assert_eq!(colour(&embed), Some(BLUE.0 as u64));
        assert_eq!(footer(&embed), Some("Source: DictionaryAPI.dev"));
        assert_eq!(
            field(&embed, "🔹 Noun"),
            Some("**Definition:** An unsought, unintended discovery.\n**Example:** _It was pure serendipity._")
        );
        assert!(field(&embed, "🔹 Adjective").unwrap().ends_with("_No example provided._"));
        assert_eq!(field_names(&embed).last().map(String::as_str), Some("🔊 Pronunciation Audio"));
    }

    #[test]
    fn test_fallback_embed_colour() {
        let def = Definition {
            word: "cat".to_string(),
            pronunciation: "N/A".to_string(),
            audio_url: None,
            meanings: vec![],
            source: Source::FreeDictionary,
        };
        let embed = definition_embed(&def);
        assert_eq!(colour(&embed), Some(GREEN.0 as u64));
        assert!(field_names(&embed).is_empty());
    }
}
