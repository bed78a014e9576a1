//! # Feature: Grammar Checker
//!
//! Grammar and spell checking through the public LanguageTool API, with an
//! interactive view that steps through each issue and applies fixes.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Quick fix and language listing
//! - 1.0.0: Initial release with LanguageTool integration

use anyhow::{anyhow, Result};
use log::{error, info};
use serde::Deserialize;
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use std::time::Duration;

use crate::embeds::{BLUE, FIELD_VALUE_LIMIT, GREEN, ORANGE, RED};
use crate::views::{Expiring, ViewTimeout};

const LANGUAGETOOL_URL: &str = "https://api.languagetool.org/v2/check";
const GRAMMAR_USER_AGENT: &str = "UnderLand-Grammar-Bot/2025.1 (Discord Bot)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_REPLACEMENTS: usize = 5;
const CONTEXT_RADIUS: usize = 50;
const PREVIEW_CHARS: usize = 500;

pub const VIEW_TIMEOUT: Duration = Duration::from_secs(120);
pub const MAX_CHECK_CHARS: usize = 2000;
pub const MAX_QUICKFIX_CHARS: usize = 1000;
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const BUTTON_PREFIX: &str = "grammar:";

pub const TOO_LONG: &str = "❌ Text is too long! Please limit to 2000 characters.";
pub const QUICKFIX_TOO_LONG: &str = "❌ Text too long for quick fix! Use `?grammar` for longer texts.";

/// (code, name, flag)
pub const LANGUAGES: &[(&str, &str, &str)] = &[
    ("en-US", "English (US)", "🇺🇸"),
    ("en-GB", "English (UK)", "🇬🇧"),
    ("en-CA", "English (Canada)", "🇨🇦"),
    ("en-AU", "English (Australia)", "🇦🇺"),
    ("de", "German", "🇩🇪"),
    ("fr", "French", "🇫🇷"),
    ("es", "Spanish", "🇪🇸"),
    ("it", "Italian", "🇮🇹"),
    ("pt", "Portuguese", "🇵🇹"),
    ("nl", "Dutch", "🇳🇱"),
    ("ru", "Russian", "🇷🇺"),
];

/// Languages offered as slash-command choices.
pub const SLASH_LANGUAGES: &[&str] = &["en-US", "en-GB", "en-CA", "de", "fr", "es", "it"];

pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|(_, name, _)| *name)
        .unwrap_or(code)
}

pub fn friendly_category(category: &str) -> &str {
    match category {
        "TYPOS" => "Spelling Error",
        "GRAMMAR" => "Grammar Error",
        "PUNCTUATION" => "Punctuation",
        "CASING" => "Capitalization",
        "REDUNDANCY" => "Redundancy",
        "STYLE" => "Style",
        "COLLOQUIALISMS" => "Informal Language",
        "PLAIN_ENGLISH" => "Clarity",
        "SEMANTICS" => "Word Choice",
        other => other,
    }
}

#[derive(Deserialize, Debug)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Deserialize, Debug)]
struct RawMatch {
    message: Option<String>,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    length: usize,
    #[serde(default)]
    replacements: Vec<RawReplacement>,
    rule: Option<RawRule>,
}

#[derive(Deserialize, Debug)]
struct RawReplacement {
    #[serde(default)]
    value: String,
}

#[derive(Deserialize, Debug)]
struct RawRule {
    id: Option<String>,
    category: Option<RawCategory>,
}

#[derive(Deserialize, Debug)]
struct RawCategory {
    id: Option<String>,
    name: Option<String>,
}

/// One issue reported by LanguageTool. Offsets count characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub message: String,
    pub offset: usize,
    pub length: usize,
    pub replacements: Vec<String>,
    pub issue_type: String,
    pub rule_category: String,
    pub rule_id: String,
}

impl Correction {
    /// Replaces this issue's span with the first suggestion, or removes it.
    pub fn apply(&self, text: &str) -> String {
        let replacement = self.replacements.first().map(String::as_str).unwrap_or("");
        let chars: Vec<char> = text.chars().collect();
        let start = self.offset.min(chars.len());
        let end = (self.offset + self.length).min(chars.len());
        let mut out: String = chars[..start].iter().collect();
        out.push_str(replacement);
        out.extend(&chars[end..]);
        out
    }
}

pub fn parse_corrections(body: &str) -> Result<Vec<Correction>> {
    let response: CheckResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("Failed to parse LanguageTool response: {}", e))?;

    Ok(response
        .matches
        .into_iter()
        .map(|m| {
            let (rule_id, category_id) = match m.rule {
                Some(rule) => {
                    let category = rule
                        .category
                        .and_then(|c| c.id.or(c.name))
                        .unwrap_or_else(|| "Unknown".to_string());
                    (rule.id.unwrap_or_else(|| "unknown".to_string()), category)
                }
                None => ("unknown".to_string(), "Unknown".to_string()),
            };
            Correction {
                message: m
                    .message
                    .unwrap_or_else(|| "No description available".to_string()),
                offset: m.offset,
                length: m.length,
                replacements: m
                    .replacements
                    .into_iter()
                    .take(MAX_REPLACEMENTS)
                    .map(|r| r.value)
                    .collect(),
                issue_type: friendly_category(&category_id).to_string(),
                rule_category: category_id,
                rule_id,
            }
        })
        .collect())
}

/// Applies corrections from the highest offset down so earlier offsets stay valid.
/// Applies from the highest offset down. A span overlapping one already
/// applied is skipped.
pub fn apply_all<'a>(text: &str, corrections: impl IntoIterator<Item = &'a Correction>) -> String {
    let mut sorted: Vec<&Correction> = corrections.into_iter().collect();
    sorted.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut applied_from = usize::MAX;
    let mut out = text.to_string();
    for correction in sorted {
        if correction.offset + correction.length > applied_from {
            continue;
        }
        out = correction.apply(&out);
        applied_from = correction.offset;
    }
    out
}

/// Quick fix only touches issues that come with a suggestion.
pub fn quick_fix(text: &str, corrections: &[Correction]) -> String {
    apply_all(text, corrections.iter().filter(|c| !c.replacements.is_empty()))
}

#[derive(Clone)]
pub struct GrammarClient {
    client: reqwest::Client,
}

impl Default for GrammarClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarClient {
    pub fn new() -> Self {
        GrammarClient {
            client: reqwest::Client::new(),
        }
    }

    pub async fn check(&self, text: &str, language: &str) -> Result<Vec<Correction>> {
        info!("📝 Checking {} chars with LanguageTool ({})", text.chars().count(), language);

        let response = self
            .client
            .post(LANGUAGETOOL_URL)
            .header(reqwest::header::USER_AGENT, GRAMMAR_USER_AGENT)
            .form(&[("text", text), ("language", language), ("enabledOnly", "false")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Request timed out")
                } else {
                    anyhow!(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("LanguageTool API error: {}", status);
            return Err(anyhow!("API returned status {}", status.as_u16()));
        }

        parse_corrections(&response.text().await?)
    }
}

/// Full text in a code block, cut to fit one embed field.
fn code_block(text: &str) -> String {
    format!("```{}```", crate::embeds::truncate(text, FIELD_VALUE_LIMIT - 6))
}

pub fn no_fixes_message(text: &str) -> String {
    format!("✅ **No fixes needed!**\n```{}```", text)
}

pub fn quick_fix_failed_message(error: &impl std::fmt::Display) -> String {
    format!("❌ Quick fix failed: {}", error)
}

fn preview(text: &str) -> String {
    let chars = text.chars().count();
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    if chars > PREVIEW_CHARS {
        format!("```{}...```", head)
    } else {
        format!("```{}```", head)
    }
}

pub fn failure_embed(error: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("❌ Grammar Check Failed")
        .description(format!("Unable to check your text: {}", error))
        .colour(RED);
    embed
}

pub fn clean_embed(text: &str, language: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("✅ Excellent Writing!")
        .description("No grammar or spelling issues found in your text.")
        .colour(GREEN)
        .field("📝 Your Text", preview(text), false)
        .field("🌍 Language", language_name(language), true)
        .field(
            "📊 Statistics",
            format!(
                "• **Words:** {}\n• **Characters:** {}",
                text.split_whitespace().count(),
                text.chars().count()
            ),
            true,
        )
        .footer(|f| f.text("Powered by LanguageTool API • Keep up the great writing!"));
    embed
}

pub fn quick_fix_embed(text: &str, corrections: &[Correction]) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🔧 Quick Fix Applied")
        .description(format!("Found and fixed {} issues", corrections.len()))
        .colour(GREEN)
        .field("📝 Original", code_block(text), false)
        .field("✨ Corrected", code_block(&quick_fix(text, corrections)), false);

    if corrections.len() <= 3 {
        let fixes: Vec<String> = corrections
            .iter()
            .map(|c| format!("• {}: {}", c.issue_type, crate::embeds::truncate(&c.message, 53)))
            .collect();
        embed.field("🔍 Fixes Applied", fixes.join("\n"), false);
    }
    embed.footer(|f| f.text("Use ?grammar for interactive checking with more options"));
    embed
}

pub fn languages_embed() -> CreateEmbed {
    let line = |(code, name, flag): &(&str, &str, &str)| format!("{} {} - `{}`", flag, name, code);
    let (english, other): (Vec<_>, Vec<_>) =
        LANGUAGES.iter().partition(|(code, _, _)| code.starts_with("en"));

    let mut embed = CreateEmbed::default();
    embed
        .title("🌍 Supported Languages")
        .description("Languages available for grammar and spell checking")
        .colour(BLUE)
        .field(
            "🔤 English Variants",
            english.iter().map(|l| line(l)).collect::<Vec<_>>().join("\n"),
            false,
        )
        .field(
            "🌐 Other Languages",
            other.iter().map(|l| line(l)).collect::<Vec<_>>().join("\n"),
            false,
        )
        .field(
            "💡 Usage",
            "Use `/grammar` with language option or `?grammar` (defaults to English US)",
            false,
        )
        .footer(|f| f.text("Powered by LanguageTool API • More languages may be added"));
    embed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarAction {
    Previous,
    Next,
    Apply,
    ApplyAll,
    Ignore,
}

impl GrammarAction {
    fn id(&self) -> &'static str {
        match self {
            GrammarAction::Previous => "prev",
            GrammarAction::Next => "next",
            GrammarAction::Apply => "apply",
            GrammarAction::ApplyAll => "apply_all",
            GrammarAction::Ignore => "ignore",
        }
    }

    pub fn custom_id(&self) -> String {
        format!("{}{}", BUTTON_PREFIX, self.id())
    }

    pub fn parse(custom_id: &str) -> Option<Self> {
        let action = custom_id.strip_prefix(BUTTON_PREFIX)?;
        [
            GrammarAction::Previous,
            GrammarAction::Next,
            GrammarAction::Apply,
            GrammarAction::ApplyAll,
            GrammarAction::Ignore,
        ]
        .into_iter()
        .find(|a| a.id() == action)
    }
}

/// What a button press should do to the message.
pub enum GrammarUpdate {
    /// Re-render the current page with live buttons.
    Page(CreateEmbed, CreateComponents),
    /// Replace the message and drop the view.
    Finished(CreateEmbed),
    Unchanged,
}

pub struct GrammarView {
    original_text: String,
    corrections: Vec<Correction>,
    language: String,
    page: usize,
}

impl GrammarView {
    pub fn new(original_text: &str, corrections: Vec<Correction>, language: &str) -> Self {
        GrammarView {
            original_text: original_text.to_string(),
            corrections,
            language: language.to_string(),
            page: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn correction_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::default();
        let Some(correction) = self.corrections.get(self.page) else {
            embed
                .title("✅ No Issues Found")
                .description("Your text looks great!")
                .colour(GREEN);
            return embed;
        };

        embed
            .title(format!(
                "📝 Grammar Check ({}/{})",
                self.page + 1,
                self.corrections.len()
            ))
            .description(format!("**Issue Type:** {}", correction.issue_type))
            .colour(ORANGE)
            .field("🔍 Context", format!("...{}...", self.highlighted(correction)), false)
            .field("❗ Issue", &correction.message, false);

        if !correction.replacements.is_empty() {
            let suggestions: Vec<String> = correction
                .replacements
                .iter()
                .take(3)
                .map(|r| format!("`{}`", r))
                .collect();
            embed.field("💡 Suggestions", suggestions.join(", "), false);
        }
        if !correction.rule_category.is_empty() {
            embed.field("📚 Category", &correction.rule_category, true);
        }
        embed.footer(|f| f.text("Use the buttons below to apply fixes or navigate between issues"));
        embed
    }

    /// First page plus the summary block shown when the check is posted.
    pub fn initial_embed(&self) -> CreateEmbed {
        let mut embed = self.correction_embed();
        embed.field(
            "📊 Summary",
            format!(
                "• **Issues Found:** {}\n• **Language:** {}\n• **Text Length:** {} characters",
                self.corrections.len(),
                language_name(&self.language),
                self.original_text.chars().count()
            ),
            false,
        );
        embed
    }

    fn highlighted(&self, correction: &Correction) -> String {
        let chars: Vec<char> = self.original_text.chars().collect();
        let err_start = correction.offset.min(chars.len());
        let err_end = (correction.offset + correction.length).min(chars.len());
        let ctx_start = err_start.saturating_sub(CONTEXT_RADIUS);
        let ctx_end = (err_end + CONTEXT_RADIUS).min(chars.len());

        let before: String = chars[ctx_start..err_start].iter().collect();
        let error: String = chars[err_start..err_end].iter().collect();
        let after: String = chars[err_end..ctx_end].iter().collect();
        format!("{}**__{}__**{}", before, error, after)
    }

    pub fn components(&self, disabled: bool) -> CreateComponents {
        let mut components = CreateComponents::default();
        if self.corrections.len() > 1 {
            components.create_action_row(|row| {
                row.create_button(|b| {
                    b.custom_id(GrammarAction::Previous.custom_id())
                        .label("⬅️ Previous")
                        .style(ButtonStyle::Secondary)
                        .disabled(disabled || self.page == 0)
                })
                .create_button(|b| {
                    b.custom_id(GrammarAction::Next.custom_id())
                        .label("➡️ Next")
                        .style(ButtonStyle::Secondary)
                        .disabled(disabled || self.page + 1 >= self.corrections.len())
                })
            });
        }
        components.create_action_row(|row| {
            row.create_button(|b| {
                b.custom_id(GrammarAction::Apply.custom_id())
                    .label("✅ Apply This Fix")
                    .style(ButtonStyle::Success)
                    .disabled(disabled)
            })
            .create_button(|b| {
                b.custom_id(GrammarAction::ApplyAll.custom_id())
                    .label("🔄 Apply All Fixes")
                    .style(ButtonStyle::Primary)
                    .disabled(disabled)
            })
            .create_button(|b| {
                b.custom_id(GrammarAction::Ignore.custom_id())
                    .label("❌ Ignore")
                    .style(ButtonStyle::Secondary)
                    .disabled(disabled)
            })
        });
        components
    }

    pub fn handle(&mut self, action: GrammarAction) -> GrammarUpdate {
        match action {
            GrammarAction::Previous if self.page > 0 => {
                self.page -= 1;
                GrammarUpdate::Page(self.correction_embed(), self.components(false))
            }
            GrammarAction::Next if self.page + 1 < self.corrections.len() => {
                self.page += 1;
                GrammarUpdate::Page(self.correction_embed(), self.components(false))
            }
            GrammarAction::Previous | GrammarAction::Next => GrammarUpdate::Unchanged,
            GrammarAction::Apply => match self.corrections.get(self.page) {
                Some(correction) => {
                    let mut embed = CreateEmbed::default();
                    embed
                        .title("✅ Correction Applied")
                        .description(format!("Applied fix for: **{}**", correction.issue_type))
                        .colour(GREEN)
                        .field(
                            "📝 Corrected Text",
                            code_block(&correction.apply(&self.original_text)),
                            false,
                        );
                    GrammarUpdate::Finished(embed)
                }
                None => GrammarUpdate::Unchanged,
            },
            GrammarAction::ApplyAll => {
                let corrected = apply_all(&self.original_text, &self.corrections);
                let mut embed = CreateEmbed::default();
                embed
                    .title("🔄 All Corrections Applied")
                    .description(format!("Applied {} fixes to your text.", self.corrections.len()))
                    .colour(GREEN)
                    .field("📝 Original Text", preview(&self.original_text), false)
                    .field("✨ Corrected Text", preview(&corrected), false);
                GrammarUpdate::Finished(embed)
            }
            GrammarAction::Ignore => {
                let mut embed = CreateEmbed::default();
                embed
                    .title("❌ Correction Ignored")
                    .description("The current suggestion has been ignored.")
                    .colour(ORANGE);
                GrammarUpdate::Finished(embed)
            }
        }
    }
}

impl Expiring for GrammarView {
    fn timeout(&self) -> Duration {
        VIEW_TIMEOUT
    }

    fn on_timeout(&self) -> ViewTimeout {
        ViewTimeout {
            content: None,
            embed: None,
            components: self.components(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{description, field, title};

    const BODY: &str = r#"{"matches":[
        {"message":"Possible spelling mistake found.","offset":2,"length":3,
         "replacements":[{"value":"have"},{"value":"hive"}],
         "rule":{"id":"MORFOLOGIK_RULE_EN_US","category":{"id":"TYPOS","name":"Possible Typo"}}},
        {"message":"Use 'an' instead of 'a'.","offset":6,"length":1,
         "replacements":[{"value":"an"}],
         "rule":{"id":"EN_A_VS_AN","category":{"id":"MISC","name":"Miscellaneous"}}},
        {"message":"Sentence should end with punctuation.","offset":15,"length":0,
         "replacements":[],
         "rule":{"id":"PUNCT","category":{"id":"PUNCTUATION","name":"Punctuation"}}}
    ]}"#;

    const TEXT: &str = "I hav a apple pie";

    fn corrections() -> Vec<Correction> {
        parse_corrections(BODY).unwrap()
    }

    #[test]
    fn test_parse_corrections() {
        let list = corrections();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].issue_type, "Spelling Error");
        assert_eq!(list[0].rule_category, "TYPOS");
        assert_eq!(list[0].replacements, vec!["have", "hive"]);
        assert_eq!(list[1].issue_type, "MISC");
        assert_eq!(list[2].issue_type, "Punctuation");
        assert!(parse_corrections(r#"{"matches":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_apply_single() {
        assert_eq!(corrections()[0].apply(TEXT), "I have a apple pie");
    }

    #[test]
    fn test_apply_all_uses_reverse_offsets() {
        let list = corrections();
        let fixed = apply_all(TEXT, &list[..2]);
        assert_eq!(fixed, "I have an apple pie");
    }

    #[test]
    fn test_quick_fix_skips_suggestionless() {
        let list = corrections();
        assert_eq!(quick_fix(TEXT, &list), "I have an apple pie");
    }

    fn correction(offset: usize, length: usize, replacement: Option<&str>) -> Correction {
        Correction {
            message: "Check this.".to_string(),
            offset,
            length,
            replacements: replacement.map(str::to_string).into_iter().collect(),
            issue_type: "Grammar Issue".to_string(),
            rule_category: String::new(),
            rule_id: String::new(),
        }
    }

    #[test]
    fn test_quick_fix_leaves_spans_without_suggestions() {
        let list = vec![correction(2, 3, None), correction(6, 1, Some("an"))];
        assert_eq!(quick_fix(TEXT, &list), "I hav an apple pie");
        // Applied directly, a suggestionless span is removed.
        assert_eq!(apply_all(TEXT, &list), "I  an apple pie");
    }

    #[test]
    fn test_apply_all_skips_overlapping_spans() {
        // "hav a" and "a" overlap; the later span wins and the wider one is dropped.
        let list = vec![correction(2, 5, Some("have a")), correction(6, 1, Some("an"))];
        assert_eq!(apply_all(TEXT, &list), "I hav an apple pie");

        let list = vec![correction(0, 1, Some("We")), correction(2, 3, Some("have"))];
        assert_eq!(apply_all(TEXT, &list), "We have a apple pie");
    }

    #[test]
    fn test_long_text_fits_embed_fields() {
        let text = format!("I hav {}", "a".repeat(1194));
        let list = vec![correction(2, 3, Some("have"))];

        let embed = quick_fix_embed(&text, &list);
        for name in ["📝 Original", "✨ Corrected"] {
            let value = field(&embed, name).unwrap();
            assert!(value.chars().count() <= FIELD_VALUE_LIMIT, "{} too long", name);
            assert!(value.ends_with("...```"));
        }

        let mut view = GrammarView::new(&text, list, "en-US");
        match view.handle(GrammarAction::Apply) {
            GrammarUpdate::Finished(embed) => {
                let value = field(&embed, "📝 Corrected Text").unwrap();
                assert!(value.chars().count() <= FIELD_VALUE_LIMIT);
                assert!(value.starts_with("```I have aaa"));
            }
            _ => panic!("expected finished view"),
        }
    }

    #[test]
    fn test_quick_fix_messages() {
        assert_eq!(no_fixes_message("Fine."), "✅ **No fixes needed!**\n```Fine.```");
        assert_eq!(quick_fix_failed_message(&"timeout"), "❌ Quick fix failed: timeout");
    }

    #[test]
    fn test_apply_handles_multibyte_text() {
        let correction = Correction {
            message: String::new(),
            offset: 2,
            length: 4,
            replacements: vec!["café".to_string()],
            issue_type: String::new(),
            rule_category: String::new(),
            rule_id: String::new(),
        };
        assert_eq!(correction.apply("é cafe!"), "é café!");
    }

    #[test]
    fn test_view_navigation() {
        let mut view = GrammarView::new(TEXT, corrections(), "en-US");
        assert!(matches!(view.handle(GrammarAction::Previous), GrammarUpdate::Unchanged));
        assert!(matches!(view.handle(GrammarAction::Next), GrammarUpdate::Page(..)));
        assert_eq!(view.page(), 1);
        view.handle(GrammarAction::Next);
        assert!(matches!(view.handle(GrammarAction::Next), GrammarUpdate::Unchanged));
        assert_eq!(view.page(), 2);
    }

    #[test]
    fn test_view_embeds() {
        let view = GrammarView::new(TEXT, corrections(), "en-GB");
        let embed = view.initial_embed();
        assert_eq!(title(&embed), Some("📝 Grammar Check (1/3)"));
        assert_eq!(description(&embed), Some("**Issue Type:** Spelling Error"));
        assert_eq!(field(&embed, "🔍 Context"), Some("...I **__hav__** a apple pie..."));
        assert_eq!(field(&embed, "💡 Suggestions"), Some("`have`, `hive`"));
        assert!(field(&embed, "📊 Summary").unwrap().contains("English (UK)"));
    }

    #[test]
    fn test_view_apply_all() {
        let mut view = GrammarView::new(TEXT, corrections(), "en-US");
        match view.handle(GrammarAction::ApplyAll) {
            GrammarUpdate::Finished(embed) => {
                assert_eq!(description(&embed), Some("Applied 3 fixes to your text."));
                assert_eq!(field(&embed, "✨ Corrected Text"), Some("```I have an apple pie```"));
            }
            _ => panic!("expected finished view"),
        }
    }

    #[test]
    fn test_action_ids() {
        assert_eq!(GrammarAction::parse("grammar:apply_all"), Some(GrammarAction::ApplyAll));
        assert_eq!(GrammarAction::parse("grammar:zap"), None);
        assert_eq!(GrammarAction::parse(&GrammarAction::Ignore.custom_id()), Some(GrammarAction::Ignore));
    }

    #[test]
    fn test_language_name() {
        assert_eq!(language_name("de"), "German");
        assert_eq!(language_name("xx"), "xx");
        assert_eq!(LANGUAGES.len(), 11);
    }
}
