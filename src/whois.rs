//! User profile card with paged role list.

use chrono::{DateTime, Utc};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use serenity::model::Timestamp;
use std::time::Duration;

use crate::embeds::BLURPLE;
use crate::views::{Expiring, ViewTimeout};

pub const PREV_ID: &str = "whois:prev";
pub const NEXT_ID: &str = "whois:next";
pub const VIEW_TIMEOUT: Duration = Duration::from_secs(60);
pub const ROLES_PER_PAGE: usize = 10;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Everything the card shows, gathered from the member and its user.
#[derive(Debug, Clone)]
pub struct WhoisProfile {
    pub user_id: u64,
    pub name: String,
    pub tag: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub joined_at: Option<DateTime<Utc>>,
    pub bot: bool,
    pub system: bool,
    /// Role mentions, `@everyone` excluded.
    pub roles: Vec<String>,
    pub activity: Option<String>,
    pub status: Option<String>,
}

impl WhoisProfile {
    pub fn role_pages(&self) -> Vec<Vec<String>> {
        if self.roles.is_empty() {
            return vec![vec!["None".to_string()]];
        }
        self.roles.chunks(ROLES_PER_PAGE).map(|c| c.to_vec()).collect()
    }

    pub fn embed(&self, page: usize) -> CreateEmbed {
        let pages = self.role_pages();
        let page = page.min(pages.len() - 1);

        let mut embed = CreateEmbed::default();
        embed
            .title(format!("🔍 Who is {}?", self.name))
            .description(format!("Information about <@{}>", self.user_id))
            .colour(BLURPLE)
            .timestamp(Timestamp::now())
            .thumbnail(&self.avatar_url)
            .footer(|f| f.text(format!("Page {}/{}", page + 1, pages.len())))
            .field("🧾 Username", &self.tag, true)
            .field("🆔 User ID", self.user_id, true)
            .field("📅 Account Created", self.created_at.format(DATE_FORMAT), false)
            .field(
                "📥 Joined Server",
                self.joined_at
                    .map(|t| t.format(DATE_FORMAT).to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
                false,
            )
            .field("🎭 Bot?", if self.bot { "Yes 🤖" } else { "No" }, true)
            .field("🛡️ System User?", if self.system { "Yes" } else { "No" }, true)
            .field("📛 Roles", pages[page].join("\n"), false);

        if let Some(activity) = &self.activity {
            embed.field("🎮 Activity", activity, false);
        }
        if let Some(status) = &self.status {
            embed.field("📶 Status", crate::games::capitalize(status), true);
        }
        embed
    }
}

pub struct WhoisView {
    pub profile: WhoisProfile,
    pub page: usize,
}

impl WhoisView {
    pub fn new(profile: WhoisProfile) -> Self {
        WhoisView { profile, page: 0 }
    }

    pub fn page_count(&self) -> usize {
        self.profile.role_pages().len()
    }

    /// Moves one page for a button id; out-of-range presses are ignored.
    pub fn turn(&mut self, custom_id: &str) -> bool {
        match custom_id {
            PREV_ID if self.page > 0 => self.page -= 1,
            NEXT_ID if self.page + 1 < self.page_count() => self.page += 1,
            _ => return false,
        }
        true
    }

    pub fn embed(&self) -> CreateEmbed {
        self.profile.embed(self.page)
    }

    pub fn components(&self, disabled: bool) -> CreateComponents {
        let last = self.page_count() - 1;
        let mut components = CreateComponents::default();
        components.create_action_row(|row| {
            row.create_button(|b| {
                b.custom_id(PREV_ID)
                    .label("◀️")
                    .style(ButtonStyle::Secondary)
                    .disabled(disabled || self.page == 0)
            })
            .create_button(|b| {
                b.custom_id(NEXT_ID)
                    .label("▶️")
                    .style(ButtonStyle::Secondary)
                    .disabled(disabled || self.page == last)
            })
        });
        components
    }
}

impl Expiring for WhoisView {
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
    use crate::embeds::test_support::{field, footer, title};

    fn profile(roles: usize) -> WhoisProfile {
        WhoisProfile {
            user_id: 42,
            name: "ann".to_string(),
            tag: "ann#0001".to_string(),
            avatar_url: "https://cdn.discordapp.com/embed/avatars/0.png".to_string(),
            created_at: DateTime::parse_from_rfc3339("2020-01-02T03:04:05Z").unwrap().with_timezone(&Utc),
            joined_at: None,
            bot: false,
            system: false,
            roles: (0..roles).map(|i| format!("<@&{}>", i)).collect(),
            activity: None,
            status: Some("online".to_string()),
        }
    }

    #[test]
    fn test_role_pages() {
        assert_eq!(profile(0).role_pages(), vec![vec!["None".to_string()]]);
        assert_eq!(profile(10).role_pages().len(), 1);
        let pages = profile(23).role_pages();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].len(), 3);
    }

    #[test]
    fn test_embed_fields() {
        let embed = profile(12).embed(1);
        assert_eq!(title(&embed), Some("🔍 Who is ann?"));
        assert_eq!(footer(&embed), Some("Page 2/2"));
        assert_eq!(field(&embed, "📅 Account Created"), Some("2020-01-02 03:04:05"));
        assert_eq!(field(&embed, "📥 Joined Server"), Some("N/A"));
        assert_eq!(field(&embed, "📛 Roles"), Some("<@&10>\n<@&11>"));
        assert_eq!(field(&embed, "📶 Status"), Some("Online"));
    }

    #[test]
    fn test_turn_stays_in_range() {
        let mut view = WhoisView::new(profile(25));
        assert!(!view.turn(PREV_ID));
        assert!(view.turn(NEXT_ID));
        assert!(view.turn(NEXT_ID));
        assert!(!view.turn(NEXT_ID));
        assert_eq!(view.page, 2);
        assert!(view.turn(PREV_ID));
        assert_eq!(view.page, 1);
    }

    #[test]
    fn test_buttons_disabled_at_ends() {
        let view = WhoisView::new(profile(3));
        let rendered = serde_json::to_value(&view.components(false).0).unwrap();
        let buttons = rendered[0]["components"].as_array().unwrap();
        assert_eq!(buttons[0]["disabled"], true);
        assert_eq!(buttons[1]["disabled"], true);

        let view = WhoisView::new(profile(15));
        let rendered = serde_json::to_value(&view.components(false).0).unwrap();
        assert_eq!(rendered[0]["components"][1]["disabled"], false);
    }
}
