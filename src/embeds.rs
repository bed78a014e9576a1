//! Shared embed palette and small formatting helpers.

use serenity::utils::Colour;

pub const GREEN: Colour = Colour(0x2ecc71);
pub const RED: Colour = Colour(0xe74c3c);
pub const DARK_RED: Colour = Colour(0x992d22);
pub const ORANGE: Colour = Colour(0xe67e22);
pub const GOLD: Colour = Colour(0xf1c40f);
pub const BLUE: Colour = Colour(0x3498db);
pub const PURPLE: Colour = Colour(0x9b59b6);
pub const BLURPLE: Colour = Colour(0x5865f2);
pub const YELLOW: Colour = Colour(0xfee75c);

/// Discord rejects field values over 1024 characters.
pub const FIELD_VALUE_LIMIT: usize = 1024;

/// Cuts `text` to at most `max` chars, ending in `...` when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serenity::builder::CreateEmbed;

    pub fn title(embed: &CreateEmbed) -> Option<&str> {
        embed.0.get("title").and_then(|v| v.as_str())
    }

    pub fn description(embed: &CreateEmbed) -> Option<&str> {
        embed.0.get("description").and_then(|v| v.as_str())
    }

    pub fn footer(embed: &CreateEmbed) -> Option<&str> {
        embed.0.get("footer").and_then(|f| f.get("text")).and_then(|v| v.as_str())
    }

    pub fn colour(embed: &CreateEmbed) -> Option<u64> {
        embed.0.get("color").and_then(|v| v.as_u64())
    }

    pub fn field<'a>(embed: &'a CreateEmbed, name: &str) -> Option<&'a str> {
        embed
            .0
            .get("fields")
            .and_then(|f| f.as_array())?
            .iter()
            .find(|f| f.get("name").and_then(|n| n.as_str()) == Some(name))
            .and_then(|f| f.get("value"))
            .and_then(|v| v.as_str())
    }

    pub fn field_names(embed: &CreateEmbed) -> Vec<String> {
        embed
            .0
            .get("fields")
            .and_then(|f| f.as_array())
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|f| f.get("name").and_then(|n| n.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "day"), "1 day");
        assert_eq!(plural(3, "hour"), "3 hours");
        assert_eq!(plural(0, "minute"), "0 minutes");
    }
}
