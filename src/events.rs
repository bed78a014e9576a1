//! # Feature: Events
//!
//! Server events with RSVP buttons, stored as a JSON file and announced by
//! the reminder scheduler shortly before they start.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release with RSVP tracking and reminders

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::embeds::{plural, BLUE, GREEN, ORANGE, RED};

pub const RSVP_PREFIX: &str = "event_rsvp:";
pub const MAX_DURATION_MINUTES: i64 = 1440;
pub const DEFAULT_DURATION_MINUTES: i64 = 60;
pub const LISTED_EVENTS: usize = 10;
pub const REMINDER_LEAD_SECS: i64 = 30 * 60;
const REMINDER_MENTIONS: usize = 10;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M", "%I:%M %p", "%I:%M%p", "%H.%M"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventData {
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub creator_id: u64,
    pub guild_id: u64,
    pub channel_id: u64,
    pub start_time: NaiveDateTime,
    pub duration_minutes: i64,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub participants: Vec<u64>,
    #[serde(default)]
    pub maybe_participants: Vec<u64>,
    #[serde(default)]
    pub not_attending: Vec<u64>,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub reminder_sent: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rsvp {
    Attending,
    Maybe,
    NotAttending,
}

impl Rsvp {
    pub const ALL: [Rsvp; 3] = [Rsvp::Attending, Rsvp::Maybe, Rsvp::NotAttending];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rsvp::Attending => "attending",
            Rsvp::Maybe => "maybe",
            Rsvp::NotAttending => "not_attending",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }

    fn label(&self) -> &'static str {
        match self {
            Rsvp::Attending => "✅ Attending",
            Rsvp::Maybe => "❓ Maybe",
            Rsvp::NotAttending => "❌ Not Attending",
        }
    }

    fn style(&self) -> ButtonStyle {
        match self {
            Rsvp::Attending => ButtonStyle::Success,
            Rsvp::Maybe => ButtonStyle::Secondary,
            Rsvp::NotAttending => ButtonStyle::Danger,
        }
    }

    /// Ephemeral feedback for a press; `changed` is false on a repeat.
    pub fn feedback(&self, changed: bool) -> &'static str {
        match (self, changed) {
            (Rsvp::Attending, true) => "✅ You're now marked as attending!",
            (Rsvp::Maybe, true) => "❓ You're now marked as maybe attending!",
            (Rsvp::NotAttending, true) => "❌ You're now marked as not attending!",
            (Rsvp::Attending, false) => "ℹ️ You're already marked as attending!",
            (Rsvp::Maybe, false) => "ℹ️ You're already marked as maybe attending!",
            (Rsvp::NotAttending, false) => "ℹ️ You're already marked as not attending!",
        }
    }
}

/// Splits `event_rsvp:<id>:<choice>`.
pub fn parse_rsvp_id(custom_id: &str) -> Option<(&str, Rsvp)> {
    let rest = custom_id.strip_prefix(RSVP_PREFIX)?;
    let (event_id, choice) = rest.rsplit_once(':')?;
    Some((event_id, Rsvp::from_str(choice)?))
}

impl EventData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: &str,
        description: &str,
        creator_id: u64,
        guild_id: u64,
        channel_id: u64,
        start_time: NaiveDateTime,
        duration_minutes: i64,
        now: NaiveDateTime,
    ) -> Self {
        EventData {
            event_id: generate_event_id(),
            title: title.to_string(),
            description: description.to_string(),
            creator_id,
            guild_id,
            channel_id,
            start_time,
            duration_minutes,
            created_at: now,
            participants: Vec::new(),
            maybe_participants: Vec::new(),
            not_attending: Vec::new(),
            is_cancelled: false,
            reminder_sent: false,
        }
    }

    fn list_mut(&mut self, rsvp: Rsvp) -> &mut Vec<u64> {
        match rsvp {
            Rsvp::Attending => &mut self.participants,
            Rsvp::Maybe => &mut self.maybe_participants,
            Rsvp::NotAttending => &mut self.not_attending,
        }
    }

    /// Moves the user into one list; false when they were already there.
    pub fn rsvp(&mut self, user_id: u64, choice: Rsvp) -> bool {
        for other in Rsvp::ALL.into_iter().filter(|r| *r != choice) {
            self.list_mut(other).retain(|id| *id != user_id);
        }
        let list = self.list_mut(choice);
        if list.contains(&user_id) {
            false
        } else {
            list.push(user_id);
            true
        }
    }

    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        !self.is_cancelled && self.start_time > now
    }

    pub fn needs_reminder(&self, now: NaiveDateTime) -> bool {
        self.is_upcoming(now)
            && !self.reminder_sent
            && (self.start_time - now).num_seconds() <= REMINDER_LEAD_SECS
    }
}

pub fn generate_event_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Tries each accepted date and time layout; times are UTC.
pub fn parse_datetime(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date.trim(), fmt).ok())?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time.trim(), fmt).ok())?;
    Some(date.and_time(time))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    InvalidDateTime,
    InPast,
    InvalidDuration,
}

pub fn validate(start: Option<NaiveDateTime>, duration: i64, now: NaiveDateTime) -> Result<NaiveDateTime, EventError> {
    let start = start.ok_or(EventError::InvalidDateTime)?;
    if start < now {
        return Err(EventError::InPast);
    }
    if !(1..=MAX_DURATION_MINUTES).contains(&duration) {
        return Err(EventError::InvalidDuration);
    }
    Ok(start)
}

pub fn error_embed(err: &EventError) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.colour(RED);
    match err {
        EventError::InvalidDateTime => embed
            .title("❌ Invalid Date/Time")
            .description("Please use valid date and time formats:")
            .field(
                "📅 Date Formats",
                "• `YYYY-MM-DD` (2025-12-25)\n• `MM/DD/YYYY` (12/25/2025)\n• `DD/MM/YYYY` (25/12/2025)",
                false,
            )
            .field("🕒 Time Formats", "• `HH:MM` (14:30)\n• `H:MM AM/PM` (2:30 PM)", false),
        EventError::InPast => embed
            .title("❌ Invalid Date")
            .description("Cannot create events in the past!"),
        EventError::InvalidDuration => embed
            .title("❌ Invalid Duration")
            .description("Duration must be between 1 and 1440 minutes (24 hours)."),
    };
    embed
}

fn format_start(time: &NaiveDateTime) -> String {
    time.format("%Y-%m-%d at %H:%M UTC").to_string()
}

/// "2 days 3 hours 1 minute"; `None` once the event has started.
pub fn time_remaining(until: Duration) -> Option<String> {
    if until.num_seconds() <= 0 {
        return None;
    }
    let days = until.num_days();
    let hours = until.num_hours() % 24;
    let minutes = until.num_minutes() % 60;

    let parts: Vec<String> = [(days, "day"), (hours, "hour"), (minutes, "minute")]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, unit)| plural(n, unit))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

pub fn event_embed(event: &EventData, creator_name: &str, now: NaiveDateTime) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title(format!("📅 {}", event.title))
        .description(&event.description)
        .colour(if event.is_cancelled { RED } else { BLUE })
        .field(
            "🕒 Date & Time",
            format!(
                "**Start:** {}\n**Duration:** {} minutes",
                format_start(&event.start_time),
                event.duration_minutes
            ),
            false,
        )
        .field("👤 Created by", creator_name, true)
        .field("🆔 Event ID", format!("`{}`", event.event_id), true)
        .field(
            "📊 RSVP Status",
            format!(
                "✅ **Attending:** {}\n❓ **Maybe:** {}\n❌ **Not Attending:** {}",
                event.participants.len(),
                event.maybe_participants.len(),
                event.not_attending.len()
            ),
            false,
        );

    if event.is_cancelled {
        embed.field("⚠️ Status", "**CANCELLED**", false);
    }
    if let Some(remaining) = time_remaining(event.start_time - now) {
        embed.field("⏰ Time Remaining", remaining, false);
    }
    embed.footer(|f| {
        f.text(format!(
            "Created on {}",
            event.created_at.format("%Y-%m-%d at %H:%M UTC")
        ))
    });
    embed
}

pub fn rsvp_components(event_id: &str) -> CreateComponents {
    let mut components = CreateComponents::default();
    components.create_action_row(|row| {
        for choice in Rsvp::ALL {
            row.create_button(|b| {
                b.custom_id(format!("{}{}:{}", RSVP_PREFIX, event_id, choice.as_str()))
                    .label(choice.label())
                    .style(choice.style())
            });
        }
        row
    });
    components
}

pub fn events_list_embed(events: &[EventData], now: NaiveDateTime) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    if events.is_empty() {
        embed
            .title("📅 No Upcoming Events")
            .description("No events are currently scheduled for this server.")
            .colour(BLUE)
            .field(
                "💡 Create an Event",
                "Use `?createevent` or `/createevent` to create a new event!",
                false,
            );
        return embed;
    }

    embed
        .title(format!("📅 Upcoming Events ({})", events.len()))
        .colour(BLUE);
    for event in events.iter().take(LISTED_EVENTS) {
        let until = event.start_time - now;
        let status = if until.num_days() > 0 {
            format!("In {}d {}h", until.num_days(), until.num_hours() % 24)
        } else {
            format!("In {}h {}m", until.num_hours(), until.num_minutes() % 60)
        };
        embed.field(
            format!("🎯 {}", event.title),
            format!(
                "**ID:** `{}`\n**Time:** {}\n**Status:** {}\n**Attending:** {}",
                event.event_id,
                event.start_time.format("%m/%d %H:%M"),
                status,
                event.participants.len()
            ),
            true,
        );
    }
    if events.len() > LISTED_EVENTS {
        embed.footer(|f| f.text(format!("Showing first {} of {} events", LISTED_EVENTS, events.len())));
    }
    embed
}

pub fn not_found_embed(event_id: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("❌ Event Not Found")
        .description(format!("No event found with ID `{}`", event_id))
        .colour(RED);
    embed
}

pub fn reminder_embed(event: &EventData) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("⏰ Event Reminder")
        .description(format!("**{}** is starting soon!", event.title))
        .colour(ORANGE)
        .field("🕒 Start Time", format_start(&event.start_time), true)
        .field("👥 Attending", format!("{} people", event.participants.len()), true);

    if !event.participants.is_empty() {
        let mut mentions: Vec<String> = event
            .participants
            .iter()
            .take(REMINDER_MENTIONS)
            .map(|id| format!("<@{}>", id))
            .collect();
        if event.participants.len() > REMINDER_MENTIONS {
            mentions.push(format!(
                "and {} others",
                event.participants.len() - REMINDER_MENTIONS
            ));
        }
        embed.field("📢 Reminder for", mentions.join(" "), false);
    }
    embed
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    NotFound,
    WrongGuild,
    Forbidden,
    AlreadyCancelled,
    Cancelled(String),
}

pub fn cancel_embed(outcome: &CancelOutcome, event_id: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    match outcome {
        CancelOutcome::NotFound => return not_found_embed(event_id),
        CancelOutcome::WrongGuild => embed
            .title("❌ Access Denied")
            .description("You can only cancel events from this server.")
            .colour(RED),
        CancelOutcome::Forbidden => embed
            .title("❌ Permission Denied")
            .description("Only the event creator or server administrators can cancel events.")
            .colour(RED),
        CancelOutcome::AlreadyCancelled => embed
            .title("ℹ️ Already Cancelled")
            .description("This event is already cancelled.")
            .colour(BLUE),
        CancelOutcome::Cancelled(title) => embed
            .title("✅ Event Cancelled")
            .description(format!("Event `{}` has been cancelled.", title))
            .colour(GREEN),
    };
    embed
}

/// Events keyed by id, mirrored to a pretty-printed JSON file on every change.
#[derive(Clone)]
pub struct EventStore {
    path: PathBuf,
    events: Arc<RwLock<BTreeMap<String, EventData>>>,
}

impl EventStore {
    /// Loads the file if present. A missing or unreadable file starts empty.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let events = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, EventData>>(&raw) {
                Ok(events) => {
                    info!("📅 Loaded {} events", events.len());
                    events
                }
                Err(e) => {
                    error!("❌ Error loading events: {}", e);
                    BTreeMap::new()
                }
            },
            Err(_) => {
                info!("📅 No existing events file found, starting fresh");
                BTreeMap::new()
            }
        };

        EventStore {
            path,
            events: Arc::new(RwLock::new(events)),
        }
    }

    async fn persist(&self, events: &BTreeMap<String, EventData>) -> Result<()> {
        let raw = serde_json::to_string_pretty(events)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    pub async fn create(&self, event: EventData) -> Result<()> {
        let mut events = self.events.write().await;
        info!("📅 Event created: {} - {}", event.event_id, event.title);
        events.insert(event.event_id.clone(), event);
        self.persist(&events).await
    }

    pub async fn get(&self, event_id: &str) -> Option<EventData> {
        self.events.read().await.get(event_id).cloned()
    }

    /// Applies an RSVP and returns whether it changed, plus the updated event.
    pub async fn rsvp(&self, event_id: &str, user_id: u64, choice: Rsvp) -> Result<Option<(bool, EventData)>> {
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(event_id) else {
            return Ok(None);
        };
        let changed = event.rsvp(user_id, choice);
        let snapshot = event.clone();
        if changed {
            self.persist(&events).await?;
        }
        Ok(Some((changed, snapshot)))
    }

    /// Upcoming, non-cancelled events for a guild, soonest first.
    pub async fn upcoming(&self, guild_id: u64, now: NaiveDateTime) -> Vec<EventData> {
        let mut list: Vec<EventData> = self
            .events
            .read()
            .await
            .values()
            .filter(|e| e.guild_id == guild_id && e.is_upcoming(now))
            .cloned()
            .collect();
        list.sort_by_key(|e| e.start_time);
        list
    }

    pub async fn cancel(&self, event_id: &str, guild_id: u64, user_id: u64, is_admin: bool) -> Result<CancelOutcome> {
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(event_id) else {
            return Ok(CancelOutcome::NotFound);
        };
        if event.guild_id != guild_id {
            return Ok(CancelOutcome::WrongGuild);
        }
        if event.creator_id != user_id && !is_admin {
            return Ok(CancelOutcome::Forbidden);
        }
        if event.is_cancelled {
            return Ok(CancelOutcome::AlreadyCancelled);
        }
        event.is_cancelled = true;
        let title = event.title.clone();
        self.persist(&events).await?;
        info!("📅 Event cancelled: {} by {}", event_id, user_id);
        Ok(CancelOutcome::Cancelled(title))
    }

    /// Marks every event inside the reminder window as reminded and returns them.
    pub async fn take_due_reminders(&self, now: NaiveDateTime) -> Vec<EventData> {
        let mut events = self.events.write().await;
        let due: Vec<EventData> = events
            .values_mut()
            .filter(|e| e.needs_reminder(now))
            .map(|e| {
                e.reminder_sent = true;
                e.clone()
            })
            .collect();
        if !due.is_empty() {
            if let Err(e) = self.persist(&events).await {
                warn!("⚠️ Failed to save events after reminders: {}", e);
            }
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{field, footer, title};

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn sample(now: NaiveDateTime, start: NaiveDateTime) -> EventData {
        EventData::new("Game Night", "Bring snacks", 1, 100, 200, start, 60, now)
    }

    #[test]
    fn test_parse_every_date_format() {
        let expected = at("2025-12-25 14:30");
        for date in ["2025-12-25", "12/25/2025", "25/12/2025", "12-25-2025", "25-12-2025"] {
            assert_eq!(parse_datetime(date, "14:30"), Some(expected), "{}", date);
        }
    }

    #[test]
    fn test_parse_every_time_format() {
        let expected = at("2025-12-25 14:30");
        for time in ["14:30", "2:30 PM", "2:30PM", "14.30"] {
            assert_eq!(parse_datetime("2025-12-25", time), Some(expected), "{}", time);
        }
        assert_eq!(parse_datetime("2025-13-45", "14:30"), None);
        assert_eq!(parse_datetime("2025-12-25", "noon"), None);
    }

    #[test]
    fn test_month_first_wins_when_ambiguous() {
        assert_eq!(parse_datetime("03/04/2026", "09:00"), Some(at("2026-03-04 09:00")));
    }

    #[test]
    fn test_validate() {
        let now = at("2025-01-01 12:00");
        assert_eq!(validate(None, 60, now), Err(EventError::InvalidDateTime));
        assert_eq!(validate(Some(at("2024-12-31 12:00")), 60, now), Err(EventError::InPast));
        assert_eq!(validate(Some(at("2025-02-01 12:00")), 0, now), Err(EventError::InvalidDuration));
        assert_eq!(validate(Some(at("2025-02-01 12:00")), 1441, now), Err(EventError::InvalidDuration));
        assert!(validate(Some(at("2025-02-01 12:00")), 1440, now).is_ok());
    }

    #[test]
    fn test_rsvp_lists_stay_disjoint() {
        let now = at("2025-01-01 12:00");
        let mut event = sample(now, at("2025-01-02 12:00"));

        assert!(event.rsvp(7, Rsvp::Attending));
        assert!(!event.rsvp(7, Rsvp::Attending));
        assert!(event.rsvp(7, Rsvp::Maybe));
        assert!(event.participants.is_empty());
        assert_eq!(event.maybe_participants, vec![7]);
        assert!(event.rsvp(7, Rsvp::NotAttending));
        assert!(event.maybe_participants.is_empty());
        assert_eq!(event.not_attending, vec![7]);
    }

    #[test]
    fn test_rsvp_custom_id() {
        assert_eq!(parse_rsvp_id("event_rsvp:ab12cd34:maybe"), Some(("ab12cd34", Rsvp::Maybe)));
        assert_eq!(
            parse_rsvp_id("event_rsvp:ab12cd34:not_attending"),
            Some(("ab12cd34", Rsvp::NotAttending))
        );
        assert_eq!(parse_rsvp_id("event_rsvp:ab12cd34:later"), None);
        assert_eq!(parse_rsvp_id("ttt:1"), None);
    }

    #[test]
    fn test_event_id_shape() {
        let id = generate_event_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_time_remaining() {
        assert_eq!(
            time_remaining(Duration::minutes(2 * 1440 + 61)).as_deref(),
            Some("2 days 1 hour 1 minute")
        );
        assert_eq!(time_remaining(Duration::minutes(45)).as_deref(), Some("45 minutes"));
        assert_eq!(time_remaining(Duration::seconds(-5)), None);
    }

    #[test]
    fn test_needs_reminder_window() {
        let now = at("2025-01-01 12:00");
        let mut event = sample(now, at("2025-01-01 12:25"));
        assert!(event.needs_reminder(now));
        event.reminder_sent = true;
        assert!(!event.needs_reminder(now));

        let later = sample(now, at("2025-01-01 13:00"));
        assert!(!later.needs_reminder(now));

        let mut cancelled = sample(now, at("2025-01-01 12:10"));
        cancelled.is_cancelled = true;
        assert!(!cancelled.needs_reminder(now));
    }

    #[test]
    fn test_event_embed() {
        let now = at("2025-01-01 12:00");
        let mut event = sample(now, at("2025-01-02 13:30"));
        event.rsvp(5, Rsvp::Attending);
        let embed = event_embed(&event, "Ann", now);
        assert_eq!(title(&embed), Some("📅 Game Night"));
        assert_eq!(
            field(&embed, "🕒 Date & Time"),
            Some("**Start:** 2025-01-02 at 13:30 UTC\n**Duration:** 60 minutes")
        );
        assert!(field(&embed, "📊 RSVP Status").unwrap().starts_with("✅ **Attending:** 1"));
        assert_eq!(field(&embed, "⏰ Time Remaining"), Some("1 day 1 hour 30 minutes"));
        assert_eq!(footer(&embed), Some("Created on 2025-01-01 at 12:00 UTC"));
    }

    #[test]
    fn test_reminder_embed_caps_mentions() {
        let now = at("2025-01-01 12:00");
        let mut event = sample(now, at("2025-01-01 12:20"));
        for id in 1..=12 {
            event.rsvp(id, Rsvp::Attending);
        }
        let embed = reminder_embed(&event);
        let mentions = field(&embed, "📢 Reminder for").unwrap();
        assert!(mentions.contains("<@10>"));
        assert!(!mentions.contains("<@11>"));
        assert!(mentions.ends_with("and 2 others"));
    }

    #[tokio::test]
    async fn test_store_roundtrips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let now = at("2025-01-01 12:00");

        let store = EventStore::load(&path).await;
        let event = sample(now, at("2025-01-01 12:20"));
        let id = event.event_id.clone();
        store.create(event).await.unwrap();
        let (changed, _) = store.rsvp(&id, 9, Rsvp::Attending).await.unwrap().unwrap();
        assert!(changed);

        let reloaded = EventStore::load(&path).await;
        let event = reloaded.get(&id).await.unwrap();
        assert_eq!(event.participants, vec![9]);
        assert_eq!(event.start_time, at("2025-01-01 12:20"));

        assert_eq!(reloaded.take_due_reminders(now).await.len(), 1);
        assert!(reloaded.take_due_reminders(now).await.is_empty());
    }

    #[tokio::test]
    async fn test_store_cancel_rules() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::load(dir.path().join("events.json")).await;
        let now = at("2025-01-01 12:00");
        let event = sample(now, at("2025-01-03 12:00"));
        let id = event.event_id.clone();
        store.create(event).await.unwrap();

        assert_eq!(store.cancel("nope", 100, 1, false).await.unwrap(), CancelOutcome::NotFound);
        assert_eq!(store.cancel(&id, 999, 1, false).await.unwrap(), CancelOutcome::WrongGuild);
        assert_eq!(store.cancel(&id, 100, 2, false).await.unwrap(), CancelOutcome::Forbidden);
        assert_eq!(
            store.cancel(&id, 100, 2, true).await.unwrap(),
            CancelOutcome::Cancelled("Game Night".to_string())
        );
        assert_eq!(store.cancel(&id, 100, 1, false).await.unwrap(), CancelOutcome::AlreadyCancelled);
        assert!(store.upcoming(100, now).await.is_empty());
    }

    #[tokio::test]
    async fn test_upcoming_sorted_by_start() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::load(dir.path().join("events.json")).await;
        let now = at("2025-01-01 12:00");
        store.create(sample(now, at("2025-01-05 12:00"))).await.unwrap();
        store.create(sample(now, at("2025-01-02 12:00"))).await.unwrap();
        store.create(sample(now, at("2024-12-30 12:00"))).await.unwrap();

        let upcoming = store.upcoming(100, now).await;
        assert_eq!(upcoming.len(), 2);
        assert!(upcoming[0].start_time < upcoming[1].start_time);
        assert!(store.upcoming(101, now).await.is_empty());
    }
}
