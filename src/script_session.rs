//! # Feature: Script Sessions
//!
//! Cast management for play readings: load a play or build a custom cast,
//! assign characters to members, and check who is in the session's voice
//! channel.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.2.0: Script upload, export and reusable templates
//! - 1.1.0: Voice channel roll call
//! - 1.0.0: Initial release with predefined plays

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serenity::builder::CreateEmbed;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::embeds::{BLUE, GREEN, ORANGE, PURPLE, RED};

pub const NO_DESCRIPTION: &str = "No description provided";
pub const NO_SESSION: &str = "❌ No active session! Use `?script start` or `?script load` first.";

static UNSAFE_FILE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w-]+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Play {
    pub title: String,
    pub author: String,
    pub characters: Vec<(String, String)>,
}

type PlaySeed = (&'static str, &'static str, &'static str, &'static [(&'static str, &'static str)]);

const PREDEFINED_PLAYS: &[PlaySeed] = &[
    (
        "a_woman_of_no_importance",
        "A Woman of No Importance",
        "Oscar Wilde",
        &[
            ("Mrs. Arbuthnot", "A woman with a secret past, the 'woman of no importance.'"),
            ("Gerald Arbuthnot", "Mrs. Arbuthnot's son, a young man who is offered a position as Lord Illingworth's secretary."),
            ("Lord Illingworth", "A powerful, witty, and flirtatious bachelor."),
            ("Miss Hester Worsley", "A young, puritanical American visitor."),
            ("Lady Hunstanton", "A wealthy, well-connected widow and hostess."),
            ("Mrs. Allonby", "A cynical and witty society woman."),
            ("Lady Stutfield", "A young widow."),
            ("Lady Caroline Pontefract", "A rigid and judgmental society lady."),
            ("Sir John Pontefract", "Lady Caroline's husband."),
            ("Lord Alfred Rufford", "A minor character who socializes with the others."),
            ("Mr. Kelvil, M.P.", "An earnest, but dull, member of Parliament."),
            ("The Ven. Archdeacon Daubeny, D.D.", "A member of the clergy."),
            ("Farquhar", "Lady Hunstanton's butler."),
            ("Francis", "A footman."),
            ("Alice", "A maid."),
        ],
    ),
    (
        "romeo_and_juliet",
        "Romeo and Juliet",
        "William Shakespeare",
        &[
            ("Romeo", "Young man from the house of Montague."),
            ("Juliet", "Young woman from the house of Capulet."),
            ("Mercutio", "Romeo's witty and loyal friend."),
            ("Benvolio", "Romeo's cousin and friend."),
            ("Tybalt", "Juliet's hot-headed cousin."),
            ("Nurse", "Juliet's loyal caretaker."),
            ("Friar Lawrence", "A wise Franciscan friar."),
            ("Lord Capulet", "Juliet's father."),
            ("Lady Capulet", "Juliet's mother."),
            ("Lord Montague", "Romeo's father."),
            ("Lady Montague", "Romeo's mother."),
            ("Prince Escalus", "Prince of Verona."),
        ],
    ),
    (
        "hamlet",
        "Hamlet",
        "William Shakespeare",
        &[
            ("Hamlet", "Prince of Denmark."),
            ("Claudius", "King of Denmark, Hamlet's uncle."),
            ("Gertrude", "Queen of Denmark, Hamlet's mother."),
            ("Polonius", "Lord Chamberlain."),
            ("Laertes", "Polonius's son."),
            ("Ophelia", "Polonius's daughter."),
            ("Horatio", "Hamlet's friend."),
            ("Ghost of Hamlet's Father", "The deceased king."),
            ("Rosencrantz", "Hamlet's former friend."),
            ("Guildenstern", "Hamlet's former friend."),
        ],
    ),
];

fn seed_to_play(seed: &PlaySeed) -> Play {
    let (_, title, author, characters) = seed;
    Play {
        title: title.to_string(),
        author: author.to_string(),
        characters: characters
            .iter()
            .map(|(n, d)| (n.to_string(), d.to_string()))
            .collect(),
    }
}

pub fn template_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub description: String,
    pub assigned_to: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    NoSuchCharacter(String),
    AlreadyAssigned { character: String, user_id: u64 },
    NotAssigned(String),
}

impl CastError {
    pub fn message(&self) -> String {
        match self {
            CastError::NoSuchCharacter(name) => format!("❌ Character '{}' not found in this session!", name),
            CastError::AlreadyAssigned { character, user_id } => {
                format!("❌ {} is already assigned to <@{}>!", character, user_id)
            }
            CastError::NotAssigned(name) => format!("❌ {} is not assigned to anyone!", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSession {
    pub title: String,
    pub author: String,
    pub characters: Vec<Character>,
    pub created_by: u64,
    pub created_at: DateTime<Utc>,
    pub voice_channel: Option<u64>,
}

impl ScriptSession {
    pub fn new(title: &str, author: &str, created_by: u64, voice_channel: Option<u64>) -> Self {
        ScriptSession {
            title: title.to_string(),
            author: author.to_string(),
            characters: Vec::new(),
            created_by,
            created_at: Utc::now(),
            voice_channel,
        }
    }

    pub fn from_play(play: &Play, created_by: u64, voice_channel: Option<u64>) -> Self {
        let mut session = Self::new(&play.title, &play.author, created_by, voice_channel);
        for (name, description) in &play.characters {
            session.add_character(name, description);
        }
        session
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim().to_lowercase();
        self.characters.iter().position(|c| c.name.to_lowercase() == name)
    }

    pub fn find(&self, name: &str) -> Option<&Character> {
        self.position(name).map(|i| &self.characters[i])
    }

    /// Adds a character, or resets an existing one with the same name.
    pub fn add_character(&mut self, name: &str, description: &str) {
        let character = Character {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            assigned_to: None,
        };
        match self.position(name) {
            Some(i) => self.characters[i] = character,
            None => self.characters.push(character),
        }
    }

    pub fn add_characters(&mut self, entries: &[(String, String)]) -> usize {
        for (name, description) in entries {
            self.add_character(name, description);
        }
        entries.len()
    }

    pub fn assign(&mut self, name: &str, user_id: u64) -> Result<&Character, CastError> {
        let i = self
            .position(name)
            .ok_or_else(|| CastError::NoSuchCharacter(name.to_string()))?;
        if let Some(current) = self.characters[i].assigned_to {
            return Err(CastError::AlreadyAssigned {
                character: self.characters[i].name.clone(),
                user_id: current,
            });
        }
        self.characters[i].assigned_to = Some(user_id);
        Ok(&self.characters[i])
    }

    pub fn unassign(&mut self, name: &str) -> Result<String, CastError> {
        let i = self
            .position(name)
            .ok_or_else(|| CastError::NoSuchCharacter(name.to_string()))?;
        let character = &mut self.characters[i];
        if character.assigned_to.take().is_none() {
            return Err(CastError::NotAssigned(character.name.clone()));
        }
        Ok(character.name.clone())
    }

    pub fn assigned_count(&self) -> usize {
        self.characters.iter().filter(|c| c.assigned_to.is_some()).count()
    }

    pub fn character_of(&self, user_id: u64) -> Option<&str> {
        self.characters
            .iter()
            .find(|c| c.assigned_to == Some(user_id))
            .map(|c| c.name.as_str())
    }

    pub fn can_manage(&self, user_id: u64, is_admin: bool) -> bool {
        is_admin || self.created_by == user_id
    }

    pub fn to_play(&self) -> Play {
        Play {
            title: self.title.clone(),
            author: self.author.clone(),
            characters: self
                .characters
                .iter()
                .map(|c| (c.name.clone(), c.description.clone()))
                .collect(),
        }
    }

    fn created_date(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }

    pub fn export_file_name(&self, format: ExportFormat) -> String {
        let stem = UNSAFE_FILE_CHARS.replace_all(self.title.trim(), "_");
        let stem = stem.trim_matches('_');
        let stem = if stem.is_empty() { "session" } else { stem };
        format!("{}_script.{}", stem, format.extension())
    }

    /// `name_of` resolves an assigned user id to a display name.
    pub fn export(&self, format: ExportFormat, name_of: impl Fn(u64) -> String) -> Result<String> {
        match format {
            ExportFormat::Txt => {
                let mut out = format!(
                    "# {} by {}\n# Created: {}\n# Character List:\n",
                    self.title,
                    self.author,
                    self.created_date()
                );
                for c in &self.characters {
                    let assigned = c
                        .assigned_to
                        .map(|id| format!(" (Assigned to: {})", name_of(id)))
                        .unwrap_or_default();
                    out.push_str(&format!("{} - {}{}\n", c.name, c.description, assigned));
                }
                Ok(out)
            }
            ExportFormat::Json => {
                let export = ExportedScript {
                    title: &self.title,
                    author: &self.author,
                    created_at: self.created_at.to_rfc3339(),
                    characters: self
                        .characters
                        .iter()
                        .map(|c| ExportedCharacter {
                            name: &c.name,
                            description: &c.description,
                            assigned_to: c.assigned_to.map(&name_of),
                        })
                        .collect(),
                };
                Ok(serde_json::to_string_pretty(&export)?)
            }
        }
    }
}

#[derive(Serialize)]
struct ExportedScript<'a> {
    title: &'a str,
    author: &'a str,
    created_at: String,
    characters: Vec<ExportedCharacter<'a>>,
}

#[derive(Serialize)]
struct ExportedCharacter<'a> {
    name: &'a str,
    description: &'a str,
    assigned_to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Json,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "txt" => Some(ExportFormat::Txt),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Json => "json",
        }
    }
}

/// One character per line, optionally `Name - Description`.
pub fn parse_character_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.split_once(" - ") {
            Some((name, description)) => (name.trim().to_string(), description.trim().to_string()),
            None => (line.to_string(), NO_DESCRIPTION.to_string()),
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UploadedCharacter {
    Detailed {
        name: String,
        description: Option<String>,
    },
    Plain(serde_json::Value),
}

#[derive(Deserialize)]
struct UploadedScript {
    title: Option<String>,
    author: Option<String>,
    #[serde(default)]
    characters: Vec<UploadedCharacter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptUpload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub characters: Vec<(String, String)>,
}

pub fn parse_upload(file_name: &str, content: &str) -> Result<ScriptUpload> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".json") {
        let script: UploadedScript =
            serde_json::from_str(content).map_err(|_| anyhow!("❌ Invalid JSON format! Please check your file structure."))?;
        let characters = script
            .characters
            .into_iter()
            .map(|c| match c {
                UploadedCharacter::Detailed { name, description } => {
                    (name, description.unwrap_or_else(|| NO_DESCRIPTION.to_string()))
                }
                UploadedCharacter::Plain(value) => {
                    let name = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
                    (name, NO_DESCRIPTION.to_string())
                }
            })
            .collect();
        Ok(ScriptUpload {
            title: script.title,
            author: script.author,
            characters,
        })
    } else if lower.ends_with(".txt") {
        Ok(ScriptUpload {
            title: None,
            author: None,
            characters: parse_character_lines(content),
        })
    } else {
        Err(anyhow!("❌ Please upload a `.txt` or `.json` file!"))
    }
}

/// Active sessions per guild plus the play templates.
#[derive(Clone)]
pub struct ScriptSessions {
    sessions: Arc<DashMap<u64, ScriptSession>>,
    custom_templates: Arc<DashMap<String, Play>>,
}

impl Default for ScriptSessions {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptSessions {
    pub fn new() -> Self {
        ScriptSessions {
            sessions: Arc::new(DashMap::new()),
            custom_templates: Arc::new(DashMap::new()),
        }
    }

    /// Predefined plays first, then saved templates by key.
    pub fn templates(&self) -> Vec<(String, Play)> {
        let mut list: Vec<(String, Play)> = PREDEFINED_PLAYS
            .iter()
            .map(|seed| (seed.0.to_string(), seed_to_play(seed)))
            .collect();
        let mut custom: Vec<(String, Play)> = self
            .custom_templates
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        custom.sort_by(|a, b| a.0.cmp(&b.0));
        list.extend(custom);
        list
    }

    pub fn template(&self, key: &str) -> Option<Play> {
        if let Some(custom) = self.custom_templates.get(key) {
            return Some(custom.clone());
        }
        PREDEFINED_PLAYS
            .iter()
            .find(|seed| seed.0 == key)
            .map(seed_to_play)
    }

    pub fn save_template(&self, name: &str, play: Play) -> String {
        let key = template_key(name);
        self.custom_templates.insert(key.clone(), play);
        key
    }

    pub fn is_active(&self, guild_id: u64) -> bool {
        self.sessions.contains_key(&guild_id)
    }

    /// Starts a session unless one is already running.
    pub fn start(&self, guild_id: u64, session: ScriptSession) -> bool {
        match self.sessions.entry(guild_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(session);
                true
            }
        }
    }

    /// Loading a play replaces whatever session was running.
    pub fn replace(&self, guild_id: u64, session: ScriptSession) {
        self.sessions.insert(guild_id, session);
    }

    pub fn with_session<R>(&self, guild_id: u64, f: impl FnOnce(&mut ScriptSession) -> R) -> Option<R> {
        self.sessions.get_mut(&guild_id).map(|mut s| f(&mut s))
    }

    pub fn snapshot(&self, guild_id: u64) -> Option<ScriptSession> {
        self.sessions.get(&guild_id).map(|s| s.clone())
    }

    pub fn end(&self, guild_id: u64) -> Option<ScriptSession> {
        self.sessions.remove(&guild_id).map(|(_, s)| s)
    }
}

pub fn overview_embed() -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🎭 Script Session Manager")
        .description("Manage your script/play sessions with ease!")
        .colour(PURPLE)
        .field(
            "📚 Available Commands",
            "`?script start [title]` - Start a new custom session\n\
             `?script templates` - View predefined plays\n\
             `?script load <template>` - Load a predefined play\n\
             `?script upload` - Upload custom script file\n\
             `?script addchar <name> [description]` - Add single character\n\
             `?script addmultiple <list>` - Add multiple characters\n\
             `?script assign <character> <@user>` - Assign character to user\n\
             `?script unassign <character>` - Unassign character\n\
             `?script cast` - View current character assignments\n\
             `?script vc` - Show voice channel participants\n\
             `?script export [format]` - Export session to file\n\
             `?script template <name>` - Save as reusable template\n\
             `?script info` - Show session details\n\
             `?script clear` - Clear session from memory\n\
             `?script end` - End current session",
            false,
        )
        .field(
            "🎪 Features",
            "• Upload custom script files (.txt/.json)\n\
             • Add characters individually or in bulk\n\
             • Character assignment and tracking\n\
             • Voice channel integration\n\
             • Export sessions to files\n\
             • Save custom templates\n\
             • Predefined play templates\n\
             • Real-time cast management",
            false,
        )
        .footer(|f| f.text("Perfect for theater groups and role-playing sessions!"));
    embed
}

pub fn templates_embed(templates: &[(String, Play)]) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("📚 Available Play Templates")
        .description("Choose from these predefined plays:")
        .colour(BLUE);
    for (key, play) in templates {
        embed.field(
            format!("🎭 {}", play.title),
            format!(
                "**Author:** {}\n**Characters:** {}\n**Code:** `{}`",
                play.author,
                play.characters.len(),
                key
            ),
            true,
        );
    }
    embed.field(
        "💡 How to Use",
        "Use `?script load <code>` to load a template\nExample: `?script load a_woman_of_no_importance`",
        false,
    );
    embed
}

pub fn loaded_embed(session: &ScriptSession) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🎭 Session Started!")
        .description(format!("**{}** by {}", session.title, session.author))
        .colour(GREEN)
        .field(
            "📋 Characters Available",
            format!("{} characters ready for assignment", session.characters.len()),
            true,
        )
        .field(
            "👥 Voice Channel",
            session
                .voice_channel
                .map(|id| format!("<#{}>", id))
                .unwrap_or_else(|| "Not connected".to_string()),
            true,
        )
        .field(
            "🎯 Next Steps",
            "• Use `?script cast` to see all characters\n\
             • Use `?script assign <character> <@user>` to assign roles\n\
             • Use `?script vc` to see voice channel participants",
            false,
        );
    embed
}

pub fn started_embed(title: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🎭 Custom Session Started!")
        .description(format!("**{}** session is ready!", title))
        .colour(GREEN)
        .field("📝 Add Characters", "Use `?script addchar <name> [description]` to add characters", false)
        .field("📄 Upload Script", "Use `?script upload` and attach a text file with character list", false)
        .field("📚 Or Load Template", "Use `?script load <template>` to load a predefined play", false);
    embed
}

pub fn upload_help_embed() -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("📄 Upload Custom Script")
        .description("Upload a text file with your character list!")
        .colour(BLUE)
        .field(
            "📋 File Format Options",
            "**Simple List:**\n```\nCharacter 1\nCharacter 2\nCharacter 3\n```\n\n\
             **With Descriptions:**\n```\nCharacter 1 - Description here\nCharacter 2 - Another description\n```\n\n\
             **JSON Format:**\n```json\n{\n  \"title\": \"My Play\",\n  \"author\": \"Author Name\",\n  \"characters\": [\n    {\"name\": \"Character 1\", \"description\": \"Desc 1\"}\n  ]\n}\n```",
            false,
        )
        .field(
            "📤 How to Upload",
            "Attach a `.txt` or `.json` file to your message when using this command!",
            false,
        );
    embed
}

pub fn uploaded_embed(session: &ScriptSession, added: usize) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("✅ Script Uploaded Successfully!")
        .description(format!("**{}** by {}", session.title, session.author))
        .colour(GREEN)
        .field("📊 Import Summary", format!("Added {} characters to the session", added), true)
        .field(
            "📋 Next Steps",
            "• Use `?script cast` to see all characters\n\
             • Use `?script assign <character> <@user>` to assign roles\n\
             • Use `?script vc` to check voice channel status",
            false,
        );
    embed
}

pub fn bulk_added_embed(title: &str, added: usize) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("✅ Characters Added!")
        .description(format!("Added {} characters to **{}**", added, title))
        .colour(GREEN)
        .field(
            "💡 Format Used",
            "Simple format: `Character Name`\nWith description: `Character Name - Description`",
            false,
        )
        .field(
            "📋 Next Steps",
            "Use `?script cast` to see all characters and start assigning roles!",
            false,
        );
    embed
}

pub fn character_added_embed(name: &str, description: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("✅ Character Added!")
        .description(format!("**{}** has been added to the session.", name))
        .colour(GREEN)
        .field("📝 Description", description, false);
    embed
}

/// Where a member sits relative to the session's voice channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoicePresence {
    InSession,
    Elsewhere,
    Absent,
}

pub fn voice_presence(session: &ScriptSession, user_channel: Option<u64>) -> VoicePresence {
    match (user_channel, session.voice_channel) {
        (Some(current), Some(expected)) if current == expected => VoicePresence::InSession,
        (Some(_), Some(_)) => VoicePresence::Elsewhere,
        _ => VoicePresence::Absent,
    }
}

pub fn assigned_embed(character: &Character, user_id: u64, presence: VoicePresence) -> CreateEmbed {
    let status = match presence {
        VoicePresence::InSession => "✅ User is in the session voice channel",
        VoicePresence::Elsewhere => "⚠️ User is in a different voice channel",
        VoicePresence::Absent => "❌ User not in voice channel",
    };
    let mut embed = CreateEmbed::default();
    embed
        .title("🎭 Character Assigned!")
        .description(format!("**{}** has been assigned to <@{}>", character.name, user_id))
        .colour(GREEN)
        .field("📝 Character Description", &character.description, false)
        .field("🔊 Voice Status", status, true);
    embed
}

pub fn unassigned_embed(name: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("✅ Character Unassigned!")
        .description(format!("**{}** is now available for assignment.", name))
        .colour(ORANGE);
    embed
}

/// `voice` maps user id to the voice channel they are connected to.
pub fn cast_embed(session: &ScriptSession, voice: &HashMap<u64, u64>) -> CreateEmbed {
    let mut assigned = Vec::new();
    let mut unassigned = Vec::new();
    for c in &session.characters {
        match c.assigned_to {
            Some(user_id) => {
                let icon = if voice.contains_key(&user_id) { "🔊" } else { "🔇" };
                assigned.push(format!("{} **{}** → <@{}>", icon, c.name, user_id));
            }
            None => unassigned.push(format!("• **{}**", c.name)),
        }
    }

    let mut embed = CreateEmbed::default();
    embed
        .title(format!("🎭 Cast for '{}'", session.title))
        .description(format!("Author: {}", session.author))
        .colour(PURPLE);
    if !assigned.is_empty() {
        embed.field("✅ Assigned Characters", crate::embeds::truncate(&assigned.join("\n"), crate::embeds::FIELD_VALUE_LIMIT), false);
    }
    if !unassigned.is_empty() {
        embed.field("❌ Unassigned Characters", crate::embeds::truncate(&unassigned.join("\n"), crate::embeds::FIELD_VALUE_LIMIT), false);
    }
    if session.characters.is_empty() {
        embed.field(
            "📝 No Characters",
            "Use `?script addchar` to add characters or `?script load` to load a template.",
            false,
        );
    }
    embed.field(
        "📊 Statistics",
        format!(
            "Assigned: {} | Unassigned: {} | Total: {}",
            assigned.len(),
            unassigned.len(),
            session.characters.len()
        ),
        false,
    );
    embed
}

/// Roll call for the session's voice channel; `members` are the users in it.
pub fn voice_embed(session: &ScriptSession, channel_name: &str, members: &[u64], voice: &HashMap<u64, u64>) -> CreateEmbed {
    let participants: Vec<String> = members
        .iter()
        .map(|id| match session.character_of(*id) {
            Some(character) => format!("🎭 <@{}> → **{}**", id, character),
            None => format!("👤 <@{}> → **No character assigned**", id),
        })
        .collect();

    let not_in_vc: Vec<String> = session
        .characters
        .iter()
        .filter_map(|c| {
            let user_id = c.assigned_to?;
            let in_session = voice.get(&user_id).copied() == session.voice_channel && voice.contains_key(&user_id);
            (!in_session).then(|| format!("🎭 <@{}> → **{}**", user_id, c.name))
        })
        .collect();

    let mut embed = CreateEmbed::default();
    embed
        .title(format!("🔊 Voice Channel: {}", channel_name))
        .description(format!("Session: **{}**", session.title))
        .colour(BLUE)
        .field(
            "👥 Participants",
            if participants.is_empty() {
                "No one is currently in the voice channel.".to_string()
            } else {
                participants.join("\n")
            },
            false,
        );
    if !not_in_vc.is_empty() {
        embed.field("⚠️ Assigned but not in VC", not_in_vc.join("\n"), false);
    }
    embed.field(
        "📊 Summary",
        format!(
            "In VC: {} | Assigned roles: {} | Total characters: {}",
            participants.len(),
            session.assigned_count(),
            session.characters.len()
        ),
        false,
    );
    embed
}

pub fn exported_embed(session: &ScriptSession, file_name: &str, format: ExportFormat) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("📤 Script Exported!")
        .description(format!("**{}** has been exported as `{}`", session.title, file_name))
        .colour(BLUE)
        .field(
            "📊 Export Details",
            format!(
                "Format: {}\nCharacters: {}",
                format.extension().to_uppercase(),
                session.characters.len()
            ),
            true,
        );
    embed
}

pub fn template_saved_embed(session: &ScriptSession, key: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("✅ Template Saved!")
        .description(format!("**{}** saved as template `{}`", session.title, key))
        .colour(GREEN)
        .field(
            "📋 Template Details",
            format!("Characters: {}\nCode: `{}`", session.characters.len(), key),
            true,
        )
        .field(
            "🔄 How to Use",
            format!("Use `?script load {}` to load this template in future sessions", key),
            false,
        )
        .field(
            "⚠️ Note",
            "Template is saved until the bot restarts. Export to file for permanent storage.",
            false,
        );
    embed
}

pub fn ended_embed(session: &ScriptSession) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🎭 Session Ended")
        .description(format!("**{}** session has ended.", session.title))
        .colour(RED)
        .field(
            "📊 Final Statistics",
            format!(
                "Characters assigned: {}/{}",
                session.assigned_count(),
                session.characters.len()
            ),
            true,
        )
        .field("⏱️ Duration", format!("Started: {}", session.created_date()), true)
        .field("👑 Created by", format!("<@{}>", session.created_by), true);
    embed
}

pub fn cleared_embed(session: &ScriptSession) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🧹 Session Cleared!")
        .description(format!("**{}** has been cleared from memory.", session.title))
        .colour(ORANGE)
        .field(
            "📊 Cleared Data",
            format!(
                "Characters: {}\nAssignments: {}",
                session.characters.len(),
                session.assigned_count()
            ),
            true,
        )
        .field(
            "✨ Ready for New Session",
            "You can now start a new session with `?script start` or load a template with `?script load`",
            false,
        )
        .field(
            "💡 Note",
            "All character assignments and session data have been permanently removed.",
            false,
        );
    embed
}

pub fn info_embed(session: &ScriptSession) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title(format!("📋 Session Info: {}", session.title))
        .description(format!("Author: {}", session.author))
        .colour(BLUE)
        .field("👑 Created by", format!("<@{}>", session.created_by), true)
        .field("📅 Created", session.created_date(), true)
        .field(
            "🔊 Voice Channel",
            session
                .voice_channel
                .map(|id| format!("<#{}>", id))
                .unwrap_or_else(|| "None".to_string()),
            true,
        )
        .field(
            "📊 Progress",
            format!(
                "{}/{} characters assigned",
                session.assigned_count(),
                session.characters.len()
            ),
            false,
        );
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{field, title};

    fn hamlet() -> ScriptSession {
        let sessions = ScriptSessions::new();
        ScriptSession::from_play(&sessions.template("hamlet").unwrap(), 1, Some(50))
    }

    #[test]
    fn test_predefined_templates() {
        let sessions = ScriptSessions::new();
        let templates = sessions.templates();
        assert_eq!(templates.len(), 3);
        assert_eq!(templates[0].0, "a_woman_of_no_importance");
        assert_eq!(templates[0].1.characters.len(), 15);
        assert_eq!(sessions.template("romeo_and_juliet").unwrap().characters.len(), 12);
        assert!(sessions.template("macbeth").is_none());
    }

    #[test]
    fn test_assignment_is_case_insensitive_and_exclusive() {
        let mut session = hamlet();
        assert_eq!(session.assign("ophelia", 7).unwrap().name, "Ophelia");
        assert_eq!(
            session.assign("OPHELIA", 8),
            Err(CastError::AlreadyAssigned { character: "Ophelia".to_string(), user_id: 7 })
        );
        assert_eq!(
            session.assign("Macbeth", 8),
            Err(CastError::NoSuchCharacter("Macbeth".to_string()))
        );
        assert_eq!(session.character_of(7), Some("Ophelia"));
        assert_eq!(session.unassign("ophelia").unwrap(), "Ophelia");
        assert_eq!(session.unassign("ophelia"), Err(CastError::NotAssigned("Ophelia".to_string())));
        assert!(session.assign("Ophelia", 8).is_ok());
    }

    #[test]
    fn test_add_character_replaces_same_name() {
        let mut session = ScriptSession::new("Custom", "Ann", 1, None);
        session.add_character("Narrator", "Tells the story");
        session.assign("narrator", 3).unwrap();
        session.add_character("narrator", "Reads aloud");
        assert_eq!(session.characters.len(), 1);
        assert_eq!(session.characters[0].assigned_to, None);
        assert_eq!(session.characters[0].description, "Reads aloud");
    }

    #[test]
    fn test_parse_character_lines() {
        let parsed = parse_character_lines("Alice - The lead\n\n  Bob  \nCarol - Sister - older\n");
        assert_eq!(
            parsed,
            vec![
                ("Alice".to_string(), "The lead".to_string()),
                ("Bob".to_string(), NO_DESCRIPTION.to_string()),
                ("Carol".to_string(), "Sister - older".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_json_upload() {
        let upload = parse_upload(
            "play.JSON",
            r#"{"title":"My Play","characters":[{"name":"A","description":"first"},{"name":"B"},"C"]}"#,
        )
        .unwrap();
        assert_eq!(upload.title.as_deref(), Some("My Play"));
        assert_eq!(upload.author, None);
        assert_eq!(upload.characters[1], ("B".to_string(), NO_DESCRIPTION.to_string()));
        assert_eq!(upload.characters[2].0, "C");

        assert!(parse_upload("play.json", "{not json").is_err());
        assert!(parse_upload("play.pdf", "x").is_err());
        assert_eq!(parse_upload("cast.txt", "A\nB").unwrap().characters.len(), 2);
    }

    #[test]
    fn test_export_txt() {
        let mut session = ScriptSession::new("My Play", "Ann", 1, None);
        session.add_character("A", "first");
        session.add_character("B", "second");
        session.assign("a", 9).unwrap();
        let text = session.export(ExportFormat::Txt, |id| format!("user{}", id)).unwrap();
        assert!(text.starts_with("# My Play by Ann\n# Created: "));
        assert!(text.contains("A - first (Assigned to: user9)\n"));
        assert!(text.ends_with("B - second\n"));
        assert_eq!(session.export_file_name(ExportFormat::Txt), "My_Play_script.txt");
    }

    #[test]
    fn test_export_file_name_strips_path_characters() {
        let session = ScriptSession::new("Macbeth: Act 1/2 ", "Ann", 1, None);
        assert_eq!(session.export_file_name(ExportFormat::Json), "Macbeth_Act_1_2_script.json");
        let session = ScriptSession::new("???", "Ann", 1, None);
        assert_eq!(session.export_file_name(ExportFormat::Txt), "session_script.txt");
    }

    #[test]
    fn test_export_json() {
        let mut session = ScriptSession::new("My Play", "Ann", 1, None);
        session.add_character("A", "first");
        session.assign("A", 9).unwrap();
        let raw = session.export(ExportFormat::Json, |_| "Bob".to_string()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["title"], "My Play");
        assert_eq!(value["characters"][0]["assigned_to"], "Bob");
    }

    #[test]
    fn test_sessions_store() {
        let sessions = ScriptSessions::new();
        assert!(sessions.start(1, ScriptSession::new("One", "Ann", 1, None)));
        assert!(!sessions.start(1, ScriptSession::new("Two", "Ann", 1, None)));
        sessions.with_session(1, |s| s.add_character("A", "x"));
        assert_eq!(sessions.snapshot(1).unwrap().characters.len(), 1);

        let key = sessions.save_template("My Saved Play", sessions.snapshot(1).unwrap().to_play());
        assert_eq!(key, "my_saved_play");
        assert_eq!(sessions.templates().len(), 4);
        assert_eq!(sessions.end(1).unwrap().title, "One");
        assert!(!sessions.is_active(1));
    }

    #[test]
    fn test_voice_presence() {
        let session = hamlet();
        assert_eq!(voice_presence(&session, Some(50)), VoicePresence::InSession);
        assert_eq!(voice_presence(&session, Some(51)), VoicePresence::Elsewhere);
        assert_eq!(voice_presence(&session, None), VoicePresence::Absent);
    }

    #[test]
    fn test_cast_and_voice_embeds() {
        let mut session = hamlet();
        session.assign("Hamlet", 7).unwrap();
        session.assign("Horatio", 8).unwrap();
        let voice: HashMap<u64, u64> = [(7, 50), (9, 50)].into_iter().collect();

        let cast = cast_embed(&session, &voice);
        assert_eq!(title(&cast), Some("🎭 Cast for 'Hamlet'"));
        assert!(field(&cast, "✅ Assigned Characters").unwrap().contains("🔊 **Hamlet** → <@7>"));
        assert!(field(&cast, "✅ Assigned Characters").unwrap().contains("🔇 **Horatio** → <@8>"));
        assert_eq!(
            field(&cast, "📊 Statistics"),
            Some("Assigned: 2 | Unassigned: 8 | Total: 10")
        );

        let vc = voice_embed(&session, "Stage", &[7, 9], &voice);
        let participants = field(&vc, "👥 Participants").unwrap();
        assert!(participants.contains("🎭 <@7> → **Hamlet**"));
        assert!(participants.contains("👤 <@9> → **No character assigned**"));
        assert_eq!(field(&vc, "⚠️ Assigned but not in VC"), Some("🎭 <@8> → **Horatio**"));
    }
}
