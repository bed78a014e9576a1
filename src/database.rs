use anyhow::Result;
use dashmap::DashMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlite::{Connection, State};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub prefix: String,
    pub welcome_channel_id: Option<String>,
    pub mod_log_channel_id: Option<String>,
    pub auto_role_id: Option<String>,
    pub custom_settings: Value,
}

impl Default for GuildSettings {
    fn default() -> Self {
        GuildSettings {
            prefix: "?".to_string(),
            welcome_channel_id: None,
            mod_log_channel_id: None,
            auto_role_id: None,
            custom_settings: Value::Object(Default::default()),
        }
    }
}

impl GuildSettings {
    /// Feature ids switched off through `custom_settings.disabled_features`.
    pub fn disabled_features(&self) -> Vec<String> {
        self.custom_settings
            .get("disabled_features")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_feature_enabled(&self, feature_id: &str) -> bool {
        !self.disabled_features().iter().any(|f| f == feature_id)
    }

    /// Flips a feature and returns whether it is now enabled.
    pub fn toggle_feature(&mut self, feature_id: &str) -> bool {
        let mut disabled = self.disabled_features();
        let now_enabled = if let Some(pos) = disabled.iter().position(|f| f == feature_id) {
            disabled.remove(pos);
            true
        } else {
            disabled.push(feature_id.to_string());
            false
        };

        if !self.custom_settings.is_object() {
            self.custom_settings = Value::Object(Default::default());
        }
        if let Value::Object(map) = &mut self.custom_settings {
            map.insert(
                "disabled_features".to_string(),
                Value::Array(disabled.into_iter().map(Value::String).collect()),
            );
        }
        now_enabled
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub wins: i64,
    pub losses: i64,
    pub total_games: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub stats: GameStats,
}

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
    guild_cache: Arc<DashMap<String, GuildSettings>>,
    user_cache: Arc<DashMap<String, Option<String>>>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        let connection = sqlite::open(database_path)?;
        let db = Database {
            connection: Arc::new(Mutex::new(connection)),
            guild_cache: Arc::new(DashMap::new()),
            user_cache: Arc::new(DashMap::new()),
        };

        db.init_tables().await?;
        info!("Database initialized at: {}", database_path);
        Ok(db)
    }

    async fn init_tables(&self) -> Result<()> {
        let conn = self.connection.lock().await;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                guild_id TEXT NOT NULL,
                username TEXT,
                data_type TEXT NOT NULL,
                data_value TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_user_data
             ON user_data(user_id, guild_id, data_type)",
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS guild_settings (
                guild_id TEXT PRIMARY KEY,
                prefix TEXT DEFAULT '?',
                welcome_channel_id TEXT,
                mod_log_channel_id TEXT,
                auto_role_id TEXT,
                settings_json TEXT,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS game_stats (
                user_id TEXT NOT NULL,
                guild_id TEXT NOT NULL,
                game_type TEXT NOT NULL,
                wins INTEGER DEFAULT 0,
                losses INTEGER DEFAULT 0,
                total_games INTEGER DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (user_id, guild_id, game_type)
            )",
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_game_leaderboard
             ON game_stats(guild_id, game_type, wins)",
        )?;

        Ok(())
    }

    // Guild Settings Methods
    pub async fn get_guild_settings(&self, guild_id: &str) -> Result<GuildSettings> {
        if let Some(cached) = self.guild_cache.get(guild_id) {
            return Ok(cached.clone());
        }

        let found = {
            let conn = self.connection.lock().await;
            let mut statement = conn.prepare(
                "SELECT prefix, welcome_channel_id, mod_log_channel_id, auto_role_id, settings_json
                 FROM guild_settings WHERE guild_id = ?",
            )?;
            statement.bind((1, guild_id))?;

            if let Ok(State::Row) = statement.next() {
                let settings_json = statement.read::<Option<String>, _>(4)?;
                Some(GuildSettings {
                    prefix: statement
                        .read::<Option<String>, _>(0)?
                        .unwrap_or_else(|| "?".to_string()),
                    welcome_channel_id: statement.read::<Option<String>, _>(1)?,
                    mod_log_channel_id: statement.read::<Option<String>, _>(2)?,
                    auto_role_id: statement.read::<Option<String>, _>(3)?,
                    custom_settings: serde_json::from_str(settings_json.as_deref().unwrap_or("{}"))?,
                })
            } else {
                None
            }
        };

        let settings = match found {
            Some(settings) => settings,
            None => {
                let defaults = GuildSettings::default();
                self.set_guild_settings(guild_id, &defaults).await?;
                defaults
            }
        };

        self.guild_cache.insert(guild_id.to_string(), settings.clone());
        Ok(settings)
    }

    pub async fn set_guild_settings(&self, guild_id: &str, settings: &GuildSettings) -> Result<()> {
        let settings_json = serde_json::to_string(&settings.custom_settings)?;
        {
            let conn = self.connection.lock().await;
            let mut statement = conn.prepare(
                "INSERT OR REPLACE INTO guild_settings
                 (guild_id, prefix, welcome_channel_id, mod_log_channel_id, auto_role_id, settings_json, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)",
            )?;
            statement.bind((1, guild_id))?;
            statement.bind((2, settings.prefix.as_str()))?;
            statement.bind((3, settings.welcome_channel_id.as_deref()))?;
            statement.bind((4, settings.mod_log_channel_id.as_deref()))?;
            statement.bind((5, settings.auto_role_id.as_deref()))?;
            statement.bind((6, settings_json.as_str()))?;
            statement.next()?;
        }

        self.guild_cache.insert(guild_id.to_string(), settings.clone());
        info!("Updated guild settings for {}", guild_id);
        Ok(())
    }

    pub fn clear_guild_cache(&self, guild_id: Option<&str>) {
        match guild_id {
            Some(id) => {
                self.guild_cache.remove(id);
            }
            None => self.guild_cache.clear(),
        }
        debug!("Guild settings cache cleared");
    }

    // User Data Methods
    pub async fn get_user_data(&self, user_id: &str, guild_id: &str, data_type: &str) -> Result<Option<String>> {
        let cache_key = format!("{}:{}:{}", user_id, guild_id, data_type);
        if let Some(cached) = self.user_cache.get(&cache_key) {
            return Ok(cached.clone());
        }

        let value = {
            let conn = self.connection.lock().await;
            let mut statement = conn.prepare(
                "SELECT data_value FROM user_data
                 WHERE user_id = ? AND guild_id = ? AND data_type = ?
                 ORDER BY id DESC LIMIT 1",
            )?;
            statement.bind((1, user_id))?;
            statement.bind((2, guild_id))?;
            statement.bind((3, data_type))?;

            if let Ok(State::Row) = statement.next() {
                statement.read::<Option<String>, _>(0)?
            } else {
                None
            }
        };

        self.user_cache.insert(cache_key, value.clone());
        Ok(value)
    }

    pub async fn set_user_data(
        &self,
        user_id: &str,
        guild_id: &str,
        username: &str,
        data_type: &str,
        data_value: &str,
    ) -> Result<()> {
        {
            let conn = self.connection.lock().await;
            let mut statement = conn.prepare(
                "INSERT INTO user_data (user_id, guild_id, username, data_type, data_value)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            statement.bind((1, user_id))?;
            statement.bind((2, guild_id))?;
            statement.bind((3, username))?;
            statement.bind((4, data_type))?;
            statement.bind((5, data_value))?;
            statement.next()?;
        }

        self.user_cache.insert(
            format!("{}:{}:{}", user_id, guild_id, data_type),
            Some(data_value.to_string()),
        );
        Ok(())
    }

    pub fn clear_user_cache(&self, user_id: Option<&str>, guild_id: Option<&str>) {
        match (user_id, guild_id) {
            (Some(user), Some(guild)) => {
                let prefix = format!("{}:{}:", user, guild);
                self.user_cache.retain(|key, _| !key.starts_with(&prefix));
            }
            _ => self.user_cache.clear(),
        }
        debug!("User data cache cleared");
    }

    // Game Statistics Methods
    pub async fn get_game_stats(&self, user_id: &str, guild_id: &str, game_type: &str) -> Result<GameStats> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "SELECT wins, losses, total_games FROM game_stats
             WHERE user_id = ? AND guild_id = ? AND game_type = ?",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, guild_id))?;
        statement.bind((3, game_type))?;

        if let Ok(State::Row) = statement.next() {
            Ok(GameStats {
                wins: statement.read::<i64, _>(0)?,
                losses: statement.read::<i64, _>(1)?,
                total_games: statement.read::<i64, _>(2)?,
            })
        } else {
            Ok(GameStats::default())
        }
    }

    pub async fn update_game_stats(&self, user_id: &str, guild_id: &str, game_type: &str, won: bool) -> Result<GameStats> {
        let mut stats = self.get_game_stats(user_id, guild_id, game_type).await?;
        stats.total_games += 1;
        if won {
            stats.wins += 1;
        } else {
            stats.losses += 1;
        }

        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "INSERT OR REPLACE INTO game_stats
             (user_id, guild_id, game_type, wins, losses, total_games, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)",
        )?;
        statement.bind((1, user_id))?;
        statement.bind((2, guild_id))?;
        statement.bind((3, game_type))?;
        statement.bind((4, stats.wins))?;
        statement.bind((5, stats.losses))?;
        statement.bind((6, stats.total_games))?;
        statement.next()?;

        debug!("🎮 {} stats for {}: {:?}", game_type, user_id, stats);
        Ok(stats)
    }

    pub async fn get_leaderboard(&self, guild_id: &str, game_type: &str, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let conn = self.connection.lock().await;
        let mut statement = conn.prepare(
            "SELECT user_id, wins, losses, total_games
             FROM game_stats
             WHERE guild_id = ? AND game_type = ?
             ORDER BY wins DESC, total_games DESC
             LIMIT ?",
        )?;
        statement.bind((1, guild_id))?;
        statement.bind((2, game_type))?;
        statement.bind((3, limit))?;

        let mut entries = Vec::new();
        while let Ok(State::Row) = statement.next() {
            entries.push(LeaderboardEntry {
                user_id: statement.read::<String, _>(0)?,
                stats: GameStats {
                    wins: statement.read::<i64, _>(1)?,
                    losses: statement.read::<i64, _>(2)?,
                    total_games: statement.read::<i64, _>(3)?,
                },
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_db() -> (Database, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn test_guild_settings_defaults_are_inserted() {
        let (db, _dir) = test_db().await;

        let settings = db.get_guild_settings("guild1").await.unwrap();
        assert_eq!(settings, GuildSettings::default());

        db.clear_guild_cache(None);
        let reloaded = db.get_guild_settings("guild1").await.unwrap();
        assert_eq!(reloaded.prefix, "?");
    }

    #[tokio::test]
    async fn test_guild_settings_round_trip_through_disk() {
        let (db, _dir) = test_db().await;

        let mut settings = GuildSettings::default();
        settings.welcome_channel_id = Some("123".to_string());
        assert!(!settings.toggle_feature("games"));
        db.set_guild_settings("guild1", &settings).await.unwrap();

        db.clear_guild_cache(Some("guild1"));
        let reloaded = db.get_guild_settings("guild1").await.unwrap();
        assert_eq!(reloaded.welcome_channel_id.as_deref(), Some("123"));
        assert!(!reloaded.is_feature_enabled("games"));
        assert!(reloaded.is_feature_enabled("social"));
    }

    #[test]
    fn test_toggle_feature_twice_restores() {
        let mut settings = GuildSettings::default();
        assert!(!settings.toggle_feature("trivia"));
        assert!(settings.toggle_feature("trivia"));
        assert!(settings.disabled_features().is_empty());
    }

    #[tokio::test]
    async fn test_user_data_latest_wins() {
        let (db, _dir) = test_db().await;

        assert_eq!(db.get_user_data("u1", "g1", "note").await.unwrap(), None);
        db.set_user_data("u1", "g1", "alice", "note", "first").await.unwrap();
        db.set_user_data("u1", "g1", "alice", "note", "second").await.unwrap();

        db.clear_user_cache(Some("u1"), Some("g1"));
        assert_eq!(
            db.get_user_data("u1", "g1", "note").await.unwrap().as_deref(),
            Some("second")
        );
    }

    #[tokio::test]
    async fn test_game_stats_and_leaderboard() {
        let (db, _dir) = test_db().await;

        db.update_game_stats("a", "g", "tictactoe", true).await.unwrap();
        db.update_game_stats("a", "g", "tictactoe", false).await.unwrap();
        db.update_game_stats("b", "g", "tictactoe", true).await.unwrap();
        db.update_game_stats("b", "g", "tictactoe", true).await.unwrap();
        db.update_game_stats("c", "g", "hangman", true).await.unwrap();

        let a = db.get_game_stats("a", "g", "tictactoe").await.unwrap();
        assert_eq!(a, GameStats { wins: 1, losses: 1, total_games: 2 });

        let board = db.get_leaderboard("g", "tictactoe", 10).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "b");
        assert_eq!(board[0].stats.wins, 2);
        assert_eq!(board[1].user_id, "a");
    }
}
