//! Role and ownership checks shared by the gated cogs.

use anyhow::Result;
use serenity::model::id::{GuildId, UserId};
use serenity::prelude::Context;

/// Roles that unlock the fun/social commands.
pub const PERMITTED_ROLES: &[&str] = &["Staff", "Admin", "FunnyCommands", "Parliamentarian"];

/// Roles that unlock moderation commands.
pub const MODERATOR_ROLES: &[&str] = &["Admin", "Staff", "Parliamentarian"];

/// What the bot knows about a member when deciding access.
#[derive(Debug, Clone, Default)]
pub struct MemberAccess {
    pub is_admin: bool,
    pub role_names: Vec<String>,
}

impl MemberAccess {
    /// Looks up the member's roles over HTTP; the guild owner counts as admin.
    pub async fn resolve(ctx: &Context, guild_id: GuildId, user_id: UserId) -> Result<Self> {
        let member = guild_id.member(ctx, user_id).await?;
        let roles = guild_id.roles(&ctx.http).await?;
        let owner_id = ctx.cache.guild(guild_id).map(|g| g.owner_id);

        let mut access = MemberAccess {
            is_admin: owner_id == Some(user_id),
            role_names: Vec::with_capacity(member.roles.len()),
        };

        for role_id in &member.roles {
            if let Some(role) = roles.get(role_id) {
                access.is_admin |= role.permissions.administrator();
                access.role_names.push(role.name.clone());
            }
        }

        Ok(access)
    }

    pub fn has_any_role(&self, names: &[&str]) -> bool {
        self.role_names.iter().any(|r| names.contains(&r.as_str()))
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.role_names.iter().any(|r| r == name)
    }

    /// Administrator, or one of [`PERMITTED_ROLES`].
    pub fn has_permission(&self) -> bool {
        self.is_admin || self.has_any_role(PERMITTED_ROLES)
    }

    pub fn is_moderator(&self) -> bool {
        self.has_any_role(MODERATOR_ROLES)
    }
}

pub fn is_owner(user_id: u64, owner_ids: &[u64]) -> bool {
    owner_ids.contains(&user_id)
}

pub fn denial_message(mention: &str) -> String {
    format!("{}, you do not have permission to use this command.", mention)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(is_admin: bool, roles: &[&str]) -> MemberAccess {
        MemberAccess {
            is_admin,
            role_names: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_admin_always_permitted() {
        assert!(access(true, &[]).has_permission());
    }

    #[test]
    fn test_permitted_roles() {
        assert!(access(false, &["FunnyCommands"]).has_permission());
        assert!(access(false, &["Member", "Staff"]).has_permission());
        assert!(!access(false, &["Member"]).has_permission());
        assert!(!access(false, &["staff"]).has_permission());
    }

    #[test]
    fn test_moderator_roles_exclude_funny_commands() {
        assert!(!access(false, &["FunnyCommands"]).is_moderator());
        assert!(access(false, &["Parliamentarian"]).is_moderator());
    }

    #[test]
    fn test_is_owner() {
        assert!(is_owner(5, &[1, 5]));
        assert!(!is_owner(2, &[1, 5]));
        assert!(!is_owner(2, &[]));
    }

    #[test]
    fn test_denial_message() {
        assert_eq!(
            denial_message("<@1>"),
            "<@1>, you do not have permission to use this command."
        );
    }
}
