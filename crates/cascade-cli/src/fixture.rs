//! Guild fixtures
//!
//! A TOML description of guilds, members, roles and permission overrides used
//! to populate the in-memory directory and permission model:
//!
//! ```toml
//! [[guilds]]
//! id = 1
//! name = "Cascade"
//! owner = 10
//!
//! [[guilds.members]]
//! id = 11
//! roles = [100]
//!
//! [[guilds.overrides]]
//! role = 100
//! permission = "module.disable"
//! granted = true
//! ```

use cascade_core::{
    CascadeError, Guild, GuildId, MemberId, MemoryDirectory, PermissionModel, Result, RoleId,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub guilds: Vec<GuildFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuildFixture {
    pub id: GuildId,
    #[serde(default)]
    pub name: String,
    pub owner: MemberId,
    #[serde(default)]
    pub members: Vec<MemberFixture>,
    #[serde(default)]
    pub overrides: Vec<OverrideFixture>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberFixture {
    pub id: MemberId,
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

/// Exactly one of `member` / `role` must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideFixture {
    pub member: Option<MemberId>,
    pub role: Option<RoleId>,
    pub permission: String,
    pub granted: bool,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CascadeError::config(format!("failed to read fixture {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CascadeError::config(format!("failed to parse fixture: {e}")))
    }

    /// Single guild owned by `owner`, used when no fixture is given.
    pub fn single(guild_id: GuildId, owner: MemberId) -> Self {
        Self {
            guilds: vec![GuildFixture {
                id: guild_id,
                name: "local".to_string(),
                owner,
                members: Vec::new(),
                overrides: Vec::new(),
            }],
        }
    }

    pub fn apply(&self, directory: &MemoryDirectory, permissions: &PermissionModel) -> Result<()> {
        for guild in &self.guilds {
            directory.insert_guild(Guild {
                id: guild.id,
                name: guild.name.clone(),
                owner_id: guild.owner,
            });
            for member in &guild.members {
                directory.add_member(guild.id, member.id, member.roles.iter().copied())?;
            }
            for rule in &guild.overrides {
                match (rule.member, rule.role) {
                    (Some(member), None) => permissions.set_member_override(
                        guild.id,
                        member,
                        &rule.permission,
                        rule.granted,
                    )?,
                    (None, Some(role)) => permissions.set_role_override(
                        guild.id,
                        role,
                        &rule.permission,
                        rule.granted,
                    )?,
                    _ => {
                        return Err(CascadeError::config(format!(
                            "override for `{}` in guild {} needs exactly one of member or role",
                            rule.permission, guild.id
                        )))
                    }
                }
            }
            tracing::debug!(guild_id = %guild.id, members = guild.members.len(), "loaded fixture guild");
        }
        Ok(())
    }
}
