//! Guild directory interface
//!
//! The directory answers the two questions the gate asks on every
//! invocation: does this guild still exist, and does this member still have
//! standing in it. Answers are never cached by callers; guilds and members can
//! disappear between a request being issued and it being processed.

use crate::caller::CallerIdentity;
use crate::errors::{CascadeError, Result};
use crate::identifiers::{GuildId, MemberId, RoleId};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A resolved guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    /// Guild identifier
    pub id: GuildId,
    /// Display name
    pub name: String,
    /// Member that owns the guild
    pub owner_id: MemberId,
}

/// Source of truth for guild existence and membership.
#[async_trait]
pub trait GuildDirectory: Send + Sync {
    /// Resolve a guild, `None` if it does not exist.
    async fn guild(&self, guild_id: GuildId) -> Result<Option<Guild>>;

    /// Resolve a member's current standing in a guild, `None` if the member
    /// is not (or no longer) part of it.
    async fn member(&self, guild_id: GuildId, member_id: MemberId)
        -> Result<Option<CallerIdentity>>;
}

#[derive(Debug, Clone)]
struct GuildEntry {
    guild: Guild,
    members: HashMap<MemberId, BTreeSet<RoleId>>,
}

/// In-memory directory used by the CLI and by tests.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    guilds: RwLock<HashMap<GuildId, GuildEntry>>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a guild. Its owner becomes a member with no roles.
    pub fn insert_guild(&self, guild: Guild) {
        let mut members = HashMap::new();
        members.insert(guild.owner_id, BTreeSet::new());
        self.guilds
            .write()
            .insert(guild.id, GuildEntry { guild, members });
    }

    /// Remove a guild and all of its memberships.
    pub fn remove_guild(&self, guild_id: GuildId) -> bool {
        self.guilds.write().remove(&guild_id).is_some()
    }

    /// Add (or re-add) a member with the given roles.
    pub fn add_member(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
        roles: impl IntoIterator<Item = RoleId>,
    ) -> Result<()> {
        let mut guilds = self.guilds.write();
        let entry = guilds
            .get_mut(&guild_id)
            .ok_or_else(|| CascadeError::tenant_not_found(guild_id))?;
        entry.members.insert(member_id, roles.into_iter().collect());
        Ok(())
    }

    /// Remove a member. Returns whether the member was present.
    pub fn remove_member(&self, guild_id: GuildId, member_id: MemberId) -> bool {
        self.guilds
            .write()
            .get_mut(&guild_id)
            .map(|entry| entry.members.remove(&member_id).is_some())
            .unwrap_or(false)
    }

    /// Replace a member's roles.
    pub fn set_roles(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
        roles: impl IntoIterator<Item = RoleId>,
    ) -> Result<()> {
        let mut guilds = self.guilds.write();
        let entry = guilds
            .get_mut(&guild_id)
            .ok_or_else(|| CascadeError::tenant_not_found(guild_id))?;
        let current = entry
            .members
            .get_mut(&member_id)
            .ok_or_else(|| CascadeError::caller_not_authenticated(guild_id, member_id))?;
        *current = roles.into_iter().collect();
        Ok(())
    }

    /// Number of registered guilds.
    pub fn guild_count(&self) -> usize {
        self.guilds.read().len()
    }
}

#[async_trait]
impl GuildDirectory for MemoryDirectory {
    async fn guild(&self, guild_id: GuildId) -> Result<Option<Guild>> {
        Ok(self
            .guilds
            .read()
            .get(&guild_id)
            .map(|entry| entry.guild.clone()))
    }

    async fn member(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
    ) -> Result<Option<CallerIdentity>> {
        let guilds = self.guilds.read();
        let identity = guilds.get(&guild_id).and_then(|entry| {
            entry.members.get(&member_id).map(|roles| CallerIdentity {
                guild_id,
                member_id,
                roles: roles.clone(),
            })
        });
        Ok(identity)
    }
}
