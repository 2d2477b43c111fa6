//! Caller identity
//!
//! A caller only means something inside one guild: the same member id carries
//! no standing in any other guild, so the identity records the guild it was
//! resolved in.

use crate::identifiers::{GuildId, MemberId, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The acting principal plus its role standing within a specific guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Guild this identity was resolved in
    pub guild_id: GuildId,
    /// The acting member
    pub member_id: MemberId,
    /// Roles the member holds in `guild_id`
    pub roles: BTreeSet<RoleId>,
}

impl CallerIdentity {
    /// Create an identity with no roles.
    pub fn new(guild_id: GuildId, member_id: MemberId) -> Self {
        Self {
            guild_id,
            member_id,
            roles: BTreeSet::new(),
        }
    }

    /// Replace the role set.
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Check if the caller holds a role.
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    /// Whether this identity is meaningful in `guild_id`.
    pub fn is_scoped_to(&self, guild_id: GuildId) -> bool {
        self.guild_id == guild_id
    }
}
