//! Permission model
//!
//! A permission is a flat, globally unique key plus the grant that applies
//! when nothing overrides it. Keys look hierarchical (`todo.view`) but are
//! matched exactly: holding `todo` grants nothing for `todo.view`.
//!
//! Resolution order for `(guild, caller, key)`:
//! 1. unknown key: not granted
//! 2. caller resolved in another guild: not granted
//! 3. a member override for the caller
//! 4. role overrides for any of the caller's roles (a grant on any role wins)
//! 5. the permission's declared default

use crate::caller::CallerIdentity;
use crate::errors::{CascadeError, Result};
use crate::identifiers::{GuildId, MemberId, RoleId};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A named capability and its default grant state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Permission {
    /// Globally unique key
    pub key: &'static str,
    /// Grant applied when no override exists
    pub default_granted: bool,
}

impl Permission {
    /// Declare a permission.
    pub const fn of(key: &'static str, default_granted: bool) -> Self {
        Self {
            key,
            default_granted,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)
    }
}

/// Permissions the built-in commands and API operations require.
pub mod builtin {
    use super::Permission;

    /// Enable a feature module
    pub const MODULE_ENABLE: Permission = Permission::of("module.enable", false);
    /// Disable a feature module
    pub const MODULE_DISABLE: Permission = Permission::of("module.disable", false);
    /// List enabled modules
    pub const MODULE_LIST: Permission = Permission::of("module.list", true);
    /// Show a tag
    pub const TAG_VIEW: Permission = Permission::of("tag.view", true);
    /// Create or overwrite tags
    pub const TAG_CREATE: Permission = Permission::of("tag.create", false);
    /// Delete tags
    pub const TAG_DELETE: Permission = Permission::of("tag.delete", false);
    /// Show the command prefix
    pub const PREFIX_VIEW: Permission = Permission::of("prefix.view", true);
    /// Change the command prefix
    pub const PREFIX_SET: Permission = Permission::of("prefix.set", false);
    /// Apply partial updates to core settings
    pub const SETTINGS_EDIT: Permission = Permission::of("settings.edit", false);
    /// Create a todo list
    pub const TODO_CREATE: Permission = Permission::of("todo.create", true);
    /// Add an item to a todo list
    pub const TODO_ADD: Permission = Permission::of("todo.add", true);
    /// Remove or check off todo items
    pub const TODO_REMOVE: Permission = Permission::of("todo.remove", true);
    /// View a todo list
    pub const TODO_VIEW: Permission = Permission::of("todo.view", true);
    /// Delete a todo list
    pub const TODO_DELETE: Permission = Permission::of("todo.delete", true);
    /// Manage who may edit a todo list
    pub const TODO_EDITORS: Permission = Permission::of("todo.editors", true);
    /// Create a playlist
    pub const PLAYLIST_CREATE: Permission = Permission::of("playlist.create", true);
    /// Add or remove playlist tracks
    pub const PLAYLIST_EDIT: Permission = Permission::of("playlist.edit", true);
    /// View a playlist
    pub const PLAYLIST_VIEW: Permission = Permission::of("playlist.view", true);
    /// Delete a playlist
    pub const PLAYLIST_DELETE: Permission = Permission::of("playlist.delete", true);

    /// Every built-in permission.
    pub const ALL: &[Permission] = &[
        MODULE_ENABLE,
        MODULE_DISABLE,
        MODULE_LIST,
        TAG_VIEW,
        TAG_CREATE,
        TAG_DELETE,
        PREFIX_VIEW,
        PREFIX_SET,
        SETTINGS_EDIT,
        TODO_CREATE,
        TODO_ADD,
        TODO_REMOVE,
        TODO_VIEW,
        TODO_DELETE,
        TODO_EDITORS,
        PLAYLIST_CREATE,
        PLAYLIST_EDIT,
        PLAYLIST_VIEW,
        PLAYLIST_DELETE,
    ];
}

/// The set of declared permissions, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct PermissionRegistry {
    permissions: BTreeMap<&'static str, Permission>,
}

impl PermissionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding [`builtin::ALL`].
    pub fn with_builtin() -> Result<Self> {
        let mut registry = Self::new();
        for permission in builtin::ALL {
            registry.register(*permission)?;
        }
        Ok(registry)
    }

    /// Declare a permission. Keys must be unique.
    pub fn register(&mut self, permission: Permission) -> Result<()> {
        if self.permissions.contains_key(permission.key) {
            return Err(CascadeError::invalid_argument(format!(
                "permission `{}` is already registered",
                permission.key
            )));
        }
        self.permissions.insert(permission.key, permission);
        Ok(())
    }

    /// Look up a declared permission.
    pub fn get(&self, key: &str) -> Option<&Permission> {
        self.permissions.get(key)
    }

    /// All declared permissions in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.values()
    }

    /// Number of declared permissions.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Whether no permission is declared.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

/// Explicit grants and denials recorded for one guild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuildPermissionOverrides {
    members: BTreeMap<MemberId, BTreeMap<String, bool>>,
    roles: BTreeMap<RoleId, BTreeMap<String, bool>>,
}

impl GuildPermissionOverrides {
    fn member_override(&self, member: MemberId, key: &str) -> Option<bool> {
        self.members.get(&member)?.get(key).copied()
    }

    fn role_override<'a>(
        &self,
        roles: impl IntoIterator<Item = &'a RoleId>,
        key: &str,
    ) -> Option<bool> {
        let mut decision = None;
        for role in roles {
            match self.roles.get(role).and_then(|keys| keys.get(key)) {
                Some(true) => return Some(true),
                Some(false) => decision = Some(false),
                None => {}
            }
        }
        decision
    }

    /// Whether nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.roles.is_empty()
    }
}

/// Resolves permission keys for callers, guild by guild.
///
/// Overrides are held per guild behind a lock so administrative changes are
/// visible to in-flight invocations on their next check.
#[derive(Debug, Default)]
pub struct PermissionModel {
    registry: PermissionRegistry,
    overrides: RwLock<HashMap<GuildId, GuildPermissionOverrides>>,
}

impl PermissionModel {
    /// Create a model over a registry with no overrides.
    pub fn new(registry: PermissionRegistry) -> Self {
        Self {
            registry,
            overrides: RwLock::new(HashMap::new()),
        }
    }

    /// Model over the built-in permissions.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(PermissionRegistry::with_builtin()?))
    }

    /// The declared permissions.
    pub fn registry(&self) -> &PermissionRegistry {
        &self.registry
    }

    /// Resolve a key for a caller in a guild. Never fails.
    pub fn resolve(&self, guild_id: GuildId, caller: &CallerIdentity, key: &str) -> bool {
        let Some(permission) = self.registry.get(key) else {
            return false;
        };
        if !caller.is_scoped_to(guild_id) {
            return false;
        }

        let overrides = self.overrides.read();
        let Some(guild) = overrides.get(&guild_id) else {
            return permission.default_granted;
        };

        guild
            .member_override(caller.member_id, key)
            .or_else(|| guild.role_override(caller.roles.iter(), key))
            .unwrap_or(permission.default_granted)
    }

    /// Require a permission in the caller's own guild.
    pub fn check(&self, caller: &CallerIdentity, permission: &Permission) -> Result<()> {
        if self.resolve(caller.guild_id, caller, permission.key) {
            Ok(())
        } else {
            Err(CascadeError::permission_denied(permission.key))
        }
    }

    /// Grant or deny a key for one member.
    pub fn set_member_override(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
        key: &str,
        granted: bool,
    ) -> Result<()> {
        self.ensure_declared(key)?;
        self.overrides
            .write()
            .entry(guild_id)
            .or_default()
            .members
            .entry(member_id)
            .or_default()
            .insert(key.to_string(), granted);
        Ok(())
    }

    /// Grant or deny a key for everyone holding a role.
    pub fn set_role_override(
        &self,
        guild_id: GuildId,
        role_id: RoleId,
        key: &str,
        granted: bool,
    ) -> Result<()> {
        self.ensure_declared(key)?;
        self.overrides
            .write()
            .entry(guild_id)
            .or_default()
            .roles
            .entry(role_id)
            .or_default()
            .insert(key.to_string(), granted);
        Ok(())
    }

    /// Drop a member override, falling back to roles and defaults.
    pub fn clear_member_override(&self, guild_id: GuildId, member_id: MemberId, key: &str) {
        let mut overrides = self.overrides.write();
        if let Some(guild) = overrides.get_mut(&guild_id) {
            if let Some(keys) = guild.members.get_mut(&member_id) {
                keys.remove(key);
                if keys.is_empty() {
                    guild.members.remove(&member_id);
                }
            }
            if guild.is_empty() {
                overrides.remove(&guild_id);
            }
        }
    }

    /// Forget every override recorded for a guild.
    pub fn clear_guild(&self, guild_id: GuildId) {
        self.overrides.write().remove(&guild_id);
    }

    fn ensure_declared(&self, key: &str) -> Result<()> {
        if self.registry.get(key).is_none() {
            return Err(CascadeError::invalid_argument(format!(
                "unknown permission `{key}`"
            )));
        }
        Ok(())
    }
}
