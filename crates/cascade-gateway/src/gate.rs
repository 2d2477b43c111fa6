//! Authenticated invocation gate
//!
//! Every front-end operation that touches a guild goes through
//! [`GuildGate::run_if_authenticated_guild`]:
//!
//! 1. resolve the guild, failing with `TenantNotFound`
//! 2. re-resolve the caller's standing in it, failing with `CallerNotAuthenticated`
//! 3. run the unit of work with a [`GuildContext`]
//!
//! Resolution is bounded by the configured timeout. If either check fails the
//! unit of work is never called. The gate checks no specific permission; the
//! unit of work does, through [`GuildContext::require`].
//!
//! Units of work that mutate state open a [`GuildTransaction`], which holds
//! the guild's lock from load to store. Nothing is written unless the
//! transaction is committed (or explicitly saved), so a unit of work that is
//! cancelled or fails midway leaves the stored data untouched.

use crate::locks::{millis, GuildLockGuard, GuildLocks};
use cascade_core::{
    CallerIdentity, CascadeConfig, CascadeError, GateConfig, Guild, GuildDirectory, GuildId,
    MemberId, Permission, PermissionModel, Result,
};
use cascade_settings::{GuildData, SettingsStore};
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, warn};

struct GateShared {
    directory: Arc<dyn GuildDirectory>,
    store: Arc<dyn SettingsStore>,
    permissions: Arc<PermissionModel>,
    locks: GuildLocks,
    config: GateConfig,
    default_prefix: String,
    page_size: NonZeroUsize,
}

/// Entry point shared by the chat and API adapters. Cheap to clone.
#[derive(Clone)]
pub struct GuildGate {
    shared: Arc<GateShared>,
}

impl GuildGate {
    /// Build a gate over its collaborators.
    ///
    /// # Errors
    /// `Config` if the configuration does not validate.
    pub fn new(
        directory: Arc<dyn GuildDirectory>,
        store: Arc<dyn SettingsStore>,
        permissions: Arc<PermissionModel>,
        config: &CascadeConfig,
    ) -> Result<Self> {
        config.validate()?;
        let page_size = NonZeroUsize::new(config.pagination.page_size)
            .ok_or_else(|| CascadeError::config("pagination.page_size must be positive"))?;

        Ok(Self {
            shared: Arc::new(GateShared {
                directory,
                store,
                permissions,
                locks: GuildLocks::new(),
                config: config.gate.clone(),
                default_prefix: config.settings.default_prefix.clone(),
                page_size,
            }),
        })
    }

    /// The permission model adapters pre-check against.
    pub fn permissions(&self) -> &PermissionModel {
        &self.shared.permissions
    }

    /// Guilds with a held or awaited lock.
    pub fn locked_guilds(&self) -> usize {
        self.shared.locks.len()
    }

    /// Resolve guild and caller, then run `work`.
    ///
    /// Errors returned by `work` are passed through unchanged.
    pub async fn run_if_authenticated_guild<T, F, Fut>(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
        work: F,
    ) -> Result<T>
    where
        F: FnOnce(GuildContext) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let (guild, caller) = self.resolve(guild_id, member_id).await?;
        debug!(guild_id = %guild_id, member_id = %member_id, "gate passed");

        work(GuildContext {
            guild,
            caller,
            shared: self.shared.clone(),
        })
        .await
    }

    async fn resolve(
        &self,
        guild_id: GuildId,
        member_id: MemberId,
    ) -> Result<(Guild, CallerIdentity)> {
        let directory = &self.shared.directory;
        let bound = self.shared.config.resolve_timeout();

        let lookup = async {
            let guild = directory
                .guild(guild_id)
                .await?
                .ok_or_else(|| CascadeError::tenant_not_found(guild_id))?;
            let caller = directory
                .member(guild_id, member_id)
                .await?
                .ok_or_else(|| CascadeError::caller_not_authenticated(guild_id, member_id))?;
            Ok::<_, CascadeError>((guild, caller))
        };

        match tokio::time::timeout(bound, lookup).await {
            Ok(Ok(resolved)) => Ok(resolved),
            Ok(Err(err)) if err.is_user_error() => {
                debug!(guild_id = %guild_id, member_id = %member_id, error = %err, "gate refused");
                Err(err)
            }
            Ok(Err(err)) => {
                warn!(guild_id = %guild_id, member_id = %member_id, error = %err, "guild resolution failed");
                Err(err)
            }
            Err(_) => {
                warn!(
                    guild_id = %guild_id,
                    member_id = %member_id,
                    timeout_ms = millis(bound),
                    "guild resolution timed out"
                );
                Err(CascadeError::timeout(
                    format!("resolving member {member_id} in guild {guild_id}"),
                    millis(bound),
                ))
            }
        }
    }
}

impl std::fmt::Debug for GuildGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuildGate")
            .field("config", &self.shared.config)
            .field("page_size", &self.shared.page_size)
            .finish_non_exhaustive()
    }
}

/// What a unit of work sees once the gate has let it through.
pub struct GuildContext {
    guild: Guild,
    caller: CallerIdentity,
    shared: Arc<GateShared>,
}

impl GuildContext {
    /// The resolved guild.
    pub fn guild(&self) -> &Guild {
        &self.guild
    }

    /// Resolved guild id.
    pub fn guild_id(&self) -> GuildId {
        self.guild.id
    }

    /// The caller's standing as resolved by the gate.
    pub fn caller(&self) -> &CallerIdentity {
        &self.caller
    }

    /// Page size for listing replies.
    pub fn page_size(&self) -> NonZeroUsize {
        self.shared.page_size
    }

    /// Whether the freshly resolved caller holds `permission`.
    pub fn allows(&self, permission: &Permission) -> bool {
        self.shared
            .permissions
            .resolve(self.guild.id, &self.caller, permission.key)
    }

    /// Require `permission` of the freshly resolved caller.
    pub fn require(&self, permission: &Permission) -> Result<()> {
        if self.allows(permission) {
            return Ok(());
        }
        debug!(
            guild_id = %self.guild.id,
            member_id = %self.caller.member_id,
            permission = %permission,
            "permission denied"
        );
        Err(CascadeError::permission_denied(permission.key))
    }

    /// Check if `member` currently has standing in this guild.
    pub async fn is_member(&self, member: MemberId) -> Result<bool> {
        let bound = self.shared.config.resolve_timeout();
        let lookup = self.shared.directory.member(self.guild.id, member);
        match tokio::time::timeout(bound, lookup).await {
            Ok(found) => Ok(found?.is_some()),
            Err(_) => Err(CascadeError::timeout(
                format!("resolving member {member} in guild {}", self.guild.id),
                millis(bound),
            )),
        }
    }

    /// Current data without taking the guild lock. Guilds seen for the first
    /// time get default data, which is not stored until a transaction commits.
    pub async fn snapshot(&self) -> Result<GuildData> {
        self.load().await
    }

    /// Lock the guild and load its data for modification.
    pub async fn begin(&self) -> Result<GuildTransaction> {
        let lock = self
            .shared
            .locks
            .acquire(self.guild.id, self.shared.config.lock_timeout())
            .await?;
        let stored = self.shared.store.load(self.guild.id).await?;
        let persisted = stored.is_some();
        let data = match stored {
            Some(data) => data,
            None => GuildData::new(self.guild.id, &self.shared.default_prefix)?,
        };

        Ok(GuildTransaction {
            loaded: data.clone(),
            data,
            persisted,
            store: self.shared.store.clone(),
            _lock: lock,
        })
    }

    async fn load(&self) -> Result<GuildData> {
        match self.shared.store.load(self.guild.id).await? {
            Some(data) => Ok(data),
            None => GuildData::new(self.guild.id, &self.shared.default_prefix),
        }
    }
}

/// Locked, in-memory working copy of a guild's data.
///
/// Dropping the transaction without committing discards every change.
pub struct GuildTransaction {
    loaded: GuildData,
    data: GuildData,
    persisted: bool,
    store: Arc<dyn SettingsStore>,
    _lock: GuildLockGuard,
}

impl GuildTransaction {
    /// Working copy.
    pub fn data(&self) -> &GuildData {
        &self.data
    }

    /// Mutable working copy.
    pub fn data_mut(&mut self) -> &mut GuildData {
        &mut self.data
    }

    /// Store the working copy now, keeping the lock.
    pub async fn save(&mut self) -> Result<()> {
        if self.persisted && self.data == self.loaded {
            return Ok(());
        }
        let guild_id = self.data.guild_id;
        self.store.store(guild_id, self.data.clone()).await?;
        self.loaded = self.data.clone();
        self.persisted = true;
        debug!(guild_id = %guild_id, "guild data committed");
        Ok(())
    }

    /// Store the working copy and release the lock.
    pub async fn commit(mut self) -> Result<()> {
        self.save().await
    }
}
