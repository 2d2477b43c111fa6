//! Per-guild mutual exclusion
//!
//! One async mutex per guild id, created on demand and dropped from the table
//! once nobody holds or waits on it. Guilds never contend with each other.

use cascade_core::{CascadeError, GuildId, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;
type Table = Arc<Mutex<HashMap<GuildId, Slot>>>;

/// Lock table keyed by guild.
#[derive(Debug, Clone, Default)]
pub struct GuildLocks {
    table: Table,
}

impl GuildLocks {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a guild, giving up after `timeout`.
    ///
    /// # Errors
    /// `Timeout` if the lock is still held by someone else when `timeout` elapses.
    pub async fn acquire(&self, guild_id: GuildId, timeout: Duration) -> Result<GuildLockGuard> {
        let slot = self.table.lock().entry(guild_id).or_default().clone();

        match tokio::time::timeout(timeout, slot.clone().lock_owned()).await {
            Ok(guard) => Ok(GuildLockGuard {
                guild_id,
                table: self.table.clone(),
                slot,
                guard: Some(guard),
            }),
            Err(_) => {
                prune(&self.table, guild_id, &slot);
                tracing::warn!(
                    guild_id = %guild_id,
                    timeout_ms = millis(timeout),
                    "timed out waiting for guild lock"
                );
                Err(CascadeError::timeout(
                    format!("waiting for the lock on guild {guild_id}"),
                    millis(timeout),
                ))
            }
        }
    }

    /// Guilds currently locked or waited on.
    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    /// Whether no guild is locked or waited on.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exclusive access to one guild, released on drop.
#[derive(Debug)]
pub struct GuildLockGuard {
    guild_id: GuildId,
    table: Table,
    slot: Slot,
    guard: Option<OwnedMutexGuard<()>>,
}

impl GuildLockGuard {
    /// Locked guild.
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }
}

impl Drop for GuildLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        prune(&self.table, self.guild_id, &self.slot);
    }
}

// Remove the entry when only the table and `slot` still reference it. New
// acquirers clone under the table lock, so the count cannot grow meanwhile.
fn prune(table: &Table, guild_id: GuildId, slot: &Slot) {
    let mut table = table.lock();
    let idle = table
        .get(&guild_id)
        .is_some_and(|entry| Arc::ptr_eq(entry, slot) && Arc::strong_count(slot) <= 2);
    if idle {
        table.remove(&guild_id);
    }
}

pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
