//! Persistence interface
//!
//! The gateway only ever loads and stores whole `GuildData` values by guild
//! id. Storage engines and document codecs live behind this trait.

use crate::data::GuildData;
use async_trait::async_trait;
use cascade_core::{GuildId, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Load/store pair for per-guild data.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load a guild's data, `None` if nothing was stored yet.
    async fn load(&self, guild_id: GuildId) -> Result<Option<GuildData>>;

    /// Replace a guild's data.
    async fn store(&self, guild_id: GuildId, data: GuildData) -> Result<()>;
}

/// In-memory store used by the CLI and by tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    guilds: RwLock<HashMap<GuildId, GuildData>>,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `store` calls.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current data without going through the async interface.
    pub fn snapshot(&self, guild_id: GuildId) -> Option<GuildData> {
        self.guilds.read().get(&guild_id).cloned()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn load(&self, guild_id: GuildId) -> Result<Option<GuildData>> {
        Ok(self.guilds.read().get(&guild_id).cloned())
    }

    async fn store(&self, guild_id: GuildId, data: GuildData) -> Result<()> {
        self.guilds.write().insert(guild_id, data);
        self.writes.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(guild_id = %guild_id, "stored guild data");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_then_load() {
        let store = MemoryStore::new();
        let guild = GuildId::new(7);
        assert!(store.load(guild).await.unwrap().is_none());

        let data = GuildData::new(guild, "!").unwrap();
        store.store(guild, data.clone()).await.unwrap();

        assert_eq!(store.load(guild).await.unwrap(), Some(data));
        assert_eq!(store.writes(), 1);
    }
}
