//! Everything persisted for one guild

use crate::playlist::MusicSettings;
use crate::settings::GuildSettings;
use crate::todo::UsefulSettings;
use cascade_core::{GuildId, Result};
use serde::{Deserialize, Serialize};

/// The unit loaded from and stored to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildData {
    /// Owning guild
    pub guild_id: GuildId,
    /// Core settings
    pub settings: GuildSettings,
    /// Todo lists
    #[serde(default)]
    pub useful: UsefulSettings,
    /// Playlists
    #[serde(default)]
    pub music: MusicSettings,
}

impl GuildData {
    /// Data for a guild seen for the first time.
    pub fn new(guild_id: GuildId, default_prefix: &str) -> Result<Self> {
        Ok(Self {
            guild_id,
            settings: GuildSettings::new(default_prefix)?,
            useful: UsefulSettings::default(),
            music: MusicSettings::default(),
        })
    }
}
