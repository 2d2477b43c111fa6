//! Playlists
//!
//! Playlist names are unique per guild. A user-scoped playlist is stored with
//! the guild's data but only its owner can see it.

use crate::resource::{OwnedResource, ResourceCollection};
use cascade_core::{CascadeError, MemberId, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Playlist identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaylistId(Uuid);

impl PlaylistId {
    /// Fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlaylistId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who a playlist is visible to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaylistScope {
    /// Every member of the guild
    #[default]
    Guild,
    /// Only the owner
    User,
}

impl FromStr for PlaylistScope {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guild" => Ok(PlaylistScope::Guild),
            "user" => Ok(PlaylistScope::User),
            other => Err(CascadeError::invalid_argument(format!(
                "unknown playlist scope `{other}`, expected `guild` or `user`"
            ))),
        }
    }
}

/// A named list of tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Identifier
    pub id: PlaylistId,
    /// Name, unique per guild
    pub name: String,
    owner_id: MemberId,
    /// Visibility
    pub scope: PlaylistScope,
    tracks: Vec<String>,
}

impl Playlist {
    /// Empty playlist.
    pub fn new(name: impl Into<String>, owner_id: MemberId, scope: PlaylistScope) -> Self {
        Self {
            id: PlaylistId::new(),
            name: name.into(),
            owner_id,
            scope,
            tracks: Vec::new(),
        }
    }

    /// Tracks in play order.
    pub fn tracks(&self) -> &[String] {
        &self.tracks
    }

    /// Append a track.
    pub fn add_track(&mut self, track: impl Into<String>) -> Result<usize> {
        let track = track.into();
        if track.trim().is_empty() {
            return Err(CascadeError::invalid_argument("track is empty"));
        }
        self.tracks.push(track);
        Ok(self.tracks.len())
    }

    /// Remove the track at a 1-based position.
    pub fn remove_track(&mut self, position: usize) -> Result<String> {
        if position == 0 || position > self.tracks.len() {
            return Err(CascadeError::invalid_argument(format!(
                "track {position} does not exist, the playlist has {} tracks",
                self.tracks.len()
            )));
        }
        Ok(self.tracks.remove(position - 1))
    }

    /// Whether `member` can see this playlist.
    pub fn visible_to(&self, member: MemberId) -> bool {
        self.scope == PlaylistScope::Guild || self.owner_id == member
    }
}

impl OwnedResource for Playlist {
    fn owner_id(&self) -> MemberId {
        self.owner_id
    }
}

/// Music data for one guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicSettings {
    playlists: BTreeMap<String, Playlist>,
}

impl MusicSettings {
    /// Create a playlist.
    pub fn create(
        &mut self,
        name: &str,
        owner_id: MemberId,
        scope: PlaylistScope,
    ) -> Result<&mut Playlist> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(CascadeError::invalid_argument(format!(
                "playlist name `{name}` must be a single non-empty word"
            )));
        }
        if self.playlists.contains_key(name) {
            return Err(CascadeError::invalid_argument(format!(
                "playlist `{name}` already exists"
            )));
        }
        Ok(self
            .playlists
            .entry(name.to_string())
            .or_insert_with(|| Playlist::new(name, owner_id, scope)))
    }

    /// Playlists `viewer` can see, in name order.
    pub fn visible_to(&self, viewer: MemberId) -> impl Iterator<Item = &Playlist> {
        self.playlists.values().filter(move |p| p.visible_to(viewer))
    }

    /// Total stored, regardless of visibility.
    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    /// Whether no playlists are stored.
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }
}

impl ResourceCollection for MusicSettings {
    type Resource = Playlist;

    const KIND: &'static str = "playlist";

    fn resource(&self, name: &str, viewer: MemberId) -> Option<&Playlist> {
        self.playlists.get(name).filter(|p| p.visible_to(viewer))
    }

    fn resource_mut(&mut self, name: &str, viewer: MemberId) -> Option<&mut Playlist> {
        self.playlists
            .get_mut(name)
            .filter(|p| p.visible_to(viewer))
    }

    fn stored(&self, name: &str) -> Option<&Playlist> {
        self.playlists.get(name)
    }

    fn remove(&mut self, name: &str) -> Option<Playlist> {
        self.playlists.remove(name)
    }
}
