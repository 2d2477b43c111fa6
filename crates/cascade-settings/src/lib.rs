//! # Cascade Settings
//!
//! Per-guild state and the rules for changing it:
//!
//! - `settings` - the `GuildSettings` aggregate and its trusted mutators
//! - `fields` - the declared settings table consulted by partial updates
//! - `update` - the all-or-nothing partial update applier
//! - `module`, `locale`, `tag` - value types held by the aggregate
//! - `resource`, `todo`, `playlist` - member-owned resources
//! - `data`, `store` - the persisted unit and the `SettingsStore` seam

#![forbid(unsafe_code)]

pub mod data;
pub mod fields;
pub mod locale;
pub mod module;
pub mod playlist;
pub mod resource;
pub mod settings;
pub mod store;
pub mod tag;
pub mod todo;
pub mod update;

pub use data::GuildData;
pub use fields::{SettingField, SettingInfo, SettingKind, SettingsRegistry};
pub use locale::Locale;
pub use module::Module;
pub use playlist::{MusicSettings, Playlist, PlaylistId, PlaylistScope};
pub use resource::{Access, OwnedResource, ResourceCollection};
pub use settings::GuildSettings;
pub use store::{MemoryStore, SettingsStore};
pub use tag::{Tag, DEFAULT_TAG_CATEGORY};
pub use todo::{TodoItem, TodoList, UsefulSettings};
pub use update::UpdateReport;
