//! # Cascade Core
//!
//! Shared vocabulary for the guild gateway:
//!
//! - `identifiers` - `GuildId`, `MemberId`, `RoleId`
//! - `errors` - the unified `CascadeError` taxonomy
//! - `caller` - guild-scoped `CallerIdentity`
//! - `permission` - declared permissions, overrides and resolution
//! - `directory` - the `GuildDirectory` seam plus an in-memory implementation
//! - `prefix` - command prefix character rules
//! - `config` - TOML/env configuration
//!
//! Nothing in this crate renders user-facing text or logs decisions on behalf
//! of callers; errors are returned to the adapters that own presentation.

#![forbid(unsafe_code)]

pub mod caller;
pub mod config;
pub mod directory;
pub mod errors;
pub mod identifiers;
pub mod permission;
pub mod prefix;

pub use caller::CallerIdentity;
pub use config::{CascadeConfig, GateConfig, PaginationConfig, SettingsConfig};
pub use directory::{Guild, GuildDirectory, MemoryDirectory};
pub use errors::{BoxError, CascadeError, Result};
pub use identifiers::{GuildId, MemberId, RoleId};
pub use permission::{
    builtin as permissions, GuildPermissionOverrides, Permission, PermissionModel,
    PermissionRegistry,
};
pub use prefix::validate_prefix;
