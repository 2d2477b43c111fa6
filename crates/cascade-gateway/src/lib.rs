//! # Cascade Gateway
//!
//! The guild-scoped authorization and mutation gateway both front ends
//! delegate to.
//!
//! - `gate` - [`GuildGate`]: resolve guild and caller, then run a unit of work
//! - `locks` - per-guild serialization of load/apply/store
//! - `ownership` - ownership checks with orphan self-heal
//! - `pager` - splitting listings into pages
//! - `commands` - the chat command adapter
//! - `api` - the typed API adapter

#![forbid(unsafe_code)]

pub mod api;
pub mod commands;
pub mod gate;
pub mod guarded;
pub mod locks;
pub mod ownership;
pub mod pager;

pub use api::{ApiDispatcher, ApiInvocation, ApiRequest, ApiResponse, SettingsApi};
pub use commands::{
    CommandDispatcher, CommandInvocation, CommandRegistry, CommandReply, GuildCommand, Responder,
};
pub use gate::{GuildContext, GuildGate, GuildTransaction};
pub use guarded::run_guarded;
pub use locks::{GuildLockGuard, GuildLocks};
pub use ownership::guard_owned;
pub use pager::{paginate, Page, DEFAULT_PAGE_SIZE};
