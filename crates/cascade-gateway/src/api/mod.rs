//! Typed API front end
//!
//! Requests arrive deserialized into [`ApiRequest`]; no text parsing happens
//! here. Each request maps to one [`SettingsApi`] operation.

mod settings;

pub use settings::SettingsApi;

use cascade_core::{CallerIdentity, GuildId, Result};
use cascade_settings::{Module, SettingInfo, Tag, UpdateReport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// One API operation with its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "args", rename_all = "snake_case")]
pub enum ApiRequest {
    /// Describe every declared setting
    SettingsInformation,
    /// Enable a module
    EnableModule {
        /// Module to enable
        module: Module,
    },
    /// Disable a module
    DisableModule {
        /// Module to disable
        module: Module,
    },
    /// Insert or overwrite tags
    UpdateTags {
        /// Tags by name
        tags: BTreeMap<String, Tag>,
    },
    /// Remove tags
    RemoveTags {
        /// Names to remove
        names: BTreeSet<String>,
    },
    /// Replace the prefix
    SetPrefix {
        /// New prefix
        prefix: String,
    },
    /// Partial update of directly editable settings
    UpdateCoreSettings {
        /// Setting name to new value
        updates: Map<String, Value>,
    },
}

/// Result of an API operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ApiResponse {
    /// Declared settings
    SettingsInformation(Vec<SettingInfo>),
    /// Enabled modules after the change
    Modules(BTreeSet<Module>),
    /// Every tag after the change
    Tags(BTreeMap<String, Tag>),
    /// The prefix now in effect
    Prefix(String),
    /// Outcome of a partial update
    CoreSettings(UpdateReport),
}

/// A resolved API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiInvocation {
    /// Target guild
    pub guild_id: GuildId,
    /// Caller as authenticated by the transport
    pub caller: CallerIdentity,
    /// Operation and arguments
    pub request: ApiRequest,
}

/// Routes API invocations to [`SettingsApi`].
#[derive(Debug, Clone)]
pub struct ApiDispatcher {
    api: SettingsApi,
}

impl ApiDispatcher {
    /// Dispatcher over the settings API.
    pub fn new(api: SettingsApi) -> Self {
        Self { api }
    }

    /// Run one invocation.
    pub async fn dispatch(&self, invocation: ApiInvocation) -> Result<ApiResponse> {
        let ApiInvocation {
            guild_id,
            caller,
            request,
        } = invocation;
        let api = &self.api;

        Ok(match request {
            ApiRequest::SettingsInformation => {
                ApiResponse::SettingsInformation(api.settings_information())
            }
            ApiRequest::EnableModule { module } => {
                ApiResponse::Modules(api.enable_module(guild_id, &caller, module).await?)
            }
            ApiRequest::DisableModule { module } => {
                ApiResponse::Modules(api.disable_module(guild_id, &caller, module).await?)
            }
            ApiRequest::UpdateTags { tags } => {
                ApiResponse::Tags(api.update_tags(guild_id, &caller, tags).await?)
            }
            ApiRequest::RemoveTags { names } => {
                ApiResponse::Tags(api.remove_tags(guild_id, &caller, names).await?)
            }
            ApiRequest::SetPrefix { prefix } => {
                ApiResponse::Prefix(api.set_prefix(guild_id, &caller, prefix).await?)
            }
            ApiRequest::UpdateCoreSettings { updates } => ApiResponse::CoreSettings(
                api.update_core_settings(guild_id, &caller, updates).await?,
            ),
        })
    }
}
