//! Typed settings operations

use crate::gate::GuildGate;
use crate::guarded::run_guarded;
use cascade_core::{permissions, CallerIdentity, GuildId, Result};
use cascade_settings::{Module, SettingInfo, SettingsRegistry, Tag, UpdateReport};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Queries and mutations over a guild's core settings.
#[derive(Clone)]
pub struct SettingsApi {
    gate: GuildGate,
}

impl SettingsApi {
    /// API over a gate.
    pub fn new(gate: GuildGate) -> Self {
        Self { gate }
    }

    /// Every declared setting. Guild independent, needs no caller.
    pub fn settings_information(&self) -> Vec<SettingInfo> {
        SettingsRegistry::builtin().information()
    }

    /// Enable a module, returning the enabled set.
    pub async fn enable_module(
        &self,
        guild_id: GuildId,
        caller: &CallerIdentity,
        module: Module,
    ) -> Result<BTreeSet<Module>> {
        run_guarded(
            &self.gate,
            guild_id,
            caller,
            permissions::MODULE_ENABLE,
            |ctx| async move {
                let mut tx = ctx.begin().await?;
                tx.data_mut().settings.enable_module(module);
                let modules = tx.data().settings.enabled_modules().clone();
                tx.commit().await?;
                Ok(modules)
            },
        )
        .await
    }

    /// Disable a module, returning the enabled set.
    pub async fn disable_module(
        &self,
        guild_id: GuildId,
        caller: &CallerIdentity,
        module: Module,
    ) -> Result<BTreeSet<Module>> {
        run_guarded(
            &self.gate,
            guild_id,
            caller,
            permissions::MODULE_DISABLE,
            |ctx| async move {
                let mut tx = ctx.begin().await?;
                tx.data_mut().settings.disable_module(module)?;
                let modules = tx.data().settings.enabled_modules().clone();
                tx.commit().await?;
                Ok(modules)
            },
        )
        .await
    }

    /// Insert or overwrite tags, returning every tag.
    pub async fn update_tags(
        &self,
        guild_id: GuildId,
        caller: &CallerIdentity,
        tags: BTreeMap<String, Tag>,
    ) -> Result<BTreeMap<String, Tag>> {
        run_guarded(
            &self.gate,
            guild_id,
            caller,
            permissions::TAG_CREATE,
            |ctx| async move {
                let mut tx = ctx.begin().await?;
                for (name, tag) in tags {
                    tx.data_mut().settings.add_tag(&name, tag)?;
                }
                let all = tx.data().settings.tags().clone();
                tx.commit().await?;
                Ok(all)
            },
        )
        .await
    }

    /// Remove tags, ignoring names that do not exist, returning every tag left.
    pub async fn remove_tags(
        &self,
        guild_id: GuildId,
        caller: &CallerIdentity,
        names: BTreeSet<String>,
    ) -> Result<BTreeMap<String, Tag>> {
        run_guarded(
            &self.gate,
            guild_id,
            caller,
            permissions::TAG_DELETE,
            |ctx| async move {
                let mut tx = ctx.begin().await?;
                for name in &names {
                    tx.data_mut().settings.remove_tag(name);
                }
                let all = tx.data().settings.tags().clone();
                tx.commit().await?;
                Ok(all)
            },
        )
        .await
    }

    /// Replace the prefix, returning it.
    pub async fn set_prefix(
        &self,
        guild_id: GuildId,
        caller: &CallerIdentity,
        prefix: String,
    ) -> Result<String> {
        run_guarded(
            &self.gate,
            guild_id,
            caller,
            permissions::PREFIX_SET,
            |ctx| async move {
                let mut tx = ctx.begin().await?;
                tx.data_mut().settings.set_prefix(&prefix)?;
                tx.commit().await?;
                Ok(prefix)
            },
        )
        .await
    }

    /// Apply a partial update to the directly editable settings.
    pub async fn update_core_settings(
        &self,
        guild_id: GuildId,
        caller: &CallerIdentity,
        updates: Map<String, Value>,
    ) -> Result<UpdateReport> {
        run_guarded(
            &self.gate,
            guild_id,
            caller,
            permissions::SETTINGS_EDIT,
            |ctx| async move {
                let mut tx = ctx.begin().await?;
                let report = SettingsRegistry::builtin().apply(&tx.data().settings, &updates)?;
                tx.data_mut().settings = report.settings.clone();
                tx.commit().await?;
                Ok(report)
            },
        )
        .await
    }
}

impl std::fmt::Debug for SettingsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsApi").finish_non_exhaustive()
    }
}
