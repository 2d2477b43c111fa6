//! Partial update applier
//!
//! Applies a name-to-value map to a copy of the settings, all or nothing:
//!
//! 1. names with no declared setting are ignored (clients may send keys this
//!    build does not know about)
//! 2. a declared setting without a writer fails the whole update with
//!    `FieldNotEditable`
//! 3. a value of the wrong shape fails the whole update with `TypeMismatch`
//! 4. only when every entry passed are the accepted values written
//!
//! Entries are checked in name order, so the reported failure is the first
//! offending name alphabetically. The input settings are never modified.

use crate::fields::SettingsRegistry;
use crate::settings::GuildSettings;
use cascade_core::{CascadeError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Outcome of a successful partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateReport {
    /// Settings with every accepted value applied
    pub settings: GuildSettings,
    /// Names that were written
    pub applied: Vec<String>,
    /// Names with no declared setting
    pub ignored: Vec<String>,
}

impl UpdateReport {
    /// Whether nothing was written.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

impl SettingsRegistry {
    /// Validate and apply `updates` to a copy of `settings`.
    pub fn apply(
        &self,
        settings: &GuildSettings,
        updates: &Map<String, Value>,
    ) -> Result<UpdateReport> {
        let mut accepted = Vec::with_capacity(updates.len());
        let mut ignored = Vec::new();

        for (name, value) in updates {
            let Some(field) = self.get(name) else {
                ignored.push(name.clone());
                continue;
            };
            let Some(write) = field.writer() else {
                return Err(CascadeError::field_not_editable(name.as_str()));
            };
            field.kind().check(value).map_err(|actual| {
                CascadeError::type_mismatch(name.as_str(), field.kind().to_string(), actual)
            })?;
            accepted.push((name, write, value));
        }

        let mut updated = settings.clone();
        let mut applied = Vec::with_capacity(accepted.len());
        for (name, write, value) in accepted {
            write(&mut updated, value.clone())?;
            applied.push(name.clone());
        }

        Ok(UpdateReport {
            settings: updated,
            applied,
            ignored,
        })
    }
}
