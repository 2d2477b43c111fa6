//! Declared settings table
//!
//! Every setting reachable by name is declared here once, with its kind, a
//! reader and (only for directly editable settings) a writer. Partial updates
//! consult this table instead of inspecting `GuildSettings` at runtime; a
//! setting without a writer cannot be mutated through it at all.

use crate::locale::Locale;
use crate::settings::GuildSettings;
use cascade_core::{CascadeError, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Shape a setting's value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "members", rename_all = "snake_case")]
pub enum SettingKind {
    /// `true` / `false`
    Boolean,
    /// Any string
    Text,
    /// One of a fixed list of strings
    Enum(&'static [&'static str]),
    /// Array of strings, duplicates collapse
    Set,
    /// Object of string to string
    Map,
}

impl SettingKind {
    /// Check a value against this kind, describing the value on mismatch.
    pub fn check(&self, value: &Value) -> std::result::Result<(), String> {
        let matches = match (self, value) {
            (SettingKind::Boolean, Value::Bool(_)) => true,
            (SettingKind::Text, Value::String(_)) => true,
            (SettingKind::Enum(members), Value::String(s)) => {
                if members.contains(&s.as_str()) {
                    true
                } else {
                    return Err(format!("unknown member \"{s}\""));
                }
            }
            (SettingKind::Set, Value::Array(items)) => items.iter().all(Value::is_string),
            (SettingKind::Map, Value::Object(entries)) => entries.values().all(Value::is_string),
            _ => false,
        };
        if matches {
            Ok(())
        } else {
            Err(describe(value))
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingKind::Boolean => f.write_str("a boolean"),
            SettingKind::Text => f.write_str("a string"),
            SettingKind::Enum(members) => write!(f, "one of [{}]", members.join(", ")),
            SettingKind::Set => f.write_str("an array of strings"),
            SettingKind::Map => f.write_str("an object of strings"),
        }
    }
}

/// Short description of a JSON value for mismatch reports.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string \"{s}\""),
        Value::Array(items) if items.iter().all(Value::is_string) => {
            "array of strings".to_string()
        }
        Value::Array(_) => "array with non-string items".to_string(),
        Value::Object(entries) if entries.values().all(Value::is_string) => {
            "object of strings".to_string()
        }
        Value::Object(_) => "object with non-string values".to_string(),
    }
}

type Reader = fn(&GuildSettings) -> Value;
type Writer = fn(&mut GuildSettings, Value) -> Result<()>;

/// One declared setting.
#[derive(Clone, Copy)]
pub struct SettingField {
    name: &'static str,
    description: &'static str,
    kind: SettingKind,
    read: Reader,
    write: Option<Writer>,
}

impl SettingField {
    /// A setting partial updates may set.
    pub const fn editable(
        name: &'static str,
        description: &'static str,
        kind: SettingKind,
        read: Reader,
        write: Writer,
    ) -> Self {
        Self {
            name,
            description,
            kind,
            read,
            write: Some(write),
        }
    }

    /// A setting only its dedicated operation may change.
    pub const fn read_only(
        name: &'static str,
        description: &'static str,
        kind: SettingKind,
        read: Reader,
    ) -> Self {
        Self {
            name,
            description,
            kind,
            read,
            write: None,
        }
    }

    /// Setting name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Human description.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Declared kind.
    pub fn kind(&self) -> SettingKind {
        self.kind
    }

    /// Whether partial updates may set this setting.
    pub fn is_editable(&self) -> bool {
        self.write.is_some()
    }

    /// Current value.
    pub fn read(&self, settings: &GuildSettings) -> Value {
        (self.read)(settings)
    }

    pub(crate) fn writer(&self) -> Option<Writer> {
        self.write
    }
}

impl fmt::Debug for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("editable", &self.is_editable())
            .finish()
    }
}

/// Public description of a declared setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingInfo {
    /// Setting name
    pub name: &'static str,
    /// Whether partial updates may set it
    pub editable: bool,
    /// Declared kind
    pub kind: SettingKind,
    /// Human description
    pub description: &'static str,
}

/// The table of declared settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsRegistry {
    fields: BTreeMap<&'static str, SettingField>,
}

macro_rules! bool_setting {
    ($field:ident, $description:literal) => {
        SettingField::editable(
            stringify!($field),
            $description,
            SettingKind::Boolean,
            |s| Value::Bool(s.$field),
            |s, v| {
                s.$field = decode(stringify!($field), SettingKind::Boolean, v)?;
                Ok(())
            },
        )
    };
}

static BUILTIN: Lazy<SettingsRegistry> = Lazy::new(SettingsRegistry::with_builtin_fields);

impl SettingsRegistry {
    /// Build a registry from explicit fields. Later duplicates replace earlier ones.
    pub fn new(fields: impl IntoIterator<Item = SettingField>) -> Self {
        Self {
            fields: fields.into_iter().map(|f| (f.name, f)).collect(),
        }
    }

    /// The process-wide table of `GuildSettings` fields, built on first use
    /// and read-only afterwards.
    pub fn builtin() -> &'static SettingsRegistry {
        &BUILTIN
    }

    /// Look up a setting by name.
    pub fn get(&self, name: &str) -> Option<&SettingField> {
        self.fields.get(name)
    }

    /// Declared settings in name order.
    pub fn fields(&self) -> impl Iterator<Item = &SettingField> {
        self.fields.values()
    }

    /// Describe every declared setting.
    pub fn information(&self) -> Vec<SettingInfo> {
        self.fields
            .values()
            .map(|field| SettingInfo {
                name: field.name,
                editable: field.is_editable(),
                kind: field.kind,
                description: field.description,
            })
            .collect()
    }

    /// Current value of every declared setting.
    pub fn values(&self, settings: &GuildSettings) -> BTreeMap<&'static str, Value> {
        self.fields
            .values()
            .map(|field| (field.name, field.read(settings)))
            .collect()
    }

    fn with_builtin_fields() -> Self {
        Self::new([
            SettingField::read_only(
                "prefix",
                "Prefix commands are invoked with",
                SettingKind::Text,
                |s| Value::String(s.prefix.clone()),
            ),
            SettingField::read_only(
                "enabled_modules",
                "Feature modules enabled in this guild",
                SettingKind::Set,
                |s| {
                    let names = s.enabled_modules.iter().map(|m| Value::from(m.name()));
                    Value::Array(names.collect())
                },
            ),
            SettingField::read_only(
                "tags",
                "Custom tags by name",
                SettingKind::Map,
                |s| encode(&s.tags),
            ),
            bool_setting!(mention_prefix, "Allow mentioning the bot instead of the prefix"),
            bool_setting!(delete_command, "Delete the invoking message after a command"),
            bool_setting!(use_embed_for_messages, "Reply with embeds instead of plain text"),
            bool_setting!(show_permission_errors, "Tell members when they lack a permission"),
            bool_setting!(show_module_errors, "Tell members when a module is disabled"),
            bool_setting!(admins_have_all_perms, "Administrators bypass permission checks"),
            SettingField::editable(
                "locale",
                "Language replies are written in",
                SettingKind::Enum(Locale::CODES),
                |s| Value::from(s.locale.code()),
                |s, v| {
                    s.locale = decode("locale", SettingKind::Enum(Locale::CODES), v)?;
                    Ok(())
                },
            ),
            SettingField::editable(
                "disabled_commands",
                "Commands that cannot be used in this guild",
                SettingKind::Set,
                |s| encode(&s.disabled_commands),
                |s, v| {
                    s.disabled_commands = decode("disabled_commands", SettingKind::Set, v)?;
                    Ok(())
                },
            ),
            SettingField::editable(
                "command_aliases",
                "Alternative names mapped to command names",
                SettingKind::Map,
                |s| encode(&s.command_aliases),
                |s, v| {
                    s.command_aliases = decode("command_aliases", SettingKind::Map, v)?;
                    Ok(())
                },
            ),
        ])
    }
}

fn encode<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn decode<T: DeserializeOwned>(field: &str, kind: SettingKind, value: Value) -> Result<T> {
    let actual = describe(&value);
    serde_json::from_value(value)
        .map_err(|_| CascadeError::type_mismatch(field, kind.to_string(), actual))
}
