//! Core guild commands: prefix, modules and settings

use super::{arg, rest, CommandReply, GuildCommand};
use crate::gate::GuildContext;
use async_trait::async_trait;
use cascade_core::{permissions, CascadeError, Permission, Result};
use cascade_settings::{Module, SettingKind, SettingsRegistry};
use serde_json::{Map, Value};

/// `prefix [new]`: show the prefix, or change it with `prefix.set`.
pub struct PrefixCommand;

#[async_trait]
impl GuildCommand for PrefixCommand {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn usage(&self) -> &'static str {
        "prefix [new prefix]"
    }

    fn module(&self) -> Module {
        Module::Core
    }

    fn permission(&self) -> Permission {
        permissions::PREFIX_VIEW
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        if args.is_empty() {
            let data = ctx.snapshot().await?;
            return Ok(CommandReply::text(format!(
                "The current prefix is `{}`",
                data.settings.prefix()
            )));
        }

        // spaces are allowed after the first character
        let new_prefix = rest(args, 0, "prefix")?;
        ctx.require(&permissions::PREFIX_SET)?;
        let mut tx = ctx.begin().await?;
        tx.data_mut().settings.set_prefix(&new_prefix)?;
        tx.commit().await?;
        Ok(CommandReply::text(format!("Prefix set to `{new_prefix}`")))
    }
}

/// `module enable <module>` / `module disable <module>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleCommand {
    /// Switch a module on
    Enable,
    /// Switch a module off
    Disable,
}

#[async_trait]
impl GuildCommand for ModuleCommand {
    fn name(&self) -> &'static str {
        match self {
            ModuleCommand::Enable => "module enable",
            ModuleCommand::Disable => "module disable",
        }
    }

    fn usage(&self) -> &'static str {
        match self {
            ModuleCommand::Enable => "module enable <module>",
            ModuleCommand::Disable => "module disable <module>",
        }
    }

    fn module(&self) -> Module {
        Module::Core
    }

    fn permission(&self) -> Permission {
        match self {
            ModuleCommand::Enable => permissions::MODULE_ENABLE,
            ModuleCommand::Disable => permissions::MODULE_DISABLE,
        }
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let module: Module = arg(args, 0, "module")?.parse()?;
        let mut tx = ctx.begin().await?;
        let settings = &mut tx.data_mut().settings;
        let changed = match self {
            ModuleCommand::Enable => settings.enable_module(module),
            ModuleCommand::Disable => settings.disable_module(module)?,
        };
        tx.commit().await?;

        let state = match self {
            ModuleCommand::Enable => "enabled",
            ModuleCommand::Disable => "disabled",
        };
        Ok(CommandReply::text(if changed {
            format!("The {module} module is now {state}")
        } else {
            format!("The {module} module was already {state}")
        }))
    }
}

/// `module list`
pub struct ModuleListCommand;

#[async_trait]
impl GuildCommand for ModuleListCommand {
    fn name(&self) -> &'static str {
        "module list"
    }

    fn usage(&self) -> &'static str {
        "module list"
    }

    fn module(&self) -> Module {
        Module::Core
    }

    fn permission(&self) -> Permission {
        permissions::MODULE_LIST
    }

    async fn execute(&self, ctx: &GuildContext, _args: &[String]) -> Result<CommandReply> {
        let settings = ctx.snapshot().await?.settings;
        let lines = Module::ALL
            .into_iter()
            .map(|module| {
                let state = if settings.is_module_enabled(module) {
                    "enabled"
                } else {
                    "disabled"
                };
                format!("{module}: {state}")
            })
            .collect();
        Ok(CommandReply::paged("Modules", lines, ctx.page_size(), "No modules"))
    }
}

/// `settings set <field> <value>`: a single-field partial update.
pub struct SettingsSetCommand;

#[async_trait]
impl GuildCommand for SettingsSetCommand {
    fn name(&self) -> &'static str {
        "settings set"
    }

    fn usage(&self) -> &'static str {
        "settings set <setting> <value>"
    }

    fn module(&self) -> Module {
        Module::Core
    }

    fn permission(&self) -> Permission {
        permissions::SETTINGS_EDIT
    }

    async fn execute(&self, ctx: &GuildContext, args: &[String]) -> Result<CommandReply> {
        let registry = SettingsRegistry::builtin();
        let name = arg(args, 0, "setting")?;
        let field = registry
            .get(name)
            .ok_or_else(|| CascadeError::not_found("setting", name))?;
        let raw = rest(args, 1, "value")?;

        let mut updates = Map::new();
        updates.insert(name.to_string(), coerce(name, field.kind(), &raw)?);

        let mut tx = ctx.begin().await?;
        let report = registry.apply(&tx.data().settings, &updates)?;
        let value = field.read(&report.settings);
        tx.data_mut().settings = report.settings;
        tx.commit().await?;
        Ok(CommandReply::text(format!("`{name}` set to {value}")))
    }
}

/// Turn chat text into a value of the declared kind.
fn coerce(name: &str, kind: SettingKind, raw: &str) -> Result<Value> {
    let raw = raw.trim();
    match kind {
        SettingKind::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "enable" | "enabled" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "disable" | "disabled" => Ok(Value::Bool(false)),
            _ => Err(CascadeError::type_mismatch(
                name,
                kind.to_string(),
                format!("\"{raw}\""),
            )),
        },
        SettingKind::Text | SettingKind::Enum(_) => Ok(Value::String(raw.to_string())),
        SettingKind::Set => Ok(Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(Value::from)
                .collect(),
        )),
        SettingKind::Map => Err(CascadeError::invalid_argument(format!(
            "`{name}` is a mapping and cannot be set from chat"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_coerce_booleans() {
        assert_eq!(coerce("x", SettingKind::Boolean, "Yes").unwrap(), json!(true));
        assert_eq!(coerce("x", SettingKind::Boolean, "off").unwrap(), json!(false));
        assert_matches!(
            coerce("x", SettingKind::Boolean, "maybe"),
            Err(CascadeError::TypeMismatch { .. })
        );
    }

    #[test]
    fn test_coerce_sets_and_maps() {
        assert_eq!(
            coerce("x", SettingKind::Set, "ping, 8ball,,").unwrap(),
            json!(["ping", "8ball"])
        );
        assert_matches!(
            coerce("x", SettingKind::Map, "a=b"),
            Err(CascadeError::InvalidArgument { .. })
        );
    }
}
