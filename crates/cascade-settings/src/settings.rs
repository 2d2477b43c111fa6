//! Guild settings aggregate
//!
//! One `GuildSettings` exists per guild. The prefix, the enabled module set
//! and the tag map are only changed through the dedicated mutators here, each
//! of which carries its own validation. The remaining fields are changed
//! through the declared settings table (see [`crate::fields`]).

use crate::locale::Locale;
use crate::module::Module;
use crate::tag::Tag;
use cascade_core::{validate_prefix, CascadeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Per-guild configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub(crate) prefix: String,
    pub(crate) enabled_modules: BTreeSet<Module>,
    pub(crate) tags: BTreeMap<String, Tag>,
    pub(crate) mention_prefix: bool,
    pub(crate) delete_command: bool,
    pub(crate) use_embed_for_messages: bool,
    pub(crate) show_permission_errors: bool,
    pub(crate) show_module_errors: bool,
    pub(crate) admins_have_all_perms: bool,
    pub(crate) locale: Locale,
    pub(crate) disabled_commands: BTreeSet<String>,
    pub(crate) command_aliases: BTreeMap<String, String>,
}

impl GuildSettings {
    /// Settings for a newly seen guild: every module enabled, no tags.
    ///
    /// The prefix is validated like any other prefix change.
    pub fn new(prefix: &str) -> Result<Self> {
        validate_prefix(prefix)?;
        Ok(Self {
            prefix: prefix.to_string(),
            enabled_modules: Module::ALL.into_iter().collect(),
            tags: BTreeMap::new(),
            mention_prefix: false,
            delete_command: false,
            use_embed_for_messages: true,
            show_permission_errors: true,
            show_module_errors: false,
            admins_have_all_perms: true,
            locale: Locale::default(),
            disabled_commands: BTreeSet::new(),
            command_aliases: BTreeMap::new(),
        })
    }

    /// Current command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Replace the prefix after validating it.
    pub fn set_prefix(&mut self, prefix: &str) -> Result<()> {
        validate_prefix(prefix)?;
        self.prefix = prefix.to_string();
        Ok(())
    }

    /// Enabled modules.
    pub fn enabled_modules(&self) -> &BTreeSet<Module> {
        &self.enabled_modules
    }

    /// Check if a module is enabled. Required modules always are.
    pub fn is_module_enabled(&self, module: Module) -> bool {
        module.is_required() || self.enabled_modules.contains(&module)
    }

    /// Enable a module. Returns whether the set changed.
    pub fn enable_module(&mut self, module: Module) -> bool {
        self.enabled_modules.insert(module)
    }

    /// Disable a module. Returns whether the set changed.
    ///
    /// # Errors
    /// `InvalidArgument` for required modules.
    pub fn disable_module(&mut self, module: Module) -> Result<bool> {
        if module.is_required() {
            return Err(CascadeError::invalid_argument(format!(
                "module `{module}` is required and cannot be disabled"
            )));
        }
        Ok(self.enabled_modules.remove(&module))
    }

    /// All tags by name.
    pub fn tags(&self) -> &BTreeMap<String, Tag> {
        &self.tags
    }

    /// Look up a tag. Names are case-sensitive.
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.get(name)
    }

    /// Insert or overwrite a tag, returning the previous one.
    pub fn add_tag(&mut self, name: &str, tag: Tag) -> Result<Option<Tag>> {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(CascadeError::invalid_argument(format!(
                "tag name `{name}` must be a single non-empty word"
            )));
        }
        Ok(self.tags.insert(name.to_string(), tag))
    }

    /// Remove a tag, returning it if it existed.
    pub fn remove_tag(&mut self, name: &str) -> Option<Tag> {
        self.tags.remove(name)
    }

    /// Whether the prefix can also be a mention of the bot.
    pub fn mention_prefix(&self) -> bool {
        self.mention_prefix
    }

    /// Whether invoking messages are deleted.
    pub fn delete_command(&self) -> bool {
        self.delete_command
    }

    /// Whether replies use embeds.
    pub fn use_embed_for_messages(&self) -> bool {
        self.use_embed_for_messages
    }

    /// Whether permission failures are reported to the member.
    pub fn show_permission_errors(&self) -> bool {
        self.show_permission_errors
    }

    /// Whether disabled-module failures are reported to the member.
    pub fn show_module_errors(&self) -> bool {
        self.show_module_errors
    }

    /// Whether administrators bypass permission checks.
    pub fn admins_have_all_perms(&self) -> bool {
        self.admins_have_all_perms
    }

    /// Reply language.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Commands disabled in this guild.
    pub fn disabled_commands(&self) -> &BTreeSet<String> {
        &self.disabled_commands
    }

    /// Alias to command name.
    pub fn command_aliases(&self) -> &BTreeMap<String, String> {
        &self.command_aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn settings() -> GuildSettings {
        GuildSettings::new(";").unwrap()
    }

    #[test]
    fn test_new_guild_has_every_module() {
        let settings = settings();
        for module in Module::ALL {
            assert!(settings.is_module_enabled(module));
        }
        assert!(settings.tags().is_empty());
    }

    #[test]
    fn test_invalid_default_prefix_rejected() {
        assert_matches!(GuildSettings::new(""), Err(CascadeError::InvalidPrefix { .. }));
    }

    #[test]
    fn test_enable_disable_idempotent() {
        let mut settings = settings();
        assert!(settings.disable_module(Module::Fun).unwrap());
        assert!(!settings.disable_module(Module::Fun).unwrap());
        assert!(!settings.is_module_enabled(Module::Fun));

        assert!(settings.enable_module(Module::Fun));
        assert!(!settings.enable_module(Module::Fun));
        assert!(settings.is_module_enabled(Module::Fun));
    }

    #[test]
    fn test_core_cannot_be_disabled() {
        let mut settings = settings();
        assert_matches!(
            settings.disable_module(Module::Core),
            Err(CascadeError::InvalidArgument { .. })
        );
        assert!(settings.enabled_modules().contains(&Module::Core));
    }

    #[test]
    fn test_set_prefix_validates() {
        let mut settings = settings();
        assert!(settings.set_prefix(" ?").is_err());
        assert_eq!(settings.prefix(), ";");
        settings.set_prefix("!").unwrap();
        assert_eq!(settings.prefix(), "!");
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let mut settings = settings();
        settings.add_tag("Rules", Tag::new("be nice")).unwrap();
        settings.add_tag("rules", Tag::new("be kind")).unwrap();
        assert_eq!(settings.tags().len(), 2);
        assert_eq!(settings.tag("Rules").unwrap().content, "be nice");

        let previous = settings.add_tag("rules", Tag::new("be excellent")).unwrap();
        assert_eq!(previous.unwrap().content, "be kind");
        assert!(settings.remove_tag("RULES").is_none());
        assert!(settings.add_tag("two words", Tag::new("x")).is_err());
    }
}
