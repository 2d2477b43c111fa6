//! Feature modules a guild can switch on and off

use cascade_core::{CascadeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A feature module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Module {
    /// Core commands; cannot be disabled
    Core,
    /// Guild management
    Management,
    /// Informational commands
    Informational,
    /// Fun commands
    Fun,
    /// Music playback and playlists
    Music,
    /// Moderation tools
    Moderation,
    /// Useful utilities such as todo lists
    Useful,
}

impl Module {
    /// Every module, in declaration order.
    pub const ALL: [Module; 7] = [
        Module::Core,
        Module::Management,
        Module::Informational,
        Module::Fun,
        Module::Music,
        Module::Moderation,
        Module::Useful,
    ];

    /// Required modules are always enabled.
    pub fn is_required(self) -> bool {
        matches!(self, Module::Core)
    }

    /// Lowercase name used in chat.
    pub fn name(self) -> &'static str {
        match self {
            Module::Core => "core",
            Module::Management => "management",
            Module::Informational => "informational",
            Module::Fun => "fun",
            Module::Music => "music",
            Module::Moderation => "moderation",
            Module::Useful => "useful",
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Module {
    type Err = CascadeError;

    fn from_str(s: &str) -> Result<Self> {
        Module::ALL
            .into_iter()
            .find(|module| module.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CascadeError::invalid_argument(format!("unknown module `{s}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("MUSIC".parse::<Module>().unwrap(), Module::Music);
        assert_eq!(" useful ".parse::<Module>().unwrap(), Module::Useful);
        assert!("karaoke".parse::<Module>().is_err());
    }

    #[test]
    fn test_only_core_is_required() {
        let required: Vec<_> = Module::ALL.into_iter().filter(|m| m.is_required()).collect();
        assert_eq!(required, vec![Module::Core]);
    }
}
