//! Identifier newtypes
//!
//! Guilds, members and roles are all addressed by 64-bit snowflake ids in the
//! upstream chat platform. Wrapping them keeps a member id from ever being
//! passed where a guild id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw snowflake value.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// The raw snowflake value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self)
            }
        }
    };
}

snowflake_id!(
    /// Identifier of a guild (the tenant every setting and resource is scoped to).
    GuildId
);

snowflake_id!(
    /// Identifier of a guild member, the acting principal of an invocation.
    MemberId
);

snowflake_id!(
    /// Identifier of a role within a guild.
    RoleId
);
