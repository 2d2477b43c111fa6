//! Command prefix validation
//!
//! The first character must be printable and not a space (code point 33 or
//! above); every later character only has to be outside the C0 control range
//! (code point 32 or above), so spaces are allowed after the first character.

use crate::errors::{CascadeError, Result};

/// Lowest code point accepted as the first prefix character.
pub const MIN_LEADING_CODE_POINT: u32 = 33;

/// Lowest code point accepted after the first prefix character.
pub const MIN_TRAILING_CODE_POINT: u32 = 32;

/// Validate a candidate command prefix.
pub fn validate_prefix(candidate: &str) -> Result<()> {
    let mut chars = candidate.chars();
    let Some(first) = chars.next() else {
        return Err(CascadeError::invalid_prefix("prefix cannot be empty"));
    };

    if u32::from(first) < MIN_LEADING_CODE_POINT {
        return Err(CascadeError::invalid_prefix(format!(
            "prefix cannot start with whitespace or control character U+{:04X}",
            u32::from(first)
        )));
    }

    for (position, c) in chars.enumerate() {
        if u32::from(c) < MIN_TRAILING_CODE_POINT {
            return Err(CascadeError::invalid_prefix(format!(
                "control character U+{:04X} at position {}",
                u32::from(c),
                position + 1
            )));
        }
    }

    Ok(())
}
