//! Custom tags

use serde::{Deserialize, Serialize};

/// Category given to tags created without one.
pub const DEFAULT_TAG_CATEGORY: &str = "tag";

/// A named snippet of text members can recall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Text the tag expands to
    pub content: String,
    /// Free-form grouping
    #[serde(default = "default_category")]
    pub category: String,
}

impl Tag {
    /// Tag in the default category.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            category: default_category(),
        }
    }

    /// Tag in an explicit category.
    pub fn with_category(content: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            category: category.into(),
        }
    }
}

fn default_category() -> String {
    DEFAULT_TAG_CATEGORY.to_string()
}
