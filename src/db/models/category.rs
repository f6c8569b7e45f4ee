//! Category data models.
//!
//! Categories are display metadata only. Tasks carry their category as a
//! plain string, so a task may name a category with no row here and deleting
//! a category leaves its tasks untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CATEGORY_COLOR: &str = "#6200EE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for creating a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: default_color(),
        }
    }

    pub fn with_color(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Validation functions for category data
pub mod validation {
    use crate::error::ValidationError;

    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyCategoryName);
        }
        Ok(())
    }

    /// Accepts `#RRGGBB` or `#RRGGBBAA`.
    pub fn validate_color(color: &str) -> Result<(), ValidationError> {
        let invalid = || ValidationError::InvalidColor(color.to_string());

        let hex_part = color.strip_prefix('#').ok_or_else(invalid)?;
        if hex_part.len() != 6 && hex_part.len() != 8 {
            return Err(invalid());
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        Ok(())
    }

}
