//! Model (product line) identity and checklist section vocabulary.
//!
//! A model is the tenant boundary: every node and every checklist entry
//! belongs to exactly one model. The code is the canonical identifier;
//! store and cache APIs take it as a required, typed parameter, so an
//! unscoped call cannot be expressed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a model code.
pub const MAX_MODEL_CODE_LEN: usize = 32;

/// Maximum length of a checklist section name.
pub const MAX_SECTION_LEN: usize = 64;

/// Sections applied to a model registered without an explicit section list.
pub const DEFAULT_SECTIONS: &[&str] = &["design", "machining", "assembly", "inspection"];

/// Validated product-line code, e.g. `hp-200`.
///
/// Codes are 1-32 characters of lowercase ASCII letters, digits, and
/// dashes, and must start with a letter or digit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelCode(String);

impl ModelCode {
    /// Parse and validate a model code.
    pub fn parse(code: &str) -> Result<Self> {
        if code.is_empty() {
            return Err(Error::InvalidModelCode("code must not be empty".to_string()));
        }
        if code.len() > MAX_MODEL_CODE_LEN {
            return Err(Error::InvalidModelCode(format!(
                "code exceeds {MAX_MODEL_CODE_LEN} characters"
            )));
        }
        if !code
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(Error::InvalidModelCode(format!(
                "'{code}' must start with a lowercase letter or digit"
            )));
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(Error::InvalidModelCode(format!(
                "'{code}' may contain only lowercase letters, digits, and dashes"
            )));
        }
        Ok(Self(code.to_string()))
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ModelCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ModelCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ModelCode> for String {
    fn from(code: ModelCode) -> Self {
        code.0
    }
}

/// Validate a checklist section name for a model's configuration.
///
/// Section names are display strings matched exactly; they must be
/// non-blank and bounded in length.
pub fn validate_section_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidSection("section name must not be blank".to_string()));
    }
    if name.len() > MAX_SECTION_LEN {
        return Err(Error::InvalidSection(format!(
            "section name exceeds {MAX_SECTION_LEN} characters"
        )));
    }
    Ok(())
}
