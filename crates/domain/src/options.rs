// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Declared options for choice questions.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// The declared options of a radio, checkbox, or dropdown question.
///
/// Options are stored on disk as a JSON array of strings. This is the one
/// canonical encoding; legacy newline-separated text is not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsList {
    values: Vec<String>,
}

impl OptionsList {
    /// Builds an options list from explicit values.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or any value is blank.
    pub fn from_values(values: Vec<String>) -> Result<Self, DomainError> {
        if values.is_empty() {
            return Err(DomainError::InvalidOptions {
                message: String::from("options list must not be empty"),
            });
        }
        if values.iter().any(|value| value.trim().is_empty()) {
            return Err(DomainError::InvalidOptions {
                message: String::from("options must not be blank"),
            });
        }
        Ok(Self { values })
    }

    /// Parses the canonical on-disk encoding (a JSON array of strings).
    ///
    /// # Errors
    ///
    /// Returns an error if the raw text is not a JSON array of non-empty
    /// strings.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let values: Vec<String> =
            serde_json::from_str(raw).map_err(|e| DomainError::InvalidOptions {
                message: format!("expected a JSON array of strings: {e}"),
            })?;
        Self::from_values(values)
    }

    /// Serializes this list to its canonical on-disk encoding.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.values).unwrap_or_else(|_| String::from("[]"))
    }

    /// Checks membership by exact match.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|option| option == value)
    }

    /// Returns the declared values in order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}
