// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation of conditional branch declarations.

use crate::error::DomainError;
use crate::options::OptionsList;
use crate::types::QuestionKind;

/// Validates that a branch may be declared on a question.
///
/// Branches hang off radio questions only, and the trigger value must be one
/// of the parent question's declared options.
///
/// # Errors
///
/// Returns an error if the parent question is not a radio question or the
/// trigger value is not among its options.
pub fn validate_branch(
    kind: QuestionKind,
    options: Option<&OptionsList>,
    trigger_value: &str,
) -> Result<(), DomainError> {
    if kind != QuestionKind::Radio {
        return Err(DomainError::BranchOnNonRadio {
            kind: kind.as_str(),
        });
    }
    let options: &OptionsList = options.ok_or_else(|| DomainError::InvalidOptions {
        message: String::from("question has no declared options"),
    })?;
    if options.contains(trigger_value) {
        Ok(())
    } else {
        Err(DomainError::BranchValueNotInOptions {
            value: trigger_value.to_string(),
        })
    }
}
