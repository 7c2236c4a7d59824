// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Domain types and rule validation for the Tracer Study Platform.
//!
//! This crate is pure: no I/O, no database, no HTTP. It defines the closed
//! role taxonomy, survey and question kinds, the alumni progression marker,
//! option lists, and the type-aware answer validation rules. Everything that
//! touches a database or a socket lives in the persistence and server crates.

mod answer;
mod branch;
mod error;
mod options;
mod types;

pub use answer::{AnswerPayload, decode_answer, validate_answer};
pub use branch::validate_branch;
pub use error::DomainError;
pub use options::OptionsList;
pub use types::{AnswerTarget, QuestionKind, RoleKind, SurveyKind, SurveyProgress};

#[cfg(test)]
mod tests;
