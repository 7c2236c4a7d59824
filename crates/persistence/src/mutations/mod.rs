// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing mutation modules.
//!
//! Most mutations use Diesel DSL; the only backend-specific helper is
//! `get_last_insert_rowid` from the `connection` module, needed because
//! `SQLite` does not support `RETURNING` in all contexts.
//!
//! ## Module Organization
//!
//! - `answers` — Answer upserts and deletions
//! - `config` — System configuration mutations
//! - `supervisor` — Supervisor token issuance, redemption, and answers
//! - `surveys` — Survey, section, question, branch, and overlay mutations
//! - `units` — Faculty, department, program study, and period mutations
//! - `users` — User, role, and session mutations

pub mod answers;
pub mod config;
pub mod supervisor;
pub mod surveys;
pub mod units;
pub mod users;
