// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query modules.
//!
//! All queries use Diesel DSL against the `SQLite` backend and return the
//! plain data structs from `data_models`.
//!
//! ## Module Organization
//!
//! - `answers` — Answer lookups, scoped listings, and reminder counts
//! - `config` — System configuration lookups
//! - `supervisor` — Supervisor token and answer lookups
//! - `surveys` — Survey, section, question, branch, and overlay lookups
//! - `units` — Faculty, department, program study, and period lookups
//! - `users` — User, role, and session lookups

pub mod answers;
pub mod config;
pub mod supervisor;
pub mod surveys;
pub mod units;
pub mod users;
