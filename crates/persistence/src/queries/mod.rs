// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! - `audit` — Audit event retrieval
//! - `minutes` — Minutes documents with their ballots, decisions and roster

pub mod audit;
pub mod minutes;

pub use audit::{get_audit_event, get_audit_events_for_minutes};
pub use minutes::{list_minutes_for_meeting, list_open_minutes, load_minutes};
