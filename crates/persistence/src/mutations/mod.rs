// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! - `audit` — Audit event persistence
//! - `minutes` — Minutes insert and conditional save

pub mod audit;
pub mod minutes;

pub use minutes::{insert_minutes, save_minutes};
