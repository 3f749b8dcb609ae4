// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for meeting minutes voting.
//!
//! This crate stores minutes documents, their ballots, decisions and voter
//! roster, and the audit log, in `SQLite` through Diesel.
//!
//! ## Concurrency
//!
//! Documents carry a `version`. `save_minutes` is a conditional write: it
//! succeeds only when the stored version still equals the version the caller
//! read, and bumps it. A lost race surfaces as
//! `PersistenceError::VersionConflict` and nothing is written.
//!
//! A partial unique index allows at most one open round per meeting, so two
//! concurrent creations cannot both succeed.
//!
//! ## Testing
//!
//! - `new_in_memory()` gives every caller its own shared-cache in-memory database
//! - Migrations are embedded and run on every connection

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use minutes_vote_audit::AuditEvent;
use minutes_vote_domain::{MeetingId, MinutesDocument, MinutesId};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod connection;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for minutes documents and audit events.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:minutes_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = connection::initialize_database(&shared_memory_url)?;
        connection::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = connection::initialize_database(path_str)?;
        connection::enable_wal_mode(&mut conn)?;
        connection::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        connection::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Minutes Mutations
    // ========================================================================

    /// Inserts a new minutes document together with its creation audit event.
    ///
    /// # Returns
    ///
    /// The stored document with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::OpenRoundExists` if the meeting already has
    /// an open round, or another error if the write fails.
    pub fn insert_minutes(
        &mut self,
        document: &MinutesDocument,
        creation_event: &AuditEvent,
    ) -> Result<MinutesDocument, PersistenceError> {
        mutations::insert_minutes(&mut self.conn, document, creation_event)
    }

    /// Conditionally saves a changed document together with its audit event.
    ///
    /// # Arguments
    ///
    /// * `document` - The changed document
    /// * `expected_version` - The version the caller read
    /// * `audit_event` - The audit event describing the change
    ///
    /// # Returns
    ///
    /// The stored document carrying its new version.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::VersionConflict` if another writer saved
    /// first, or another error if the write fails.
    pub fn save_minutes(
        &mut self,
        document: &MinutesDocument,
        expected_version: i64,
        audit_event: &AuditEvent,
    ) -> Result<MinutesDocument, PersistenceError> {
        mutations::save_minutes(&mut self.conn, document, expected_version, audit_event)
    }

    // ========================================================================
    // Minutes Queries
    // ========================================================================

    /// Loads a minutes document.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::MinutesNotFound` if the document does not exist.
    pub fn load_minutes(
        &mut self,
        minutes_id: MinutesId,
    ) -> Result<MinutesDocument, PersistenceError> {
        queries::load_minutes(&mut self.conn, minutes_id.value())
    }

    /// Lists every round recorded for a meeting, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_minutes_for_meeting(
        &mut self,
        meeting_id: MeetingId,
    ) -> Result<Vec<MinutesDocument>, PersistenceError> {
        queries::list_minutes_for_meeting(&mut self.conn, meeting_id.value())
    }

    /// Lists documents that are not closed and not terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_open_minutes(&mut self) -> Result<Vec<MinutesDocument>, PersistenceError> {
        queries::list_open_minutes(&mut self.conn)
    }

    // ========================================================================
    // Audit Event Queries
    // ========================================================================

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is not found or cannot be deserialized.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::get_audit_event(&mut self.conn, event_id)
    }

    /// Retrieves the audit trail of a minutes document, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the events cannot be retrieved or deserialized.
    pub fn get_audit_events_for_minutes(
        &mut self,
        minutes_id: MinutesId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::get_audit_events_for_minutes(&mut self.conn, minutes_id.value())
    }
}
