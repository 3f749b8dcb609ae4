// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for meeting minutes approval and voting.
//!
//! `MinutesWorkflowService` is the single entry point. It authorizes the
//! caller, consults the meeting directory, applies pure transitions from the
//! core crate and stores them through a `MinutesRepository` with optimistic
//! concurrency. Everything outside the document itself (directory, roles,
//! time, notifications) is reached through traits in `collaborators`.

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

mod auth;
mod capabilities;
mod collaborators;
mod config;
mod error;
mod notifications;
mod request_response;
mod service;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role};
pub use capabilities::compute_minutes_capabilities;
pub use collaborators::{
    Clock, Collaborators, MeetingDirectory, MinutesRepository, NotificationSink, RoleProvider,
    SystemClock,
};
pub use config::WorkflowConfig;
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use notifications::{MinutesEvent, NotificationError};
pub use request_response::{
    AdvanceStatusRequest, AuditEventInfo, AuditTrailResponse, Capability, CastVoteRequest,
    CastVoteResponse, CloseVotingResponse, CreateMinutesRequest, ListMinutesResponse,
    MinutesCapabilities, MinutesResponse, RejectMinutesRequest, SweepResponse,
};
pub use service::MinutesWorkflowService;
