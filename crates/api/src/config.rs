// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

/// Service-level workflow settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Voting window applied when minutes are created without a deadline.
    pub default_vote_window: Duration,
    /// How many times a write is attempted before giving up on a contended document.
    pub max_write_attempts: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_vote_window: Duration::hours(24),
            max_write_attempts: 5,
        }
    }
}
