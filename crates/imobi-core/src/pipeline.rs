//! Transform lifecycle states.
//!
//! ```text
//! IDLE → READING → SCANNED → RESOLVED → CLASSIFIED → GROUPED → EMITTING → DONE
//!          │          │                                           │
//!          └→ HEADER_ERROR  └→ COLUMN_ERROR                        └→ EMIT_ERROR
//! ```
//!
//! Parameter, filter and internal failures outside emission end in `FAILED`.
use std::fmt;

use serde::Serialize;

use crate::error::TransformError;

/// A state of the per-transform state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineState {
    /// Nothing accepted yet.
    Idle,
    /// Input accepted, being read.
    Reading,
    /// Header row and carrier located.
    Scanned,
    /// Concepts bound to headers.
    Resolved,
    /// Records built with their stage and block carriers.
    Classified,
    /// Records grouped and ordered.
    Grouped,
    /// Output being written.
    Emitting,
    /// Output complete.
    Done,
    /// Input unreadable, header or carrier not found.
    HeaderError,
    /// A required column did not resolve.
    ColumnError,
    /// Output could not be produced.
    EmitError,
    /// Rejected parameters, empty filter result or an internal failure.
    Failed,
}

impl PipelineState {
    /// Returns `true` for states a transform cannot leave.
    pub fn is_terminal(self) -> bool {
        match self {
            Self::Done | Self::HeaderError | Self::ColumnError | Self::EmitError | Self::Failed => {
                true
            }
            Self::Idle
            | Self::Reading
            | Self::Scanned
            | Self::Resolved
            | Self::Classified
            | Self::Grouped
            | Self::Emitting => false,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "IDLE",
            Self::Reading => "READING",
            Self::Scanned => "SCANNED",
            Self::Resolved => "RESOLVED",
            Self::Classified => "CLASSIFIED",
            Self::Grouped => "GROUPED",
            Self::Emitting => "EMITTING",
            Self::Done => "DONE",
            Self::HeaderError => "HEADER_ERROR",
            Self::ColumnError => "COLUMN_ERROR",
            Self::EmitError => "EMIT_ERROR",
            Self::Failed => "FAILED",
        })
    }
}

/// Tracks the current state of one transform and logs each transition.
#[derive(Debug)]
pub struct StateTracker {
    transform: &'static str,
    state: PipelineState,
}

impl StateTracker {
    /// Starts a tracker in [`PipelineState::Idle`].
    pub fn new(transform: &'static str) -> Self {
        Self {
            transform,
            state: PipelineState::Idle,
        }
    }

    /// The current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Moves to `next`.
    pub fn advance(&mut self, next: PipelineState) {
        tracing::debug!(
            transform = self.transform,
            from = %self.state,
            to = %next,
            "pipeline transition"
        );
        self.state = next;
    }

    /// Moves to the error state matching `err` and hands the error back.
    pub fn fail(&mut self, err: TransformError) -> TransformError {
        let next = err.failed_state(self.state);
        tracing::debug!(
            transform = self.transform,
            from = %self.state,
            to = %next,
            kind = %err.kind(),
            "pipeline failed"
        );
        self.state = next;
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_walks_to_done() {
        let mut t = StateTracker::new("price-table");
        for s in [
            PipelineState::Reading,
            PipelineState::Scanned,
            PipelineState::Resolved,
            PipelineState::Classified,
            PipelineState::Grouped,
            PipelineState::Emitting,
            PipelineState::Done,
        ] {
            assert!(!t.state().is_terminal());
            t.advance(s);
        }
        assert!(t.state().is_terminal());
    }

    #[test]
    fn tracker_fail_uses_current_state() {
        let mut t = StateTracker::new("price-table");
        t.advance(PipelineState::Reading);
        t.advance(PipelineState::Scanned);
        let err = t.fail(TransformError::ColumnNotFound {
            concept: crate::concept::ColumnConcept::Value,
            available: Vec::new(),
        });
        assert_eq!(t.state(), PipelineState::ColumnError);
        assert_eq!(err.kind(), crate::error::ErrorKind::ColumnNotFound);
    }
}
