//! Client-side submission gate
//!
//! A stateful accumulator over user-selected files: deduplicates
//! re-selections, enforces the project's capacity ceiling, runs extraction
//! and rule evaluation per accepted file, and builds submission payloads
//! from the hard-passing subset. This is the pre-check side of the gating
//! protocol; the server re-validates everything authoritatively.

mod gate;

pub use gate::{
    BatchOutcome, GateCommand, GateEvent, Identity, PendingFile, SelectedFile, SubmissionGate,
};
