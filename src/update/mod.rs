//! Update orchestration

pub mod updater;

pub use updater::{old_artifact_path, ApplyOutcome, CheckOutcome, Updater};
