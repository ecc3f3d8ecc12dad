//! Modelos neutrales (Record, RecordCollection, ArtifactId, PerRecordFailure).

pub mod artifact;
pub mod failure;
pub mod record;

pub use artifact::ArtifactId;
pub use failure::PerRecordFailure;
pub use record::{Record, RecordCollection};
