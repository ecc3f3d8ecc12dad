//! Implementaciones en disco: checkpoints JSON, log de auditoría y fuentes.

pub(crate) mod atomic;
pub mod audit;
pub mod source;
pub mod store;

pub use audit::{FileAuditLog, AUDIT_LOG_FILE};
pub use source::{CsvSource, JsonFileSource};
pub use store::FsCheckpointStore;
