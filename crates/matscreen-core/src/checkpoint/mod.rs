//! Persistencia de checkpoints, log de auditoría, exportación y fuente de
//! datos inicial. Aquí viven los contratos y las variantes en memoria; las
//! implementaciones en disco están en `matscreen-persistence`.

pub mod audit;
pub mod export;
pub mod source;
pub mod store;

pub use audit::{format_entry, AuditLog, InMemoryAuditLog};
pub use export::ArtifactExporter;
pub use source::{DataSource, StaticSource};
pub use store::{CheckpointStore, InMemoryCheckpointStore};
