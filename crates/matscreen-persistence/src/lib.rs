//! matscreen-persistence: checkpoints en disco, log de auditoría, fuentes de
//! datos y exportación CSV para el motor de `matscreen-core`.

pub mod config;
pub mod error;
pub mod export;
pub mod fs;

pub use config::{init_dotenv, StoreConfig};
pub use error::PersistenceError;
pub use export::CsvExporter;
pub use fs::{CsvSource, FileAuditLog, FsCheckpointStore, JsonFileSource, AUDIT_LOG_FILE};
