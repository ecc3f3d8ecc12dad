//! Errores del core.
//!
//! Taxonomía:
//! - `BatchError`: fallos del ejecutor por lotes (pool no inicializado, tarea
//!   fallida o con panic).
//! - `StepError`: lo que devuelve el cuerpo de un step.
//! - `StoreError`: contrato de error de las implementaciones de
//!   `CheckpointStore` / `AuditLog`.
//! - `CoreEngineError`: errores del orquestador; ninguno se reintenta.

use thiserror::Error;

/// Error boxeado que una tarea puede devolver al ejecutor.
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("worker pool not initialized")]
    NotInitialized,
    #[error("worker pool already initialized")]
    AlreadyInitialized,
    #[error("batch size must be greater than zero")]
    InvalidBatchSize,
    #[error("could not build worker pool: {0}")]
    PoolBuild(String),
    #[error("task {index} failed: {source}")]
    TaskFailed { index: usize, source: TaskError },
    #[error("task {index} panicked: {message}")]
    TaskPanicked { index: usize, message: String },
    #[error("worker lost before reporting task {index}")]
    WorkerLost { index: usize },
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error("record has no field '{0}'")]
    MissingField(String),
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("io: {0}")]
    Io(String),
    #[error("serialization: {0}")]
    Serialization(String),
}

#[derive(Debug, Error)]
pub enum CoreEngineError {
    #[error("missing artifact {0}")]
    MissingArtifact(String),
    #[error("unknown step '{0}'")]
    UnknownStep(String),
    #[error("duplicate step '{0}' in registry")]
    DuplicateStep(String),
    #[error("step '{step}' failed at position {position}: {source}")]
    StepExecutionFailure { position: usize, step: String, source: StepError },
    #[error("checkpoint store: {0}")]
    Store(#[from] StoreError),
    #[error("data source: {0}")]
    Source(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl CoreEngineError {
    /// Nombre del step que detuvo la cadena, si el error proviene de uno.
    pub fn failed_step(&self) -> Option<&str> {
        match self {
            CoreEngineError::StepExecutionFailure { step, .. } => Some(step),
            _ => None,
        }
    }
}
