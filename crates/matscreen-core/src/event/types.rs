//! Tipos de evento de la cadena y estructura `ChainEvent`.
//!
//! Cada `run` del `ChainEngine` emite eventos a un `EventStore` append-only.
//! No se usan para decidir qué ejecutar (eso lo decide la existencia de
//! checkpoints); sirven para observar qué hizo una ejecución concreta.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChainEventKind {
    /// Primer evento de cada ejecución: fija el hash de la definición.
    ChainInitialized { chain_id: String, definition_hash: String, step_count: usize },
    /// El dataset inicial se cargó desde la fuente y se persistió.
    SourceLoaded { artifact: String, count: usize },
    /// El artifact destino ya existía; el step no corre.
    StepSkipped { position: usize, step: String, artifact: String },
    StepStarted { position: usize, step: String, input: String },
    StepFinished {
        position: usize,
        step: String,
        artifact: String,
        previous_count: usize,
        count: usize,
        /// Sólo si el motor se construyó con `hash_artifacts(true)`.
        artifact_hash: Option<String>,
    },
    ProblemRecordsStored { position: usize, step: String, artifact: String, count: usize },
    /// El step devolvió error; la cadena se detiene.
    StepFailed { position: usize, step: String, error: String },
    ChainCompleted { executed: usize, skipped: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainEvent {
    pub seq: u64, // asignado por el store (orden append)
    pub run_id: Uuid,
    pub kind: ChainEventKind,
    pub ts: DateTime<Utc>,
}
