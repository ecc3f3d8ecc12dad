//! matscreen-core: motor de cadenas de filtros con checkpoints y ejecutor
//! paralelo por lotes.
pub mod batch;
pub mod checkpoint;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod step;

pub use batch::{batched, BatchExecutor, BatchHooks, BatchOutcome, PoolGuard, WorkerPool};
pub use checkpoint::{ArtifactExporter, AuditLog, CheckpointStore, DataSource, InMemoryAuditLog,
                     InMemoryCheckpointStore, StaticSource};
pub use engine::{ChainDefinition, ChainEngine, ChainEngineBuilder, ChainReport, PositionOutcome};
pub use errors::{BatchError, CoreEngineError, StepError, StoreError, TaskError};
pub use event::{ChainEvent, ChainEventKind, EventStore, InMemoryEventStore};
pub use model::{ArtifactId, PerRecordFailure, Record, RecordCollection};
pub use step::{BatchMapStep, FnStep, PredicateFilter, ProgressTicker, Step, StepContext, StepKind, StepOutput,
               StepRegistry};
