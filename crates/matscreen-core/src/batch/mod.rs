//! Ejecución paralela por lotes.
//!
//! `pool` define el pool de workers (propio o compartido por el proceso) y
//! `executor` el despacho por lotes con hooks de progreso. El orquestador no
//! usa este módulo directamente: lo invocan los steps que necesitan
//! paralelismo.

pub mod executor;
pub mod pool;

pub use executor::{batched, BatchExecutor, BatchHooks, BatchOutcome};
pub use pool::{initialize, is_initialized, shared_pool, PoolGuard, WorkerPool};
