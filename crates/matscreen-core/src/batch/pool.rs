//! Pool de workers compartido a nivel de proceso.
//!
//! Ciclo de vida explícito:
//! - `initialize(workers)` crea el pool compartido y devuelve un `PoolGuard`.
//!   Debe llamarse una vez al inicio del programa.
//! - Mientras el guard vive, `shared_pool()` entrega el handle.
//! - Al soltar el guard (o `PoolGuard::shutdown`) el pool se desmonta una
//!   única vez. Usar el pool antes de inicializarlo o después de soltar el
//!   guard es un error de programación (`BatchError::NotInitialized`).
//!
//! No hay creación perezosa implícita: nadie crea el pool "por las dudas".

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info};
use once_cell::sync::Lazy;

use crate::errors::BatchError;

/// Handle propio sobre un pool rayon de tamaño fijo.
#[derive(Debug)]
pub struct WorkerPool {
    inner: rayon::ThreadPool,
}

impl WorkerPool {
    /// Construye un pool independiente. `workers = 0` usa un worker por CPU.
    pub fn new(workers: usize) -> Result<Self, BatchError> {
        let inner = rayon::ThreadPoolBuilder::new().num_threads(workers)
                                                   .thread_name(|i| format!("matscreen-worker-{i}"))
                                                   .build()
                                                   .map_err(|e| BatchError::PoolBuild(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn workers(&self) -> usize {
        self.inner.current_num_threads()
    }

    /// Lanza una tarea desacoplada del llamador.
    pub(crate) fn spawn<F>(&self, task: F)
        where F: FnOnce() + Send + 'static
    {
        self.inner.spawn(task);
    }
}

static SHARED_POOL: Lazy<RwLock<Option<Arc<WorkerPool>>>> = Lazy::new(|| RwLock::new(None));

/// Inicializa el pool compartido del proceso.
pub fn initialize(workers: usize) -> Result<PoolGuard, BatchError> {
    let mut slot = SHARED_POOL.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(BatchError::AlreadyInitialized);
    }
    let pool = WorkerPool::new(workers)?;
    info!("worker pool initialized workers={}", pool.workers());
    *slot = Some(Arc::new(pool));
    Ok(PoolGuard { released: false })
}

/// Handle del pool compartido; `NotInitialized` si no existe.
pub fn shared_pool() -> Result<Arc<WorkerPool>, BatchError> {
    SHARED_POOL.read()
               .unwrap_or_else(PoisonError::into_inner)
               .as_ref()
               .cloned()
               .ok_or(BatchError::NotInitialized)
}

pub fn is_initialized() -> bool {
    SHARED_POOL.read().unwrap_or_else(PoisonError::into_inner).is_some()
}

/// Guard del pool compartido. Al soltarse, desmonta el pool.
#[must_use = "dropping the guard shuts the shared worker pool down"]
#[derive(Debug)]
pub struct PoolGuard {
    released: bool,
}

impl PoolGuard {
    /// Desmonta el pool de forma explícita.
    pub fn shutdown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        let taken = SHARED_POOL.write().unwrap_or_else(PoisonError::into_inner).take();
        match taken {
            // Los handles clonados que sigan vivos mantienen los hilos hasta soltarse.
            Some(pool) => debug!("worker pool released workers={} outstanding_handles={}",
                                 pool.workers(),
                                 Arc::strong_count(&pool) - 1),
            None => debug!("worker pool already released"),
        }
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        self.release();
    }
}
