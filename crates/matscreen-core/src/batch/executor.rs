//! Ejecutor por lotes sobre el pool de workers.
//!
//! `BatchExecutor::run` aplica una función a cada input en lotes
//! consecutivos de a lo sumo `batch_size` elementos. Dentro de un lote las
//! tareas corren en paralelo; el lote siguiente no se despacha hasta que el
//! actual terminó por completo. Esto acota el trabajo en vuelo a
//! `batch_size` tareas sin importar el tamaño total del input.
//!
//! Resultado de cada tarea (`BatchOutcome`):
//! - `Value(v)`: aporta `Some(v)` al agregado.
//! - `Empty`: aporta un slot `None` (centinela "sin resultado").
//! - `Excluded`: no aporta nada; la posición desaparece del agregado.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{mpsc, Arc};

use log::debug;

use super::pool::{shared_pool, WorkerPool};
use crate::errors::{BatchError, TaskError};

/// Resultado de una tarea individual.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome<T> {
    Value(T),
    Empty,
    Excluded,
}

impl<T> BatchOutcome<T> {
    /// Slot que la tarea aporta al agregado; `None` si queda excluida.
    pub fn into_slot(self) -> Option<Option<T>> {
        match self {
            BatchOutcome::Value(v) => Some(Some(v)),
            BatchOutcome::Empty => Some(None),
            BatchOutcome::Excluded => None,
        }
    }
}

impl<T> From<Option<T>> for BatchOutcome<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => BatchOutcome::Value(v),
            None => BatchOutcome::Excluded,
        }
    }
}

type ItemHook<'a, T> = Box<dyn FnMut(&BatchOutcome<T>) + 'a>;
type BatchHook<'a, T> = Box<dyn FnMut(&[Option<T>]) + 'a>;

/// Callbacks opcionales de progreso. Ambos corren en el hilo llamador.
pub struct BatchHooks<'a, T> {
    on_item: Option<ItemHook<'a, T>>,
    on_batch: Option<BatchHook<'a, T>>,
}

impl<'a, T> Default for BatchHooks<'a, T> {
    fn default() -> Self {
        Self { on_item: None, on_batch: None }
    }
}

impl<'a, T> BatchHooks<'a, T> {
    pub fn none() -> Self {
        Self::default()
    }

    /// Se invoca una vez por tarea completada, en orden de finalización.
    pub fn on_item(mut self, hook: impl FnMut(&BatchOutcome<T>) + 'a) -> Self {
        self.on_item = Some(Box::new(hook));
        self
    }

    /// Se invoca una vez por lote completo, con los slots en orden de input.
    pub fn on_batch(mut self, hook: impl FnMut(&[Option<T>]) + 'a) -> Self {
        self.on_batch = Some(Box::new(hook));
        self
    }
}

#[derive(Debug, Clone)]
enum PoolHandle {
    Shared,
    Owned(Arc<WorkerPool>),
}

/// Ejecutor por lotes. Barato de clonar.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    pool: PoolHandle,
}

enum TaskFailure {
    Error(TaskError),
    Panic(String),
}

impl BatchExecutor {
    /// Usa el pool compartido del proceso, resuelto en cada `run`.
    pub fn shared() -> Self {
        Self { pool: PoolHandle::Shared }
    }

    /// Usa un pool propio.
    pub fn with_pool(pool: Arc<WorkerPool>) -> Self {
        Self { pool: PoolHandle::Owned(pool) }
    }

    fn resolve(&self) -> Result<Arc<WorkerPool>, BatchError> {
        match &self.pool {
            PoolHandle::Shared => shared_pool(),
            PoolHandle::Owned(pool) => Ok(Arc::clone(pool)),
        }
    }

    /// Ejecuta `func` sobre `inputs` en lotes y devuelve los slots agregados
    /// en orden de input.
    ///
    /// El primer fallo recibido (error o panic de una tarea) aborta la espera
    /// del lote y se propaga con el índice global del input. Las tareas del
    /// lote que sigan en vuelo terminan en el pool y su resultado se descarta;
    /// `on_batch` no se invoca para un lote abortado.
    pub fn run<I, T, E, F>(&self,
                           func: F,
                           inputs: Vec<I>,
                           batch_size: usize,
                           mut hooks: BatchHooks<'_, T>)
                           -> Result<Vec<Option<T>>, BatchError>
        where I: Send + 'static,
              T: Send + 'static,
              E: Into<TaskError>,
              F: Fn(I) -> Result<BatchOutcome<T>, E> + Send + Sync + 'static
    {
        if batch_size == 0 {
            return Err(BatchError::InvalidBatchSize);
        }
        let pool = self.resolve()?;
        let total = inputs.len();
        let func = Arc::new(func);
        let mut results: Vec<Option<T>> = Vec::with_capacity(total);
        let mut pending = inputs.into_iter();
        let mut batch_start = 0usize;

        loop {
            let batch: Vec<I> = pending.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }
            let len = batch.len();
            let (tx, rx) = mpsc::channel::<(usize, Result<BatchOutcome<T>, TaskFailure>)>();
            for (offset, input) in batch.into_iter().enumerate() {
                let tx = tx.clone();
                let func = Arc::clone(&func);
                pool.spawn(move || {
                        let outcome = match catch_unwind(AssertUnwindSafe(|| func(input))) {
                            Ok(Ok(outcome)) => Ok(outcome),
                            Ok(Err(e)) => Err(TaskFailure::Error(e.into())),
                            Err(payload) => Err(TaskFailure::Panic(panic_message(payload))),
                        };
                        // El receptor pudo haberse ido si el lote ya abortó.
                        let _ = tx.send((offset, outcome));
                    });
            }
            drop(tx);

            let mut slots: Vec<Option<BatchOutcome<T>>> = (0..len).map(|_| None).collect();
            for received in 0..len {
                let (offset, outcome) = rx.recv()
                                          .map_err(|_| BatchError::WorkerLost { index: batch_start + received })?;
                match outcome {
                    Ok(outcome) => {
                        if let Some(hook) = hooks.on_item.as_mut() {
                            hook(&outcome);
                        }
                        slots[offset] = Some(outcome);
                    }
                    Err(TaskFailure::Error(source)) => {
                        return Err(BatchError::TaskFailed { index: batch_start + offset, source });
                    }
                    Err(TaskFailure::Panic(message)) => {
                        return Err(BatchError::TaskPanicked { index: batch_start + offset, message });
                    }
                }
            }

            let batch_results: Vec<Option<T>> = slots.into_iter().flatten().filter_map(BatchOutcome::into_slot).collect();
            debug!("batch done start={} size={} kept={} total={}",
                   batch_start,
                   len,
                   batch_results.len(),
                   total);
            if let Some(hook) = hooks.on_batch.as_mut() {
                hook(&batch_results);
            }
            results.extend(batch_results);
            batch_start += len;
        }

        Ok(results)
    }
}

/// Equivalente a decorar una función con un tamaño de lote fijo: devuelve un
/// closure que ejecuta `func` por lotes sobre el vector recibido.
pub fn batched<I, T, E, F>(executor: BatchExecutor,
                           batch_size: usize,
                           func: F)
                           -> impl Fn(Vec<I>) -> Result<Vec<Option<T>>, BatchError>
    where I: Send + 'static,
          T: Send + 'static,
          E: Into<TaskError>,
          F: Fn(I) -> Result<BatchOutcome<T>, E> + Clone + Send + Sync + 'static
{
    move |inputs| executor.run(func.clone(), inputs, batch_size, BatchHooks::none())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
