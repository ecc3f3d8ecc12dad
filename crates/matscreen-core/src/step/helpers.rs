//! Steps genéricos construidos a partir de closures.
//!
//! - `PredicateFilter`: conserva los registros que cumplen un predicado.
//! - `FnStep`: envuelve una función sobre la colección completa.
//! - `BatchMapStep`: aplica una función por registro en paralelo usando el
//!   ejecutor por lotes; los errores por registro se desvían como
//!   `PerRecordFailure` en lugar de detener la cadena.

use std::fmt;
use std::sync::Arc;

use log::debug;

use super::{ProgressTicker, Step, StepContext, StepKind, StepOutput};
use crate::batch::{BatchExecutor, BatchHooks, BatchOutcome};
use crate::constants::DEFAULT_BATCH_SIZE;
use crate::errors::{StepError, TaskError};
use crate::model::{PerRecordFailure, Record, RecordCollection};

type Predicate = dyn Fn(&Record) -> Result<bool, StepError> + Send + Sync;
type CollectionFn = dyn Fn(RecordCollection, &StepContext<'_>) -> Result<StepOutput, StepError> + Send + Sync;
type RecordFn = dyn Fn(&Record) -> Result<Option<Record>, StepError> + Send + Sync;

/// Filtro por predicado falible. Un `Err` del predicado detiene el step.
pub struct PredicateFilter {
    name: String,
    predicate: Arc<Predicate>,
    progress_every: Option<usize>,
}

impl PredicateFilter {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
        where F: Fn(&Record) -> Result<bool, StepError> + Send + Sync + 'static
    {
        Self { name: name.into(), predicate: Arc::new(predicate), progress_every: None }
    }

    /// Emite progreso cada `every` registros evaluados.
    pub fn with_progress(mut self, every: usize) -> Self {
        self.progress_every = Some(every);
        self
    }
}

impl fmt::Debug for PredicateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFilter").field("name", &self.name).finish()
    }
}

impl Step for PredicateFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, input: RecordCollection, _ctx: &StepContext<'_>) -> Result<StepOutput, StepError> {
        let mut ticker = self.progress_every.map(|every| ProgressTicker::new(input.count(), every));
        let kept = input.try_retain(|record| {
                            let keep = (self.predicate)(record)?;
                            if let Some(t) = ticker.as_mut() {
                                t.tick();
                            }
                            Ok(keep)
                        })?;
        Ok(StepOutput::new(kept))
    }
}

/// Step definido por una función sobre la colección completa.
pub struct FnStep {
    name: String,
    kind: StepKind,
    func: Box<CollectionFn>,
}

impl FnStep {
    pub fn new<F>(name: impl Into<String>, kind: StepKind, func: F) -> Self
        where F: Fn(RecordCollection, &StepContext<'_>) -> Result<StepOutput, StepError> + Send + Sync + 'static
    {
        Self { name: name.into(), kind, func: Box::new(func) }
    }
}

impl fmt::Debug for FnStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep").field("name", &self.name).field("kind", &self.kind).finish()
    }
}

impl Step for FnStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StepKind {
        self.kind
    }

    fn run(&self, input: RecordCollection, ctx: &StepContext<'_>) -> Result<StepOutput, StepError> {
        (self.func)(input, ctx)
    }
}

enum Mapped {
    Kept(Option<String>, Record),
    Failed(Record, String),
}

/// Map paralelo por registro.
///
/// `Ok(Some(r))` conserva `r` (con la clave original si la colección es un
/// mapa), `Ok(None)` descarta el registro y `Err(e)` lo desvía como
/// `PerRecordFailure` con el motivo. Un panic dentro de la función sí es
/// fatal para el step.
pub struct BatchMapStep {
    name: String,
    kind: StepKind,
    executor: BatchExecutor,
    batch_size: usize,
    progress_every: usize,
    func: Arc<RecordFn>,
}

impl BatchMapStep {
    pub fn new<F>(name: impl Into<String>, executor: BatchExecutor, func: F) -> Self
        where F: Fn(&Record) -> Result<Option<Record>, StepError> + Send + Sync + 'static
    {
        Self { name: name.into(),
               kind: StepKind::Transform,
               executor,
               batch_size: DEFAULT_BATCH_SIZE,
               progress_every: DEFAULT_BATCH_SIZE,
               func: Arc::new(func) }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_progress(mut self, every: usize) -> Self {
        self.progress_every = every;
        self
    }

    pub fn with_kind(mut self, kind: StepKind) -> Self {
        self.kind = kind;
        self
    }
}

impl fmt::Debug for BatchMapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchMapStep")
         .field("name", &self.name)
         .field("kind", &self.kind)
         .field("batch_size", &self.batch_size)
         .finish()
    }
}

impl Step for BatchMapStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> StepKind {
        self.kind
    }

    fn run(&self, input: RecordCollection, ctx: &StepContext<'_>) -> Result<StepOutput, StepError> {
        let keyed = input.is_keyed();
        let entries = input.into_entries();
        let mut ticker = ProgressTicker::new(entries.len(), self.progress_every);
        let func = Arc::clone(&self.func);
        let step = self.name.clone();
        let position = ctx.position;

        let hooks = BatchHooks::none().on_item(|_: &BatchOutcome<Mapped>| {
                                          ticker.tick();
                                      })
                                      .on_batch(|batch: &[Option<Mapped>]| {
                                          debug!("step={} position={} batch collected size={}", step, position, batch.len());
                                      });

        let slots = self.executor.run(move |(key, record): (Option<String>, Record)| {
                                          let outcome = match func(&record) {
                                              Ok(Some(mapped)) => BatchOutcome::Value(Mapped::Kept(key, mapped)),
                                              Ok(None) => BatchOutcome::Excluded,
                                              Err(e) => BatchOutcome::Value(Mapped::Failed(record, e.to_string())),
                                          };
                                          Ok::<_, TaskError>(outcome)
                                      },
                                      entries,
                                      self.batch_size,
                                      hooks)?;

        let mut kept = Vec::with_capacity(slots.len());
        let mut failures = Vec::new();
        for slot in slots.into_iter().flatten() {
            match slot {
                Mapped::Kept(key, record) => kept.push((key, record)),
                Mapped::Failed(record, reason) => failures.push(PerRecordFailure::new(record, &self.name, reason)),
            }
        }
        Ok(StepOutput::with_failures(RecordCollection::from_entries(keyed, kept), failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::WorkerPool;
    use crate::model::ArtifactId;
    use indexmap::IndexMap;
    use serde_json::json;

    fn ctx_ids() -> (ArtifactId, ArtifactId) {
        (ArtifactId::checkpoint(0, "Database"), ArtifactId::checkpoint(1, "Step"))
    }

    fn rec(v: serde_json::Value) -> Record {
        Record::try_from(v).unwrap()
    }

    #[test]
    fn predicate_filter_keeps_matching_records() {
        let (prev, target) = ctx_ids();
        let ctx = StepContext { chain_id: "t", position: 0, previous: &prev, target: &target };
        let step = PredicateFilter::new("Even", |r| Ok(r.get_u64("n")? % 2 == 0)).with_progress(1);
        let input = RecordCollection::from((0..6).map(|n| rec(json!({ "n": n }))).collect::<Vec<_>>());
        let out = step.run(input, &ctx).unwrap();
        assert_eq!(out.records.count(), 3);
        assert!(out.failures.is_empty());
    }

    #[test]
    fn batch_map_routes_errors_to_failures_and_keeps_keys() {
        let (prev, target) = ctx_ids();
        let ctx = StepContext { chain_id: "t", position: 0, previous: &prev, target: &target };
        let pool = Arc::new(WorkerPool::new(2).unwrap());
        let step = BatchMapStep::new("Double", BatchExecutor::with_pool(pool), |r| {
                       let n = r.get_u64("n")?;
                       if n == 0 {
                           return Ok(None);
                       }
                       let mut out = r.clone();
                       out.insert("double", n * 2);
                       Ok(Some(out))
                   }).with_batch_size(2);

        let mut map = IndexMap::new();
        map.insert("a".to_string(), rec(json!({"n": 1})));
        map.insert("b".to_string(), rec(json!({"n": 0})));
        map.insert("c".to_string(), rec(json!({"m": 5})));
        map.insert("d".to_string(), rec(json!({"n": 4})));

        let out = step.run(RecordCollection::Keyed(map), &ctx).unwrap();
        match &out.records {
            RecordCollection::Keyed(m) => {
                assert_eq!(m.keys().collect::<Vec<_>>(), vec!["a", "d"]);
                assert_eq!(m["d"].get("double"), Some(&json!(8)));
            }
            other => panic!("shape changed: {other:?}"),
        }
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].step, "Double");
        assert_eq!(out.failures[0].reason, "record has no field 'n'");
    }
}
