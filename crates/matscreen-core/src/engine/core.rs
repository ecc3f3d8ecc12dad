//! Implementación del `ChainEngine`.

use std::fmt;
use std::sync::Arc;

use log::{error, info, warn};
use uuid::Uuid;

use crate::checkpoint::{ArtifactExporter, AuditLog, CheckpointStore, DataSource};
use crate::engine::{ChainDefinition, ChainEngineBuilder, ChainReport, PositionOutcome};
use crate::errors::CoreEngineError;
use crate::event::{ChainEvent, ChainEventKind, EventStore, InMemoryEventStore};
use crate::hashing::hash_serializable;
use crate::model::{ArtifactId, RecordCollection};
use crate::step::{Step, StepContext};

/// Motor de cadenas de filtros con checkpoints.
///
/// Recorre las posiciones en orden. Para cada una decide, sólo por la
/// existencia del artifact destino, si el step ya corrió; si no, carga el
/// artifact anterior, ejecuta el step y persiste el resultado antes de pasar
/// a la siguiente posición. Un error detiene la cadena sin escribir el
/// artifact de esa posición, así que volver a ejecutar reanuda en el mismo
/// step.
pub struct ChainEngine<S: CheckpointStore, A: AuditLog> {
    store: S,
    audit: A,
    definition: ChainDefinition,
    exporter: Option<Box<dyn ArtifactExporter>>,
    hash_artifacts: bool,
    events: InMemoryEventStore,
    current_run: Option<Uuid>,
    last_run: Option<Uuid>,
}

impl<S: CheckpointStore, A: AuditLog> fmt::Debug for ChainEngine<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainEngine")
         .field("definition", &self.definition)
         .field("exporter", &self.exporter.is_some())
         .field("last_run", &self.last_run)
         .finish()
    }
}

impl<S: CheckpointStore, A: AuditLog> ChainEngine<S, A> {
    #[inline]
    pub fn builder(store: S, audit: A) -> ChainEngineBuilder<S, A> {
        ChainEngineBuilder::new(store, audit)
    }

    pub(crate) fn from_parts(store: S,
                             audit: A,
                             definition: ChainDefinition,
                             exporter: Option<Box<dyn ArtifactExporter>>,
                             hash_artifacts: bool)
                             -> Self {
        Self { store,
               audit,
               definition,
               exporter,
               hash_artifacts,
               events: InMemoryEventStore::default(),
               current_run: None,
               last_run: None }
    }

    pub fn definition(&self) -> &ChainDefinition {
        &self.definition
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// Devuelve los stores, p. ej. para reanudar con otro motor.
    pub fn into_parts(self) -> (S, A) {
        (self.store, self.audit)
    }

    /// Eventos de la última ejecución (bootstrap incluido).
    pub fn events(&self) -> Vec<ChainEvent> {
        self.last_run.map(|id| self.events.list(id)).unwrap_or_default()
    }

    /// Variante compacta de los eventos de la última ejecución.
    pub fn event_variants(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .map(|e| match e.kind {
                ChainEventKind::ChainInitialized { .. } => "I",
                ChainEventKind::SourceLoaded { .. } => "L",
                ChainEventKind::StepSkipped { .. } => "K",
                ChainEventKind::StepStarted { .. } => "S",
                ChainEventKind::StepFinished { .. } => "F",
                ChainEventKind::ProblemRecordsStored { .. } => "P",
                ChainEventKind::StepFailed { .. } => "X",
                ChainEventKind::ChainCompleted { .. } => "C",
            })
            .collect()
    }

    fn ensure_run(&mut self) -> Uuid {
        if let Some(id) = self.current_run {
            return id;
        }
        let id = Uuid::new_v4();
        self.events.append_kind(id,
                                ChainEventKind::ChainInitialized { chain_id: self.definition.chain_id.clone(),
                                                                   definition_hash: self.definition.definition_hash.clone(),
                                                                   step_count: self.definition.len() });
        self.current_run = Some(id);
        self.last_run = Some(id);
        id
    }

    /// Produce el artifact inicial desde `source` si todavía no existe y
    /// arranca el log de auditoría. Devuelve `true` si cargó la fuente.
    pub fn bootstrap(&mut self, source: &dyn DataSource) -> Result<bool, CoreEngineError> {
        let run_id = self.ensure_run();
        let initial = self.definition.initial_artifact();
        if self.store.exists(&initial)? {
            info!("{} already exists, source not reloaded", initial);
            return Ok(false);
        }
        info!("loading initial dataset from {}", source.describe());
        let records = source.load()?;
        let count = records.count();
        self.store.save(&initial, &records)?;
        self.audit.begin(&self.definition.initial_tag, count)?;
        info!("{} stored with {} records", initial, count);
        self.export(&initial, &records);
        self.events.append_kind(run_id, ChainEventKind::SourceLoaded { artifact: initial.key(), count });
        Ok(true)
    }

    /// Ejecuta la cadena completa, saltando las posiciones ya computadas.
    pub fn run(&mut self) -> Result<ChainReport, CoreEngineError> {
        let run_id = self.ensure_run();
        let result = self.run_positions(run_id);
        self.current_run = None;
        result
    }

    fn run_positions(&mut self, run_id: Uuid) -> Result<ChainReport, CoreEngineError> {
        info!("chain '{}' starting: {} steps [{}]",
              self.definition.chain_id,
              self.definition.len(),
              self.definition.names().join(", "));
        let mut outcomes = Vec::with_capacity(self.definition.len());
        for position in 0..self.definition.len() {
            outcomes.push(self.run_position(run_id, position)?);
        }
        let report = ChainReport { run_id, chain_id: self.definition.chain_id.clone(), outcomes };
        self.events.append_kind(run_id,
                                ChainEventKind::ChainCompleted { executed: report.executed(),
                                                                 skipped: report.skipped() });
        info!("chain '{}' completed: {} executed, {} skipped",
              self.definition.chain_id,
              report.executed(),
              report.skipped());
        Ok(report)
    }

    fn artifact_at(&self, position: usize) -> Result<ArtifactId, CoreEngineError> {
        self.definition
            .artifact_at(position)
            .ok_or_else(|| CoreEngineError::Internal(format!("position {position} out of range")))
    }

    fn run_position(&mut self, run_id: Uuid, position: usize) -> Result<PositionOutcome, CoreEngineError> {
        let step: Arc<dyn Step> = Arc::clone(&self.definition.steps[position]);
        let name = step.name().to_string();
        let previous = self.artifact_at(position)?;
        let target = self.artifact_at(position + 1)?;

        if self.store.exists(&target)? {
            info!("{} already done ({})", name, target);
            self.events.append_kind(run_id,
                                    ChainEventKind::StepSkipped { position, step: name.clone(), artifact: target.key() });
            return Ok(PositionOutcome::Skipped { position, step: name, artifact: target });
        }

        if !self.store.exists(&previous)? {
            return Err(CoreEngineError::MissingArtifact(previous.key()));
        }
        let input = self.store.load(&previous)?;
        let previous_count = input.count();
        info!("running {} ({}) on {} [{} records]", name, step.kind(), previous, previous_count);
        self.events.append_kind(run_id,
                                ChainEventKind::StepStarted { position, step: name.clone(), input: previous.key() });

        let ctx = StepContext { chain_id: &self.definition.chain_id, position, previous: &previous, target: &target };
        let output = match step.run(input, &ctx) {
            Ok(output) => output,
            Err(source) => {
                error!("{} failed at position {}: {}", name, position, source);
                self.events.append_kind(run_id,
                                        ChainEventKind::StepFailed { position,
                                                                     step: name.clone(),
                                                                     error: source.to_string() });
                return Err(CoreEngineError::StepExecutionFailure { position, step: name, source });
            }
        };

        let problem_records = output.failures.len();
        if problem_records > 0 {
            let aux = ArtifactId::problem_records(position + 1, &name);
            let tagged: Vec<_> = output.failures.into_iter().map(|f| f.into_tagged_record()).collect();
            self.store.save(&aux, &RecordCollection::Sequence(tagged))?;
            warn!("{} records could not be processed by {}, stored in {}", problem_records, name, aux);
            self.events.append_kind(run_id,
                                    ChainEventKind::ProblemRecordsStored { position,
                                                                           step: name.clone(),
                                                                           artifact: aux.key(),
                                                                           count: problem_records });
        }

        let records = output.records;
        let count = records.count();
        let removed = previous_count as i64 - count as i64;
        info!("previous count: {}", previous_count);
        info!("new count: {}", count);
        info!("{} removed", removed);
        // La línea de auditoría va antes del checkpoint: una vez guardado, la
        // posición se salta y la línea no se volvería a escribir.
        self.audit.append(&name, count)?;
        self.store.save(&target, &records)?;
        self.export(&target, &records);

        let artifact_hash = self.artifact_hash(&target, &records);
        self.events.append_kind(run_id,
                                ChainEventKind::StepFinished { position,
                                                               step: name.clone(),
                                                               artifact: target.key(),
                                                               previous_count,
                                                               count,
                                                               artifact_hash });
        Ok(PositionOutcome::Executed { position, step: name, artifact: target, previous_count, count, removed, problem_records })
    }

    fn artifact_hash(&self, id: &ArtifactId, records: &RecordCollection) -> Option<String> {
        if !self.hash_artifacts {
            return None;
        }
        let hash = hash_serializable(records);
        if hash.is_none() {
            warn!("could not hash {}", id);
        }
        hash
    }

    fn export(&self, id: &ArtifactId, records: &RecordCollection) {
        if let Some(exporter) = &self.exporter {
            if let Err(e) = exporter.export(id, records) {
                warn!("export of {} failed: {}", id, e);
            }
        }
    }
}
