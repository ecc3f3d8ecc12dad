//! Builder para `ChainEngine`.
//!
//! El builder recibe los stores y la configuración de la cadena; `build`
//! resuelve todos los nombres contra el registro antes de crear el motor,
//! de modo que un nombre desconocido falla sin ejecutar ningún step.
//!
//! ```ignore
//! let engine = ChainEngine::builder(store, audit)
//!     .chain_id("Search1")
//!     .order(["ContainsMetal", "BinaryComp"])
//!     .registry(registry)
//!     .build()?;
//! ```

use crate::checkpoint::{ArtifactExporter, AuditLog, CheckpointStore};
use crate::constants::INITIAL_ARTIFACT_TAG;
use crate::engine::{ChainDefinition, ChainEngine};
use crate::errors::CoreEngineError;
use crate::step::StepRegistry;

pub struct ChainEngineBuilder<S: CheckpointStore, A: AuditLog> {
    store: S,
    audit: A,
    chain_id: String,
    initial_tag: String,
    order: Vec<String>,
    registry: Option<StepRegistry>,
    exporter: Option<Box<dyn ArtifactExporter>>,
    hash_artifacts: bool,
}

impl<S: CheckpointStore, A: AuditLog> ChainEngineBuilder<S, A> {
    pub(crate) fn new(store: S, audit: A) -> Self {
        Self { store,
               audit,
               chain_id: "chain".to_string(),
               initial_tag: INITIAL_ARTIFACT_TAG.to_string(),
               order: Vec::new(),
               registry: None,
               exporter: None,
               hash_artifacts: false }
    }

    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = chain_id.into();
        self
    }

    /// Tag del artifact inicial (por defecto `"Database"`).
    pub fn initial_tag(mut self, tag: impl Into<String>) -> Self {
        self.initial_tag = tag.into();
        self
    }

    pub fn order<I, N>(mut self, order: I) -> Self
        where I: IntoIterator<Item = N>,
              N: Into<String>
    {
        self.order = order.into_iter().map(Into::into).collect();
        self
    }

    pub fn registry(mut self, registry: StepRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Exportador secundario invocado tras cada artifact computado.
    pub fn exporter(mut self, exporter: impl ArtifactExporter + 'static) -> Self {
        self.exporter = Some(Box::new(exporter));
        self
    }

    /// Calcula el hash de cada artifact nuevo para el evento `StepFinished`.
    /// Serializa la colección completa una vez más, así que está apagado por
    /// defecto.
    pub fn hash_artifacts(mut self, enabled: bool) -> Self {
        self.hash_artifacts = enabled;
        self
    }

    pub fn build(self) -> Result<ChainEngine<S, A>, CoreEngineError> {
        let registry = self.registry
                           .ok_or_else(|| CoreEngineError::Internal("no step registry configured".into()))?;
        let definition = ChainDefinition::resolve(self.chain_id, self.initial_tag, &self.order, &registry)?;
        Ok(ChainEngine::from_parts(self.store, self.audit, definition, self.exporter, self.hash_artifacts))
    }
}
