use std::fmt;

use crate::errors::StepError;
use crate::model::{ArtifactId, PerRecordFailure, RecordCollection};

/// Tipo general del step. Los terminales (p. ej. materializar archivos) se
/// checkpointean igual que cualquier otro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Filter,
    Transform,
    Terminal,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepKind::Filter => "filter",
            StepKind::Transform => "transform",
            StepKind::Terminal => "terminal",
        };
        f.write_str(s)
    }
}

/// Contexto de una posición de la cadena, visible para el step.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub chain_id: &'a str,
    /// Posición 0-based del step dentro de la cadena.
    pub position: usize,
    /// Artifact de entrada.
    pub previous: &'a ArtifactId,
    /// Artifact que producirá el step.
    pub target: &'a ArtifactId,
}

/// Resultado de un step: la colección resultante y los registros que no
/// pudo procesar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutput {
    pub records: RecordCollection,
    pub failures: Vec<PerRecordFailure>,
}

impl StepOutput {
    pub fn new(records: RecordCollection) -> Self {
        Self { records, failures: Vec::new() }
    }

    pub fn with_failures(records: RecordCollection, failures: Vec<PerRecordFailure>) -> Self {
        Self { records, failures }
    }
}

impl From<RecordCollection> for StepOutput {
    fn from(records: RecordCollection) -> Self {
        Self::new(records)
    }
}

/// Trait que define un Step de la cadena.
///
/// El nombre es el identificador estable: forma parte de la clave del
/// artifact producido y de la línea del log de auditoría. Un `Err` detiene la
/// cadena; los fallos por registro viajan en `StepOutput::failures`.
pub trait Step: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> StepKind {
        StepKind::Filter
    }

    fn run(&self, input: RecordCollection, ctx: &StepContext<'_>) -> Result<StepOutput, StepError>;
}

impl std::fmt::Debug for dyn Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name()).finish()
    }
}
