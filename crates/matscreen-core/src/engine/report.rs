use serde::Serialize;
use uuid::Uuid;

use crate::model::ArtifactId;

/// Qué pasó en una posición de la cadena durante un `run`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PositionOutcome {
    /// El artifact ya existía.
    Skipped { position: usize, step: String, artifact: ArtifactId },
    Executed {
        position: usize,
        step: String,
        artifact: ArtifactId,
        previous_count: usize,
        count: usize,
        /// `previous_count - count`; negativo si el step agregó registros.
        removed: i64,
        problem_records: usize,
    },
}

impl PositionOutcome {
    pub fn step(&self) -> &str {
        match self {
            PositionOutcome::Skipped { step, .. } | PositionOutcome::Executed { step, .. } => step,
        }
    }

    pub fn artifact(&self) -> &ArtifactId {
        match self {
            PositionOutcome::Skipped { artifact, .. } | PositionOutcome::Executed { artifact, .. } => artifact,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, PositionOutcome::Skipped { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainReport {
    pub run_id: Uuid,
    pub chain_id: String,
    pub outcomes: Vec<PositionOutcome>,
}

impl ChainReport {
    pub fn executed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_skipped()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }
}
