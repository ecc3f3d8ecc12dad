use serde::{Deserialize, Serialize};

use super::Record;
use crate::constants::{FAILED_ON_FIELD, FAILURE_REASON_FIELD};

/// Registro que un step no pudo procesar. Viaja junto al output del step y
/// el orquestador lo persiste en un artifact auxiliar; nunca se descarta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerRecordFailure {
    pub record: Record,
    pub step: String,
    pub reason: String,
}

impl PerRecordFailure {
    pub fn new(record: Record, step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { record, step: step.into(), reason: reason.into() }
    }

    /// Registro marcado con el step y el motivo, listo para persistir.
    pub fn into_tagged_record(self) -> Record {
        let mut record = self.record;
        record.insert(FAILED_ON_FIELD, self.step);
        record.insert(FAILURE_REASON_FIELD, self.reason);
        record
    }
}
