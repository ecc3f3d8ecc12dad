//! Fuente del dataset inicial (artifact en posición 0).

use crate::errors::CoreEngineError;
use crate::model::RecordCollection;

pub trait DataSource {
    /// Descripción corta para logs.
    fn describe(&self) -> String;
    fn load(&self) -> Result<RecordCollection, CoreEngineError>;
}

/// Fuente fija en memoria.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: RecordCollection,
}

impl StaticSource {
    pub fn new(records: impl Into<RecordCollection>) -> Self {
        Self { records: records.into() }
    }
}

impl DataSource for StaticSource {
    fn describe(&self) -> String {
        format!("static ({} records)", self.records.count())
    }

    fn load(&self) -> Result<RecordCollection, CoreEngineError> {
        Ok(self.records.clone())
    }
}
