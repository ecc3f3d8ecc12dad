//! Exportación tabular de artifacts (`<clave>.csv` junto al checkpoint).
//!
//! Columnas: unión de los campos de todos los registros en orden de primera
//! aparición, sin los campos pesados configurados (por defecto `structure`
//! y `condensed_struct`). Los mapas por identificador agregan una primera
//! columna `id` con la clave. Valores anidados se escriben como JSON compacto.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use matscreen_core::checkpoint::ArtifactExporter;
use matscreen_core::errors::StoreError;
use matscreen_core::model::{ArtifactId, Record, RecordCollection};
use serde_json::Value;

use crate::error::PersistenceError;
use crate::fs::atomic::write_atomic;

pub const DEFAULT_DROPPED_FIELDS: [&str; 2] = ["structure", "condensed_struct"];
pub const KEY_COLUMN: &str = "id";

#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
    dropped: Vec<String>,
}

impl CsvExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), dropped: DEFAULT_DROPPED_FIELDS.iter().map(|s| s.to_string()).collect() }
    }

    pub fn drop_field(mut self, field: impl Into<String>) -> Self {
        self.dropped.push(field.into());
        self
    }

    pub fn path_for(&self, id: &ArtifactId) -> PathBuf {
        self.dir.join(format!("{}.csv", id.key()))
    }

    fn columns<'a>(&self, records: impl Iterator<Item = &'a Record>) -> Vec<String> {
        let mut columns: IndexSet<String> = IndexSet::new();
        for record in records {
            for (field, _) in record.fields() {
                if !self.dropped.iter().any(|d| d == field) && !columns.contains(field) {
                    columns.insert(field.clone());
                }
            }
        }
        columns.into_iter().collect()
    }

    fn write(&self, path: &Path, records: &RecordCollection) -> Result<(), PersistenceError> {
        let columns = self.columns(records.iter());
        let keyed = records.is_keyed();
        write_atomic(path, |tmp| {
            let mut writer = csv::Writer::from_writer(tmp);
            let mut header: Vec<&str> = Vec::with_capacity(columns.len() + 1);
            if keyed {
                header.push(KEY_COLUMN);
            }
            header.extend(columns.iter().map(String::as_str));
            writer.write_record(&header).map_err(|e| PersistenceError::csv(path, e))?;

            let rows: Box<dyn Iterator<Item = (Option<&String>, &Record)> + '_> = match records {
                RecordCollection::Sequence(v) => Box::new(v.iter().map(|r| (None, r))),
                RecordCollection::Keyed(m) => Box::new(m.iter().map(|(k, r)| (Some(k), r))),
            };
            for (key, record) in rows {
                let mut row: Vec<String> = Vec::with_capacity(header.len());
                if let Some(key) = key {
                    row.push(key.clone());
                }
                row.extend(columns.iter().map(|c| render_cell(record.get(c))));
                writer.write_record(&row).map_err(|e| PersistenceError::csv(path, e))?;
            }
            writer.flush().map_err(|e| PersistenceError::io(path, e))?;
            Ok(())
        })
    }
}

impl ArtifactExporter for CsvExporter {
    fn export(&self, id: &ArtifactId, records: &RecordCollection) -> Result<(), StoreError> {
        Ok(self.write(&self.path_for(id), records)?)
    }
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
