//! Fuentes de datos en disco para el artifact inicial.
//!
//! - `JsonFileSource`: un array JSON de registros o un objeto id → registro.
//! - `CsvSource`: una tabla con encabezado (p. ej. el resumen de materiales
//!   estables de una base de datos). Cada celda se tipa al leerla: vacía →
//!   `null`, entero, float finito, o texto. NaN e infinitos pasan a `null`.
//!   Una columna de lista de elementos (`"['Li', 'O']"`) puede convertirse en
//!   array y agregar el campo `NElements`.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use matscreen_core::checkpoint::DataSource;
use matscreen_core::errors::CoreEngineError;
use matscreen_core::model::{Record, RecordCollection};
use serde_json::Value;

use crate::error::PersistenceError;

pub const ELEMENT_COUNT_FIELD: &str = "NElements";

#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<RecordCollection, PersistenceError> {
        let bytes = fs::read(&self.path).map_err(|e| PersistenceError::io(&self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| PersistenceError::json(&self.path, e))
    }
}

impl DataSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("json file {}", self.path.display())
    }

    fn load(&self) -> Result<RecordCollection, CoreEngineError> {
        self.read().map_err(|e| CoreEngineError::Source(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    element_list_column: Option<String>,
    text_columns: Vec<String>,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), element_list_column: None, text_columns: vec!["MaterialId".to_string()] }
    }

    /// Columna con la lista de elementos; se convierte en array y se agrega
    /// `NElements` a cada registro.
    pub fn with_element_list(mut self, column: impl Into<String>) -> Self {
        self.element_list_column = Some(column.into());
        self
    }

    /// Columna que se conserva como texto aunque parezca numérica.
    pub fn keep_text(mut self, column: impl Into<String>) -> Self {
        self.text_columns.push(column.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RecordCollection, PersistenceError> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| PersistenceError::csv(&self.path, e))?;
        let headers = reader.headers().map_err(|e| PersistenceError::csv(&self.path, e))?.clone();
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| PersistenceError::csv(&self.path, e))?;
            let mut record = Record::new();
            for (column, cell) in headers.iter().zip(row.iter()) {
                if self.element_list_column.as_deref() == Some(column) {
                    let elements = parse_element_list(cell);
                    let count = elements.len();
                    record.insert(column, elements);
                    record.insert(ELEMENT_COUNT_FIELD, count);
                } else if self.text_columns.iter().any(|c| c == column) {
                    record.insert(column, cell);
                } else {
                    record.insert(column, parse_cell(cell));
                }
            }
            records.push(record);
        }
        info!("read {} rows from {}", records.len(), self.path.display());
        Ok(RecordCollection::Sequence(records))
    }
}

impl DataSource for CsvSource {
    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }

    fn load(&self) -> Result<RecordCollection, CoreEngineError> {
        self.read().map_err(|e| CoreEngineError::Source(e.to_string()))
    }
}

/// Tipa una celda de texto.
pub fn parse_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null);
    }
    Value::String(cell.to_string())
}

/// `"['Li', 'O']"` → `["Li", "O"]`. Acepta comillas simples o dobles y comas
/// o espacios como separadores.
pub fn parse_element_list(cell: &str) -> Vec<String> {
    cell.split(|c: char| c == ',' || c.is_whitespace() || matches!(c, '[' | ']' | '\'' | '"'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
