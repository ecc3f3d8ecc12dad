//! Log de auditoría de una búsqueda.
//!
//! Una línea `"<nombre>: <cantidad>"` por step completado (no por step
//! saltado). `begin` arranca el log con el conteo del dataset inicial y
//! reemplaza cualquier contenido previo.

use crate::errors::StoreError;

pub trait AuditLog {
    fn begin(&mut self, initial_tag: &str, count: usize) -> Result<(), StoreError>;
    fn append(&mut self, step_name: &str, count: usize) -> Result<(), StoreError>;
    /// Líneas actuales del log, en orden.
    fn entries(&self) -> Result<Vec<String>, StoreError>;
}

pub fn format_entry(name: &str, count: usize) -> String {
    format!("{name}: {count}")
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryAuditLog {
    lines: Vec<String>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for InMemoryAuditLog {
    fn begin(&mut self, initial_tag: &str, count: usize) -> Result<(), StoreError> {
        self.lines = vec![format_entry(initial_tag, count)];
        Ok(())
    }

    fn append(&mut self, step_name: &str, count: usize) -> Result<(), StoreError> {
        self.lines.push(format_entry(step_name, count));
        Ok(())
    }

    fn entries(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lines.clone())
    }
}
