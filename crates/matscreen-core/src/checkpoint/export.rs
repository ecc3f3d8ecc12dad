//! Exportación secundaria de artifacts (p. ej. planilla). Es un canal de
//! salida: el motor nunca vuelve a leer lo exportado.

use crate::errors::StoreError;
use crate::model::{ArtifactId, RecordCollection};

pub trait ArtifactExporter {
    fn export(&self, id: &ArtifactId, records: &RecordCollection) -> Result<(), StoreError>;
}
