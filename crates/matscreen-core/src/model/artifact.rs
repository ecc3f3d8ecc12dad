//! Identidad de artifacts.
//!
//! Un artifact de checkpoint se identifica por `(posición, tag)`; su clave
//! `"{posición}_{tag}"` es estable entre ejecuciones, de modo que el
//! tercer artifact producido por "ContainsMetal" se llama igual sin importar
//! qué corrió antes. Los artifacts auxiliares (registros problemáticos)
//! llevan un nombre libre y no participan de la cadena.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::PROBLEM_RECORDS_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactId {
    Checkpoint { position: usize, tag: String },
    Auxiliary { name: String },
}

impl ArtifactId {
    pub fn checkpoint(position: usize, tag: impl Into<String>) -> Self {
        ArtifactId::Checkpoint { position, tag: tag.into() }
    }

    pub fn auxiliary(name: impl Into<String>) -> Self {
        ArtifactId::Auxiliary { name: name.into() }
    }

    /// Artifact auxiliar con los registros problemáticos del step que produce
    /// el checkpoint `position`. La posición evita que un step repetido en la
    /// cadena pise los fallos de otra aparición.
    pub fn problem_records(position: usize, step: &str) -> Self {
        ArtifactId::auxiliary(format!("{PROBLEM_RECORDS_PREFIX}_{position}_{step}"))
    }

    /// Clave estable usada por los stores (nombre de archivo sin extensión).
    pub fn key(&self) -> String {
        match self {
            ArtifactId::Checkpoint { position, tag } => format!("{position}_{tag}"),
            ArtifactId::Auxiliary { name } => name.clone(),
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            ArtifactId::Checkpoint { position, .. } => Some(*position),
            ArtifactId::Auxiliary { .. } => None,
        }
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
