//! Definición resuelta de una cadena.

use std::fmt;
use std::sync::Arc;

use serde_json::json;

use crate::constants::ENGINE_VERSION;
use crate::errors::CoreEngineError;
use crate::hashing::hash_value;
use crate::model::ArtifactId;
use crate::step::{Step, StepRegistry};

/// Cadena ya resuelta contra un registro: los steps en orden y un hash
/// estable de la definición (versión del motor, tag inicial y nombres).
#[derive(Clone)]
pub struct ChainDefinition {
    pub chain_id: String,
    pub initial_tag: String,
    pub steps: Vec<Arc<dyn Step>>,
    pub definition_hash: String,
}

impl fmt::Debug for ChainDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainDefinition")
         .field("chain_id", &self.chain_id)
         .field("initial_tag", &self.initial_tag)
         .field("steps", &self.names())
         .field("definition_hash", &self.definition_hash)
         .finish()
    }
}

impl ChainDefinition {
    /// Resuelve `order` contra `registry`. Falla con `UnknownStep` antes de
    /// ejecutar nada si algún nombre no está registrado.
    pub fn resolve<S: AsRef<str>>(chain_id: impl Into<String>,
                                  initial_tag: impl Into<String>,
                                  order: &[S],
                                  registry: &StepRegistry)
                                  -> Result<Self, CoreEngineError> {
        let steps = registry.resolve(order)?;
        Ok(Self::from_steps(chain_id, initial_tag, steps))
    }

    pub fn from_steps(chain_id: impl Into<String>, initial_tag: impl Into<String>, steps: Vec<Arc<dyn Step>>) -> Self {
        let initial_tag = initial_tag.into();
        let names: Vec<&str> = steps.iter().map(|s| s.name()).collect();
        let definition_hash = hash_value(&json!({
                                             "engine_version": ENGINE_VERSION,
                                             "initial_tag": initial_tag,
                                             "steps": names,
                                         }));
        Self { chain_id: chain_id.into(), initial_tag, steps, definition_hash }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Artifact en la posición `position` de la cadena: el inicial en 0, el
    /// producido por el step `position - 1` en las demás.
    pub fn artifact_at(&self, position: usize) -> Option<ArtifactId> {
        if position == 0 {
            return Some(ArtifactId::checkpoint(0, self.initial_tag.as_str()));
        }
        self.steps.get(position - 1).map(|s| ArtifactId::checkpoint(position, s.name()))
    }

    pub fn initial_artifact(&self) -> ArtifactId {
        ArtifactId::checkpoint(0, self.initial_tag.as_str())
    }

    /// Último artifact de la cadena (el inicial si no hay steps).
    pub fn final_artifact(&self) -> ArtifactId {
        self.artifact_at(self.len()).unwrap_or_else(|| self.initial_artifact())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::PredicateFilter;

    fn registry() -> StepRegistry {
        StepRegistry::builder().register(PredicateFilter::new("A", |_| Ok(true)))
                               .unwrap()
                               .register(PredicateFilter::new("B", |_| Ok(true)))
                               .unwrap()
                               .build()
    }

    #[test]
    fn artifact_keys_follow_positions() {
        let def = ChainDefinition::resolve("c", "Database", &["B", "A"], &registry()).unwrap();
        assert_eq!(def.artifact_at(0).unwrap().key(), "0_Database");
        assert_eq!(def.artifact_at(1).unwrap().key(), "1_B");
        assert_eq!(def.final_artifact().key(), "2_A");
        assert!(def.artifact_at(3).is_none());
    }

    #[test]
    fn hash_depends_on_order() {
        let reg = registry();
        let ab = ChainDefinition::resolve("c", "Database", &["A", "B"], &reg).unwrap();
        let ba = ChainDefinition::resolve("c", "Database", &["B", "A"], &reg).unwrap();
        let ab2 = ChainDefinition::resolve("other", "Database", &["A", "B"], &reg).unwrap();
        assert_ne!(ab.definition_hash, ba.definition_hash);
        assert_eq!(ab.definition_hash, ab2.definition_hash);
    }
}
