//! Registro inmutable de steps por nombre.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::Step;
use crate::errors::CoreEngineError;

#[derive(Clone, Default)]
pub struct StepRegistry {
    steps: IndexMap<String, Arc<dyn Step>>,
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry").field("steps", &self.names()).finish()
    }
}

impl StepRegistry {
    pub fn builder() -> StepRegistryBuilder {
        StepRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Step>> {
        self.steps.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.steps.contains_key(name)
    }

    /// Nombres en orden de registro.
    pub fn names(&self) -> Vec<&str> {
        self.steps.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Resuelve un orden de nombres a steps. El primer nombre desconocido
    /// produce `UnknownStep`.
    pub fn resolve<S: AsRef<str>>(&self, order: &[S]) -> Result<Vec<Arc<dyn Step>>, CoreEngineError> {
        order.iter()
             .map(|name| {
                 let name = name.as_ref();
                 self.get(name).ok_or_else(|| CoreEngineError::UnknownStep(name.to_string()))
             })
             .collect()
    }
}

#[derive(Default)]
pub struct StepRegistryBuilder {
    steps: IndexMap<String, Arc<dyn Step>>,
}

impl fmt::Debug for StepRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistryBuilder")
         .field("steps", &self.steps.keys().collect::<Vec<_>>())
         .finish()
    }
}

impl StepRegistryBuilder {
    /// Registra un step; un nombre repetido es `DuplicateStep`.
    pub fn register<S: Step + 'static>(self, step: S) -> Result<Self, CoreEngineError> {
        self.register_arc(Arc::new(step))
    }

    pub fn register_arc(mut self, step: Arc<dyn Step>) -> Result<Self, CoreEngineError> {
        let name = step.name().to_string();
        if self.steps.contains_key(&name) {
            return Err(CoreEngineError::DuplicateStep(name));
        }
        self.steps.insert(name, step);
        Ok(self)
    }

    pub fn build(self) -> StepRegistry {
        StepRegistry { steps: self.steps }
    }
}
