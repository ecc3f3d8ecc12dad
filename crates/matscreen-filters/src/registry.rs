//! Registro por defecto: todos los filtros de composición más los steps de
//! estructuras, que dependen de rutas de la búsqueda.

use std::path::PathBuf;

use matscreen_core::errors::CoreEngineError;
use matscreen_core::step::StepRegistry;
use matscreen_core::BatchExecutor;

use crate::steps::{composition_filters, get_structures_step, put_structures_step};

#[derive(Debug, Clone)]
pub struct FilterSettings {
    pub executor: BatchExecutor,
    /// Directorio de la búsqueda (`<root>/<search>`).
    pub search_dir: PathBuf,
    /// Directorio con los `<MaterialId>.CIF`.
    pub structures_dir: PathBuf,
    pub batch_size: usize,
}

pub fn default_registry(settings: &FilterSettings) -> Result<StepRegistry, CoreEngineError> {
    let mut builder = StepRegistry::builder();
    for filter in composition_filters() {
        builder = builder.register(filter)?;
    }
    builder.register(put_structures_step(settings.executor.clone(), settings.structures_dir.clone())
                         .with_batch_size(settings.batch_size))?
           .register(get_structures_step(settings.search_dir.clone(), settings.structures_dir.clone()))
           .map(|b| b.build())
}
