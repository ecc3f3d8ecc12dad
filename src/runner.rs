//! Ejecución de una búsqueda: abre `<root>/<search>/` como store, arma el
//! registro por defecto, carga el dataset inicial si hace falta y corre la
//! cadena pedida.

use std::path::{Path, PathBuf};

use log::info;

use matscreen_core::checkpoint::DataSource;
use matscreen_core::engine::{ChainEngine, ChainReport};
use matscreen_core::BatchExecutor;
use matscreen_filters::{default_registry, FilterSettings};
use matscreen_persistence::{CsvExporter, CsvSource, FileAuditLog, FsCheckpointStore, JsonFileSource};

use crate::config::SearchConfig;
use crate::errors::AppError;

/// Columna con la lista de elementos en los CSV de entrada.
pub const ELEMENTS_COLUMN: &str = "Elements";

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub search: String,
    pub source: PathBuf,
    pub filters: Vec<String>,
}

/// Fuente según la extensión: `.csv` o JSON.
pub fn source_for(path: &Path) -> Box<dyn DataSource> {
    let is_csv = path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(CsvSource::new(path).with_element_list(ELEMENTS_COLUMN))
    } else {
        Box::new(JsonFileSource::new(path))
    }
}

pub fn run_search(config: &SearchConfig,
                  request: &SearchRequest,
                  executor: BatchExecutor)
                  -> Result<ChainReport, AppError> {
    if request.search.trim().is_empty() {
        return Err(AppError::Config("search name must not be empty".into()));
    }
    let search_dir = config.store.search_dir(&request.search);
    let store = FsCheckpointStore::open(&search_dir)?;
    let audit = FileAuditLog::in_dir(&search_dir);
    let registry = default_registry(&FilterSettings { executor,
                                                      search_dir: search_dir.clone(),
                                                      structures_dir: config.structures_dir(),
                                                      batch_size: config.batch_size })?;

    let mut builder = ChainEngine::builder(store, audit).chain_id(request.search.as_str())
                                                        .order(request.filters.iter().map(String::as_str))
                                                        .registry(registry);
    if config.store.export {
        builder = builder.exporter(CsvExporter::new(&search_dir));
    }
    let mut engine = builder.build()?;

    info!("search '{}' in {}", request.search, search_dir.display());
    let source = source_for(&request.source);
    engine.bootstrap(source.as_ref())?;
    Ok(engine.run()?)
}
