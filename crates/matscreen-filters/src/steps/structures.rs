//! Steps sobre archivos de estructura CIF (`<MaterialId>.CIF`).

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::TempDir;

use matscreen_core::errors::StepError;
use matscreen_core::model::{Record, RecordCollection};
use matscreen_core::step::{BatchMapStep, FnStep, StepContext, StepKind, StepOutput};
use matscreen_core::BatchExecutor;

pub const MATERIAL_ID_FIELD: &str = "MaterialId";
pub const STRUCTURE_FIELD: &str = "structure";
pub const PUT_STRUCTURES_STEP: &str = "PutStructuresIntoDB";
pub const GET_STRUCTURES_STEP: &str = "GetStructures";

const CIF_EXTENSION: &str = "CIF";
const STRUCTURE_LOAD_PROGRESS: usize = 500;

pub fn cif_path(dir: &Path, material_id: &str) -> PathBuf {
    dir.join(format!("{material_id}.{CIF_EXTENSION}"))
}

/// Carga el CIF de cada registro en el campo `structure`, en paralelo.
/// Un archivo ausente o ilegible es un fallo por registro.
pub fn put_structures_step(executor: BatchExecutor, structures_dir: impl Into<PathBuf>) -> BatchMapStep {
    let dir = structures_dir.into();
    BatchMapStep::new(PUT_STRUCTURES_STEP, executor, move |record: &Record| {
        let id = record.get_str(MATERIAL_ID_FIELD)?;
        let path = cif_path(&dir, id);
        let text = fs::read_to_string(&path).map_err(|e| StepError::Other(format!("{}: {e}", path.display())))?;
        let mut out = record.clone();
        out.insert(STRUCTURE_FIELD, text);
        Ok(Some(out))
    }).with_progress(STRUCTURE_LOAD_PROGRESS)
}

/// Copia los CIF de los registros a `<search_dir>/<previous_key>_structures`.
/// Si el directorio ya existe no toca nada. Devuelve la colección intacta.
///
/// La copia se arma en un directorio temporal dentro de `search_dir` y se
/// renombra al destino sólo cuando todos los archivos se copiaron; un fallo
/// no deja un directorio parcial que una nueva ejecución confunda con uno
/// completo.
pub fn get_structures_step(search_dir: impl Into<PathBuf>, structures_dir: impl Into<PathBuf>) -> FnStep {
    let search_dir = search_dir.into();
    let structures_dir = structures_dir.into();
    FnStep::new(GET_STRUCTURES_STEP,
                StepKind::Terminal,
                move |input: RecordCollection, ctx: &StepContext<'_>| {
                    let out_dir = search_dir.join(format!("{}_structures", ctx.previous.key()));
                    if out_dir.exists() {
                        info!("structures dir {} already exists, skipping copy", out_dir.display());
                        return Ok(StepOutput::new(input));
                    }
                    copy_structures(&input, &structures_dir, &out_dir)?;
                    Ok(StepOutput::new(input))
                })
}

fn copy_structures(input: &RecordCollection, from: &Path, to: &Path) -> Result<(), StepError> {
    let parent = to.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    let staging = TempDir::new_in(parent)?;
    let mut copied = 0usize;
    for record in input.iter() {
        let id = record.get_str(MATERIAL_ID_FIELD)?;
        let src = cif_path(from, id);
        fs::copy(&src, cif_path(staging.path(), id)).map_err(|e| StepError::Other(format!("{}: {e}", src.display())))?;
        copied += 1;
    }
    fs::rename(staging.path(), to)?;
    debug!("copied {} structures into {}", copied, to.display());
    Ok(())
}
