#[cfg(unix)]
use std::fs::File;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::PersistenceError;

/// Escribe `path` de forma atómica: el contenido va a un archivo temporal en
/// el mismo directorio que luego se renombra sobre el destino. Si `write`
/// falla, el temporal se elimina al soltarse y el destino no cambia.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<(), PersistenceError>
    where F: FnOnce(&mut NamedTempFile) -> Result<(), PersistenceError>
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PersistenceError::io(dir, e))?;
    write(&mut tmp)?;
    tmp.flush().map_err(|e| PersistenceError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| PersistenceError::io(tmp.path(), e))?;
    tmp.persist(path)
       .map_err(|e| PersistenceError::Persist { path: path.to_path_buf(), message: e.error.to_string() })?;
    sync_dir(dir)
}

/// fsync del directorio para que el rename sobreviva a un corte de energía.
#[cfg(unix)]
pub(crate) fn sync_dir(dir: &Path) -> Result<(), PersistenceError> {
    File::open(dir).and_then(|d| d.sync_all()).map_err(|e| PersistenceError::io(dir, e))
}

// Windows no permite abrir un directorio como archivo.
#[cfg(not(unix))]
pub(crate) fn sync_dir(_dir: &Path) -> Result<(), PersistenceError> {
    Ok(())
}
