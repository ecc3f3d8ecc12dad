//! Carga de configuración de almacenamiento desde variables de entorno.
//! Convención `MATSCREEN_SEARCH_ROOT` (directorio donde viven las búsquedas)
//! y `MATSCREEN_EXPORT` (exportar cada artifact a CSV; por defecto sí).

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub search_root: PathBuf,
    pub export: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { search_root: PathBuf::from("."), export: true }
    }
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let defaults = Self::default();
        let search_root = env::var("MATSCREEN_SEARCH_ROOT").map(PathBuf::from).unwrap_or(defaults.search_root);
        let export = env::var("MATSCREEN_EXPORT").ok().and_then(|v| parse_flag(&v)).unwrap_or(defaults.export);
        Self { search_root, export }
    }

    /// Directorio de una búsqueda concreta.
    pub fn search_dir(&self, search_name: &str) -> PathBuf {
        self.search_root.join(search_name)
    }
}

/// Interpreta valores booleanos habituales en variables de entorno.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
