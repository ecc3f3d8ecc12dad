//! matscreen: cribado de materiales por cadenas de filtros con checkpoints.
//!
//! - `config`: configuración de la búsqueda (entorno + `.env`).
//! - `errors`: errores de la aplicación y su código de salida.
//! - `runner`: arma y ejecuta una cadena sobre el sistema de archivos.

pub mod config;
pub mod errors;
pub mod runner;

pub use config::SearchConfig;
pub use errors::AppError;
pub use runner::{run_search, SearchRequest};
