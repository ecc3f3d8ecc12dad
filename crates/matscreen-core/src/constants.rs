//! Constantes del motor de cadenas.
//!
//! Los nombres aquí definidos forman parte del formato observable en disco
//! (nombres de checkpoints y log de auditoría). Cambiarlos invalida la
//! reanudación de búsquedas ya comenzadas.

/// Versión lógica del motor. Entra en el `definition_hash` de cada cadena.
pub const ENGINE_VERSION: &str = "C1.0";

/// Tag del artifact inicial (posición 0) producido por la fuente de datos.
pub const INITIAL_ARTIFACT_TAG: &str = "Database";

/// Prefijo del artifact auxiliar donde se desvían los registros problemáticos.
pub const PROBLEM_RECORDS_PREFIX: &str = "ProblemRecords";

/// Campo con el que se marca un registro que falló dentro de un step.
pub const FAILED_ON_FIELD: &str = "FailedOnFilter";

/// Campo con el motivo del fallo por registro.
pub const FAILURE_REASON_FIELD: &str = "FailureReason";

/// Tamaño de batch por defecto para steps paralelos.
pub const DEFAULT_BATCH_SIZE: usize = 200;
