//! Hash helpers (blake3, hex).

use blake3::Hasher;
use serde::Serialize;
use serde_json::Value;

use super::to_canonical_json;

/// Hashea un string y devuelve hex (64 caracteres).
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash del JSON canónico de `value`.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

/// Hash de cualquier tipo serializable (p. ej. una `RecordCollection`).
/// Devuelve `None` si el valor no se puede representar como JSON.
pub fn hash_serializable<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_value(value).ok().map(|v| hash_value(&v))
}
