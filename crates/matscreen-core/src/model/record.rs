//! Registros y colecciones de registros.
//!
//! Un `Record` es un mapa campo → valor JSON que describe un material
//! candidato. El motor no interpreta sus campos; sólo necesita contar
//! elementos de una colección para el log de auditoría.
//!
//! `RecordCollection` modela las dos formas en que un dataset puede viajar
//! entre steps (secuencia o mapa por identificador) como variante explícita.
//! El orquestador sólo usa `count()`; los steps deciden cómo iterar.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::StepError;

/// Registro opaco de un material. Conserva el orden de inserción de campos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Campo de texto obligatorio; error tipado si falta o no es string.
    pub fn get_str(&self, field: &str) -> Result<&str, StepError> {
        match self.0.get(field) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(StepError::InvalidRecord(format!("field '{field}' is not a string: {other}"))),
            None => Err(StepError::MissingField(field.to_string())),
        }
    }

    /// Campo entero no negativo obligatorio. Acepta floats enteros (`2.0`)
    /// porque algunas fuentes tabulares los serializan así.
    pub fn get_u64(&self, field: &str) -> Result<u64, StepError> {
        let value = self.0.get(field).ok_or_else(|| StepError::MissingField(field.to_string()))?;
        if let Some(n) = value.as_u64() {
            return Ok(n);
        }
        match value.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
            _ => Err(StepError::InvalidRecord(format!("field '{field}' is not a count: {value}"))),
        }
    }

    /// Decodifica un campo a un tipo concreto vía serde.
    pub fn get_as<T: DeserializeOwned>(&self, field: &str) -> Result<T, StepError> {
        let value = self.0.get(field).ok_or_else(|| StepError::MissingField(field.to_string()))?;
        serde_json::from_value(value.clone())
            .map_err(|e| StepError::InvalidRecord(format!("field '{field}': {e}")))
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Inserta un float; NaN e infinitos se guardan como `null`.
    pub fn insert_f64(&mut self, field: impl Into<String>, value: f64) -> Option<Value> {
        let value = serde_json::Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null);
        self.0.insert(field.into(), value)
    }

    /// Serializa un valor estructurado (p. ej. una estructura cristalina) en el campo.
    pub fn insert_typed<T: Serialize>(&mut self, field: impl Into<String>, value: &T) -> Result<Option<Value>, StepError> {
        let value = serde_json::to_value(value).map_err(|e| StepError::Other(format!("serialize field: {e}")))?;
        Ok(self.0.insert(field.into(), value))
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.shift_remove(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Record {
    type Error = StepError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StepError::InvalidRecord(format!("expected an object, found {other}"))),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Colección de registros: secuencia ordenada o mapa por identificador.
///
/// Serializa "untagged": un array JSON o un objeto JSON de objetos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordCollection {
    Sequence(Vec<Record>),
    Keyed(IndexMap<String, Record>),
}

impl Default for RecordCollection {
    fn default() -> Self {
        RecordCollection::Sequence(Vec::new())
    }
}

impl RecordCollection {
    /// Número de elementos, independiente de la forma.
    pub fn count(&self) -> usize {
        match self {
            RecordCollection::Sequence(v) => v.len(),
            RecordCollection::Keyed(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self, RecordCollection::Keyed(_))
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = &Record> + '_> {
        match self {
            RecordCollection::Sequence(v) => Box::new(v.iter()),
            RecordCollection::Keyed(m) => Box::new(m.values()),
        }
    }

    /// Conserva sólo los registros que cumplen `keep`, preservando orden y claves.
    pub fn retain<F: FnMut(&Record) -> bool>(&mut self, mut keep: F) {
        match self {
            RecordCollection::Sequence(v) => v.retain(|r| keep(r)),
            RecordCollection::Keyed(m) => m.retain(|_, r| keep(r)),
        }
    }

    /// Variante falible de `retain`: el primer error detiene el filtrado y la
    /// colección queda sin modificar.
    pub fn try_retain<F>(self, mut keep: F) -> Result<Self, StepError>
        where F: FnMut(&Record) -> Result<bool, StepError>
    {
        let shape = self.is_keyed();
        let mut kept = Vec::with_capacity(self.count());
        for (key, record) in self.into_entries() {
            if keep(&record)? {
                kept.push((key, record));
            }
        }
        Ok(Self::from_entries(shape, kept))
    }

    /// Descompone en pares (clave opcional, registro) en orden.
    pub fn into_entries(self) -> Vec<(Option<String>, Record)> {
        match self {
            RecordCollection::Sequence(v) => v.into_iter().map(|r| (None, r)).collect(),
            RecordCollection::Keyed(m) => m.into_iter().map(|(k, r)| (Some(k), r)).collect(),
        }
    }

    /// Reconstruye una colección a partir de entradas. Con `keyed = true`,
    /// las entradas sin clave reciben su índice como clave.
    pub fn from_entries(keyed: bool, entries: Vec<(Option<String>, Record)>) -> Self {
        if keyed {
            let map = entries.into_iter()
                             .enumerate()
                             .map(|(i, (k, r))| (k.unwrap_or_else(|| i.to_string()), r))
                             .collect();
            RecordCollection::Keyed(map)
        } else {
            RecordCollection::Sequence(entries.into_iter().map(|(_, r)| r).collect())
        }
    }

    /// Aplana a una secuencia, descartando las claves.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            RecordCollection::Sequence(v) => v,
            RecordCollection::Keyed(m) => m.into_values().collect(),
        }
    }
}

impl From<Vec<Record>> for RecordCollection {
    fn from(v: Vec<Record>) -> Self {
        RecordCollection::Sequence(v)
    }
}

impl From<IndexMap<String, Record>> for RecordCollection {
    fn from(m: IndexMap<String, Record>) -> Self {
        RecordCollection::Keyed(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(id: &str, n: u64) -> Record {
        Record::try_from(json!({"MaterialId": id, "NElements": n})).unwrap()
    }

    #[test]
    fn count_is_uniform_across_shapes() {
        let seq = RecordCollection::from(vec![rec("a", 1), rec("b", 2)]);
        let mut map = IndexMap::new();
        map.insert("a".to_string(), rec("a", 1));
        let keyed = RecordCollection::from(map);
        assert_eq!(seq.count(), 2);
        assert_eq!(keyed.count(), 1);
    }

    #[test]
    fn untagged_serde_picks_shape_from_json() {
        let seq: RecordCollection = serde_json::from_value(json!([{"x": 1}])).unwrap();
        let keyed: RecordCollection = serde_json::from_value(json!({"k": {"x": 1}})).unwrap();
        assert!(!seq.is_keyed());
        assert!(keyed.is_keyed());
        assert_eq!(serde_json::to_value(&keyed).unwrap(), json!({"k": {"x": 1}}));
    }

    #[test]
    fn try_retain_keeps_keys_and_order() {
        let mut map = IndexMap::new();
        map.insert("z".to_string(), rec("z", 2));
        map.insert("a".to_string(), rec("a", 3));
        map.insert("m".to_string(), rec("m", 2));
        let out = RecordCollection::Keyed(map).try_retain(|r| Ok(r.get_u64("NElements")? == 2)).unwrap();
        match out {
            RecordCollection::Keyed(m) => assert_eq!(m.keys().collect::<Vec<_>>(), vec!["z", "m"]),
            other => panic!("shape changed: {other:?}"),
        }
    }

    #[test]
    fn try_retain_propagates_missing_field() {
        let coll = RecordCollection::from(vec![Record::new()]);
        let err = coll.try_retain(|r| Ok(r.get_u64("NElements")? == 2)).unwrap_err();
        assert!(matches!(err, StepError::MissingField(f) if f == "NElements"));
    }

    #[test]
    fn non_finite_floats_become_null() {
        let mut r = Record::new();
        r.insert_f64("e_above_hull", f64::INFINITY);
        r.insert_f64("band_gap", 1.5);
        assert_eq!(r.get("e_above_hull"), Some(&Value::Null));
        assert_eq!(r.get("band_gap"), Some(&json!(1.5)));
    }

    #[test]
    fn get_u64_accepts_integral_floats() {
        let r = Record::try_from(json!({"NElements": 3.0, "bad": 2.5})).unwrap();
        assert_eq!(r.get_u64("NElements").unwrap(), 3);
        assert!(r.get_u64("bad").is_err());
    }
}
