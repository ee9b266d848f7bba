//! models/record_model.rs
//! Registro de asistente: mapa ordenado campo -> valor, sin esquema fijo.

use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Campo que habilita el envío de correo.
pub const EMAIL_FIELD: &str = "Email";
/// Campo que usamos para identificar al asistente en los logs.
pub const DISPLAY_FIELD: &str = "Full Name";

/// Una fila del CSV tal como se guardó.
///
/// Conserva el orden de las columnas del archivo original; ese orden se
/// mantiene al serializar a JSON (para la BD y para el QR).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta o reemplaza un campo. Si ya existía, conserva su posición.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Valor del campo; `None` si no existe o si es nulo.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    #[cfg(test)]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Email sin espacios alrededor, si existe y no queda vacío.
    pub fn email(&self) -> Option<&str> {
        self.get(EMAIL_FIELD)
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get(DISPLAY_FIELD)
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, Some(v.into()));
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of string fields")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        while let Some((k, v)) = access.next_entry::<String, Option<String>>()? {
            record.insert(k, v);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Conjunto de columnas vigente (solo para mostrar en el dashboard).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnSet {
    pub headers: Vec<String>,
}
