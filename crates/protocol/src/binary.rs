//! Base64-Kodierung fuer Binaerfelder
//!
//! Frame-Daten und Schluessel werden im JSON-Protokoll als Base64-String
//! uebertragen. Intern bleiben sie `Bytes`, damit die Weitergabe zwischen
//! Host und Kontext ohne Kopie auskommt.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serializer};

/// `#[serde(with = "crate::binary")]` fuer Pflichtfelder
pub fn serialize<S: Serializer>(daten: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(daten))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
    let text = String::deserialize(deserializer)?;
    STANDARD
        .decode(text.as_bytes())
        .map(Bytes::from)
        .map_err(serde::de::Error::custom)
}

/// `#[serde(with = "crate::binary::optional")]` fuer optionale Felder
pub mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(
        daten: &Option<Bytes>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match daten {
            Some(d) => serializer.serialize_some(&STANDARD.encode(d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Bytes>, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        text.map(|t| {
            STANDARD
                .decode(t.as_bytes())
                .map(Bytes::from)
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}
