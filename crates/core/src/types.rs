//! Gemeinsame Identifikationstypen fuer framesafe
//!
//! Stream- und Track-IDs verwenden das Newtype-Pattern, damit die beiden
//! ID-Arten zur Compilezeit nicht verwechselt werden koennen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige Media-Stream-ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamId(pub Uuid);

impl StreamId {
    /// Erstellt eine neue zufaellige StreamId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for StreamId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream:{}", self.0)
    }
}

/// Eindeutige Track-ID
///
/// Die Track-Identitaet ist der Schluessel fuer die Listener-Deduplizierung
/// im Stream-Manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(pub Uuid);

impl TrackId {
    /// Erstellt eine neue zufaellige TrackId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for TrackId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "track:{}", self.0)
    }
}

/// Art eines Media-Tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackArt {
    Audio,
    Video,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_id_eindeutig() {
        let a = StreamId::new();
        let b = StreamId::new();
        assert_ne!(a, b, "Zwei neue StreamIds muessen verschieden sein");
    }

    #[test]
    fn track_id_display() {
        let id = TrackId(Uuid::nil());
        assert!(id.to_string().starts_with("track:"));
    }

    #[test]
    fn track_art_serde() {
        let json = serde_json::to_string(&TrackArt::Video).unwrap();
        assert_eq!(json, "\"video\"");
        let art: TrackArt = serde_json::from_str("\"audio\"").unwrap();
        assert_eq!(art, TrackArt::Audio);
    }

    #[test]
    fn ids_sind_serde_kompatibel() {
        let sid = StreamId::new();
        let json = serde_json::to_string(&sid).unwrap();
        let sid2: StreamId = serde_json::from_str(&json).unwrap();
        assert_eq!(sid, sid2);
    }
}
