//! Key- und Generations-Store
//!
//! Haelt den aktuellen und den unmittelbar vorherigen Schluessel.
//! Der vorherige Schluessel existiert nur waehrend einer Rotation und wird
//! erst durch die naechste Installation (oder `cleanup`) verworfen.

use std::sync::Arc;

use crate::types::{FrameKey, Generation};

/// Schluessel mit seiner Generation
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub key: Arc<FrameKey>,
    pub generation: Generation,
}

/// Ergebnis einer Schluessel-Installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallErgebnis {
    /// Neuer Schluessel ist aktuell; `rotiert` ist true wenn ein alter
    /// Schluessel zum vorherigen wurde
    Installiert { rotiert: bool },
    /// Gleiche Generation bei vorhandenem Schluessel: nichts geaendert
    Unveraendert,
}

impl InstallErgebnis {
    pub fn ist_installiert(&self) -> bool {
        matches!(self, Self::Installiert { .. })
    }
}

/// Aktueller und vorheriger Schluessel eines Kontexts
#[derive(Debug, Default)]
pub struct KeyStore {
    aktuell: Option<KeyMaterial>,
    vorherig: Option<KeyMaterial>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installiert einen neuen Schluessel
    ///
    /// Ist die Generation identisch mit der aktuellen, ist der Aufruf ein
    /// Duplikat und aendert nichts. Sonst wird der aktuelle Schluessel zum
    /// vorherigen und ein aelterer vorheriger faellt weg.
    pub fn installieren(&mut self, key: FrameKey, generation: Generation) -> InstallErgebnis {
        if let Some(aktuell) = &self.aktuell {
            if aktuell.generation == generation {
                return InstallErgebnis::Unveraendert;
            }
        }

        let neu = KeyMaterial {
            key: Arc::new(key),
            generation,
        };
        let alt = self.aktuell.replace(neu);
        let rotiert = alt.is_some();
        if alt.is_some() {
            self.vorherig = alt;
        }

        InstallErgebnis::Installiert { rotiert }
    }

    /// Aktueller Schluessel mit Generation
    pub fn aktuell(&self) -> Option<&KeyMaterial> {
        self.aktuell.as_ref()
    }

    /// Vorheriger Schluessel (nur waehrend einer Rotation)
    pub fn vorherig(&self) -> Option<&KeyMaterial> {
        self.vorherig.as_ref()
    }

    pub fn hat_schluessel(&self) -> bool {
        self.aktuell.is_some()
    }

    /// Verwirft beide Schluessel
    pub fn leeren(&mut self) {
        self.aktuell = None;
        self.vorherig = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
