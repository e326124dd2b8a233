//! Konfiguration der Transform-Kontexte
//!
//! Alle Felder haben Standardwerte, ein leerer `[media]`-Abschnitt ergibt
//! also eine lauffaehige Konfiguration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Welche Richtungen ein Kontext bearbeitet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KontextRolle {
    /// Nur Verschluesselung ausgehender Frames
    Sender,
    /// Nur Entschluesselung eingehender Frames
    Receiver,
    #[default]
    Both,
}

impl KontextRolle {
    /// Reine Sender brauchen nach einer Rotation keinen Keyframe
    pub fn empfaengt(&self) -> bool {
        !matches!(self, Self::Sender)
    }
}

/// Eigenheiten der Host-Plattform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostProfil {
    /// Die Kamera-Anzeige erlischt erst, wenn gestoppte Tracks zusaetzlich
    /// aus ihrem Stream entfernt werden
    pub hardware_indicator_defect: bool,
}

/// Einstellungen fuer Transform-Kontexte und Stream-Manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Intervall des unaufgeforderten Statistik-Pushs in ms
    pub stats_intervall_ms: u64,
    /// Abstand der Keyframe-Wiederholungen in ms
    pub keyframe_verzoegerung_ms: u64,
    /// Maximale Anzahl Keyframe-Versuche nach einer Rotation
    pub keyframe_versuche: u32,
    /// Kapazitaet der Ein- und Ausgangskanaele eines Kontexts
    pub kanal_kapazitaet: usize,
    pub rolle: KontextRolle,
    pub host: HostProfil,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            stats_intervall_ms: 5_000,
            keyframe_verzoegerung_ms: 100,
            keyframe_versuche: 10,
            kanal_kapazitaet: 256,
            rolle: KontextRolle::default(),
            host: HostProfil::default(),
        }
    }
}

impl MediaConfig {
    pub fn stats_intervall(&self) -> Duration {
        Duration::from_millis(self.stats_intervall_ms.max(1))
    }

    pub fn keyframe_verzoegerung(&self) -> Duration {
        Duration::from_millis(self.keyframe_verzoegerung_ms)
    }

    /// Mindestens 1, sonst liefe tokio::sync::mpsc in eine Panik
    pub fn kanal_kapazitaet(&self) -> usize {
        self.kanal_kapazitaet.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardwerte() {
        let c = MediaConfig::default();
        assert_eq!(c.stats_intervall(), Duration::from_secs(5));
        assert_eq!(c.keyframe_verzoegerung(), Duration::from_millis(100));
        assert_eq!(c.keyframe_versuche, 10);
        assert_eq!(c.rolle, KontextRolle::Both);
        assert!(!c.host.hardware_indicator_defect);
    }

    #[test]
    fn kapazitaet_nie_null() {
        let c = MediaConfig {
            kanal_kapazitaet: 0,
            ..Default::default()
        };
        assert_eq!(c.kanal_kapazitaet(), 1);
    }

    #[test]
    fn sender_empfaengt_nicht() {
        assert!(!KontextRolle::Sender.empfaengt());
        assert!(KontextRolle::Receiver.empfaengt());
        assert!(KontextRolle::Both.empfaengt());
    }
}
