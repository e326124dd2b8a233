//! Verschluesselungszustand eines Transform-Kontexts
//!
//! Ein expliziter Wert pro Kontext, keine globalen Instanzen. Der Kontext
//! besitzt ihn exklusiv und bearbeitet Nachrichten nacheinander, daher ist
//! kein Lock noetig.

use framesafe_protocol::FrameStats;

use crate::frame::key_store::{InstallErgebnis, KeyMaterial, KeyStore};
use crate::frame::stats::FrameStatistik;
use crate::types::{FrameKey, Generation};

/// Schluessel, Aktivierung und Statistik eines Kontexts
#[derive(Debug, Default)]
pub struct EncryptionState {
    schluessel: KeyStore,
    aktiviert: bool,
    statistik: FrameStatistik,
}

impl EncryptionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installiert einen Schluessel, aktiviert aber nie automatisch
    pub fn schluessel_installieren(
        &mut self,
        key: FrameKey,
        generation: Generation,
    ) -> InstallErgebnis {
        let ergebnis = self.schluessel.installieren(key, generation);
        match ergebnis {
            InstallErgebnis::Installiert { rotiert } => {
                tracing::info!(
                    generation = generation.wert(),
                    rotiert,
                    "Frame-Schluessel installiert"
                );
            }
            InstallErgebnis::Unveraendert => {
                tracing::warn!(
                    generation = generation.wert(),
                    "Schluessel mit gleicher Generation ignoriert"
                );
            }
        }
        ergebnis
    }

    pub fn aktivieren(&mut self) {
        if !self.aktiviert {
            tracing::info!(
                generation = self.generation(),
                hat_schluessel = self.schluessel.hat_schluessel(),
                "Verschluesselung aktiviert"
            );
        }
        self.aktiviert = true;
    }

    pub fn deaktivieren(&mut self) {
        if self.aktiviert {
            tracing::info!("Verschluesselung deaktiviert");
        }
        self.aktiviert = false;
    }

    pub fn ist_aktiviert(&self) -> bool {
        self.aktiviert
    }

    pub fn aktueller_schluessel(&self) -> Option<&KeyMaterial> {
        self.schluessel.aktuell()
    }

    pub fn vorheriger_schluessel(&self) -> Option<&KeyMaterial> {
        self.schluessel.vorherig()
    }

    pub fn hat_schluessel(&self) -> bool {
        self.schluessel.hat_schluessel()
    }

    /// Aktuelle Generation, 0 wenn kein Schluessel installiert ist
    pub fn generation(&self) -> u8 {
        self.schluessel
            .aktuell()
            .map(|m| m.generation.wert())
            .unwrap_or(0)
    }

    pub fn vorherige_generation(&self) -> Option<u8> {
        self.schluessel.vorherig().map(|m| m.generation.wert())
    }

    pub fn statistik_mut(&mut self) -> &mut FrameStatistik {
        &mut self.statistik
    }

    /// Serialisierbarer Snapshot fuer `getStats` und den periodischen Push
    pub fn stats(&self) -> FrameStats {
        self.statistik
            .snapshot(self.generation(), self.vorherige_generation(), self.aktiviert)
    }

    /// Zurueck in den leeren Anfangszustand
    pub fn zuruecksetzen(&mut self) {
        self.schluessel.leeren();
        self.aktiviert = false;
        self.statistik.zuruecksetzen();
        tracing::info!("Verschluesselungszustand zurueckgesetzt");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameKeyAlgorithm;

    fn key() -> FrameKey {
        FrameKey::generieren(FrameKeyAlgorithm::Aes256Gcm)
    }

    #[test]
    fn installation_aktiviert_nicht() {
        let mut state = EncryptionState::new();
        state.schluessel_installieren(key(), Generation::new(1).unwrap());

        assert!(state.hat_schluessel());
        assert!(!state.ist_aktiviert());
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn aktivierung_unabhaengig_vom_schluessel() {
        let mut state = EncryptionState::new();
        state.aktivieren();
        assert!(state.ist_aktiviert());
        assert!(!state.hat_schluessel());
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn stats_spiegeln_generationen() {
        let mut state = EncryptionState::new();
        state.schluessel_installieren(key(), Generation::new(1).unwrap());
        state.schluessel_installieren(key(), Generation::new(2).unwrap());
        state.aktivieren();

        let stats = state.stats();
        assert_eq!(stats.generation, 2);
        assert_eq!(stats.previous_generation, Some(1));
        assert!(stats.enabled);
    }

    #[test]
    fn zuruecksetzen_ergibt_anfangszustand() {
        let mut state = EncryptionState::new();
        state.schluessel_installieren(key(), Generation::new(3).unwrap());
        state.aktivieren();
        state.statistik_mut().durchgereicht_erfassen();

        state.zuruecksetzen();

        assert!(!state.hat_schluessel());
        assert!(!state.ist_aktiviert());
        assert_eq!(state.stats(), FrameStats::default());
    }
}
