//! Schluessel-Rotation und Keyframe-Synchronisation
//!
//! Eine Rotation hat zwei getrennte Phasen:
//! 1. **Installieren**: neuer Schluessel wird aktuell, der alte bleibt als
//!    Rueckfall. Die Verschluesselung wird dabei nie eingeschaltet.
//! 2. **Aktivieren**: erst wenn die Gegenseite den Schluessel bestaetigt hat
//!    (extern ueber die Signalisierung), wird `enabled` gesetzt.
//!
//! Nach jeder echten Installation braucht der Empfaenger einen frischen
//! Keyframe. Die Anforderung laeuft als Zustandsautomat:
//!
//! ```text
//! Leerlauf --installieren--> Wiederholen(n) --Ziel angenommen--> Erledigt
//!                                 |
//!                                 +--n == max--> Aufgegeben
//! ```

use std::sync::Arc;
use std::time::Duration;

use framesafe_crypto::{EncryptionState, FrameKey, Generation, InstallErgebnis};
use tokio::time::Instant;

use crate::config::{KontextRolle, MediaConfig};
use crate::frame::KeyframeAnforderer;

/// Zustand der Keyframe-Anforderung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyframeSync {
    Leerlauf,
    /// `versuch` Versuche sind erfolglos gelaufen, der naechste ist faellig um `naechster`
    Wiederholen { versuch: u32, naechster: Instant },
    Aufgegeben,
    Erledigt,
}

/// Koordiniert Installation, Aktivierung und Keyframe-Anforderung
#[derive(Debug)]
pub struct KeyRotation {
    rolle: KontextRolle,
    verzoegerung: Duration,
    max_versuche: u32,
    sync: KeyframeSync,
    /// Abgesetzte Keyframe-Anforderungen seit dem Start
    anforderungen: u64,
}

impl KeyRotation {
    pub fn neu(config: &MediaConfig) -> Self {
        Self {
            rolle: config.rolle,
            verzoegerung: config.keyframe_verzoegerung(),
            max_versuche: config.keyframe_versuche.max(1),
            sync: KeyframeSync::Leerlauf,
            anforderungen: 0,
        }
    }

    /// Phase 1: Schluessel installieren
    ///
    /// Startet die Keyframe-Anforderung nur, wenn sich der Schluessel
    /// tatsaechlich geaendert hat.
    pub fn installieren(
        &mut self,
        state: &mut EncryptionState,
        key: FrameKey,
        generation: Generation,
        ziele: &[Arc<dyn KeyframeAnforderer>],
        jetzt: Instant,
    ) -> InstallErgebnis {
        let ergebnis = state.schluessel_installieren(key, generation);
        if ergebnis.ist_installiert() {
            self.sync_starten(ziele, jetzt);
        }
        ergebnis
    }

    /// Phase 2: Verschluesselung nach Bestaetigung der Gegenseite einschalten
    pub fn aktivieren(&self, state: &mut EncryptionState) {
        state.aktivieren();
    }

    /// Startet die Keyframe-Anforderung neu, erster Versuch sofort
    ///
    /// Fuer reine Sender-Kontexte ohne Wirkung.
    pub fn sync_starten(&mut self, ziele: &[Arc<dyn KeyframeAnforderer>], jetzt: Instant) {
        if !self.rolle.empfaengt() {
            return;
        }
        self.versuchen(0, ziele, jetzt);
    }

    /// Zeitpunkt des naechsten faelligen Versuchs
    pub fn faellig(&self) -> Option<Instant> {
        match self.sync {
            KeyframeSync::Wiederholen { naechster, .. } => Some(naechster),
            _ => None,
        }
    }

    /// Fuehrt einen faelligen Versuch aus
    pub fn tick(&mut self, ziele: &[Arc<dyn KeyframeAnforderer>], jetzt: Instant) {
        if let KeyframeSync::Wiederholen { versuch, naechster } = self.sync {
            if jetzt >= naechster {
                self.versuchen(versuch, ziele, jetzt);
            }
        }
    }

    /// Bricht eine laufende Anforderung ab (cleanup)
    pub fn abbrechen(&mut self) {
        self.sync = KeyframeSync::Leerlauf;
    }

    pub fn zustand(&self) -> KeyframeSync {
        self.sync
    }

    pub fn anforderungen(&self) -> u64 {
        self.anforderungen
    }

    fn versuchen(&mut self, bisher: u32, ziele: &[Arc<dyn KeyframeAnforderer>], jetzt: Instant) {
        let versuch = bisher + 1;

        let mut angenommen = false;
        for ziel in ziele {
            if ziel.keyframe_anfordern() {
                angenommen = true;
                self.anforderungen += 1;
            }
        }

        self.sync = if angenommen {
            tracing::debug!(versuch, ziele = ziele.len(), "Keyframe angefordert");
            KeyframeSync::Erledigt
        } else if versuch >= self.max_versuche {
            tracing::debug!(versuch, "Keine Keyframe-Ziele, Anforderung aufgegeben");
            KeyframeSync::Aufgegeben
        } else {
            tracing::trace!(versuch, "Kein Keyframe-Ziel verfuegbar, neuer Versuch geplant");
            KeyframeSync::Wiederholen {
                versuch,
                naechster: jetzt + self.verzoegerung,
            }
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use framesafe_crypto::FrameKeyAlgorithm;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Zaehler(AtomicU32);

    impl KeyframeAnforderer for Zaehler {
        fn keyframe_anfordern(&self) -> bool {
            self.0.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    fn key() -> FrameKey {
        FrameKey::generieren(FrameKeyAlgorithm::Aes256Gcm)
    }

    fn gen(wert: u8) -> Generation {
        Generation::new(wert).unwrap()
    }

    #[test]
    fn installation_aktiviert_nicht() {
        let mut rotation = KeyRotation::neu(&MediaConfig::default());
        let mut state = EncryptionState::new();

        rotation.installieren(&mut state, key(), gen(1), &[], Instant::now());

        assert!(state.hat_schluessel());
        assert!(!state.ist_aktiviert());
        rotation.aktivieren(&mut state);
        assert!(state.ist_aktiviert());
    }

    #[test]
    fn sofortiger_versuch_mit_ziel() {
        let mut rotation = KeyRotation::neu(&MediaConfig::default());
        let mut state = EncryptionState::new();
        let zaehler = Arc::new(Zaehler::default());
        let ziele: Vec<Arc<dyn KeyframeAnforderer>> = vec![zaehler.clone()];

        rotation.installieren(&mut state, key(), gen(1), &ziele, Instant::now());

        assert_eq!(rotation.zustand(), KeyframeSync::Erledigt);
        assert_eq!(zaehler.0.load(Ordering::SeqCst), 1);
        assert_eq!(rotation.anforderungen(), 1);
    }

    #[test]
    fn duplikat_loest_keinen_keyframe_aus() {
        let mut rotation = KeyRotation::neu(&MediaConfig::default());
        let mut state = EncryptionState::new();
        let zaehler = Arc::new(Zaehler::default());
        let ziele: Vec<Arc<dyn KeyframeAnforderer>> = vec![zaehler.clone()];

        rotation.installieren(&mut state, key(), gen(3), &ziele, Instant::now());
        let erg = rotation.installieren(&mut state, key(), gen(3), &ziele, Instant::now());

        assert_eq!(erg, InstallErgebnis::Unveraendert);
        assert_eq!(zaehler.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn ohne_ziel_wird_wiederholt_und_aufgegeben() {
        let config = MediaConfig::default();
        let mut rotation = KeyRotation::neu(&config);
        let mut state = EncryptionState::new();
        let start = Instant::now();

        rotation.installieren(&mut state, key(), gen(1), &[], start);
        assert_eq!(
            rotation.zustand(),
            KeyframeSync::Wiederholen {
                versuch: 1,
                naechster: start + Duration::from_millis(100)
            }
        );

        let mut jetzt = start;
        while let Some(naechster) = rotation.faellig() {
            jetzt = naechster;
            rotation.tick(&[], jetzt);
        }

        assert_eq!(rotation.zustand(), KeyframeSync::Aufgegeben);
        // 10 Versuche: sofort + 9 Wiederholungen im Abstand von 100 ms
        assert_eq!(jetzt - start, Duration::from_millis(900));
    }

    #[test]
    fn spaeteres_ziel_beendet_wiederholung() {
        let mut rotation = KeyRotation::neu(&MediaConfig::default());
        let mut state = EncryptionState::new();
        let start = Instant::now();
        rotation.installieren(&mut state, key(), gen(1), &[], start);

        let zaehler = Arc::new(Zaehler::default());
        let ziele: Vec<Arc<dyn KeyframeAnforderer>> = vec![zaehler.clone()];

        // Zu frueh: nichts passiert
        rotation.tick(&ziele, start + Duration::from_millis(50));
        assert_eq!(zaehler.0.load(Ordering::SeqCst), 0);

        rotation.tick(&ziele, start + Duration::from_millis(100));
        assert_eq!(rotation.zustand(), KeyframeSync::Erledigt);
        assert_eq!(zaehler.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn sender_rolle_fordert_nie_an() {
        let config = MediaConfig {
            rolle: KontextRolle::Sender,
            ..Default::default()
        };
        let mut rotation = KeyRotation::neu(&config);
        let mut state = EncryptionState::new();
        let zaehler = Arc::new(Zaehler::default());
        let ziele: Vec<Arc<dyn KeyframeAnforderer>> = vec![zaehler.clone()];

        rotation.installieren(&mut state, key(), gen(1), &ziele, Instant::now());

        assert_eq!(rotation.zustand(), KeyframeSync::Leerlauf);
        assert_eq!(zaehler.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn abbrechen_setzt_leerlauf() {
        let mut rotation = KeyRotation::neu(&MediaConfig::default());
        let mut state = EncryptionState::new();
        rotation.installieren(&mut state, key(), gen(1), &[], Instant::now());
        assert!(rotation.faellig().is_some());

        rotation.abbrechen();
        assert_eq!(rotation.zustand(), KeyframeSync::Leerlauf);
        assert!(rotation.faellig().is_none());
    }
}
