//! Statistik-Aggregator
//!
//! Zaehlt verschluesselte, entschluesselte, durchgereichte und verworfene
//! Frames sowie die kumulierte Rechenzeit. Alle Werte sind additiv und
//! werden nur beim `cleanup` zurueckgesetzt.

use std::time::Duration;

use framesafe_protocol::FrameStats;

/// Akkumulierte Zaehler eines Transform-Kontexts
#[derive(Debug, Clone, Default)]
pub struct FrameStatistik {
    gesamt: u64,
    verschluesselt: u64,
    entschluesselt: u64,
    durchgereicht: u64,
    verworfen: u64,
    verschluesselungs_fehler: u64,
    entschluesselungs_fehler: u64,
    ohne_schluessel: u64,
    ausgabe_voll: u64,
    verschluesselungs_zeit: Duration,
    entschluesselungs_zeit: Duration,
}

impl FrameStatistik {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verschluesselt_erfassen(&mut self, dauer: Duration) {
        self.gesamt += 1;
        self.verschluesselt += 1;
        self.verschluesselungs_zeit += dauer;
    }

    pub fn entschluesselt_erfassen(&mut self, dauer: Duration) {
        self.gesamt += 1;
        self.entschluesselt += 1;
        self.entschluesselungs_zeit += dauer;
    }

    pub fn durchgereicht_erfassen(&mut self) {
        self.gesamt += 1;
        self.durchgereicht += 1;
    }

    /// Verschluesselung fehlgeschlagen, Frame wurde unveraendert weitergereicht
    pub fn verschluesselungs_fehler_erfassen(&mut self) {
        self.gesamt += 1;
        self.durchgereicht += 1;
        self.verschluesselungs_fehler += 1;
    }

    /// Entschluesselung fehlgeschlagen, Frame wurde verworfen
    pub fn entschluesselungs_fehler_erfassen(&mut self, dauer: Duration) {
        self.gesamt += 1;
        self.verworfen += 1;
        self.entschluesselungs_fehler += 1;
        self.entschluesselungs_zeit += dauer;
    }

    /// Verschluesselt aussehender Frame ohne Schluessel, wurde verworfen
    pub fn ohne_schluessel_erfassen(&mut self) {
        self.gesamt += 1;
        self.verworfen += 1;
        self.ohne_schluessel += 1;
    }

    /// Fertig transformierter Frame, den die volle Ausgabe nicht mehr annahm
    ///
    /// Der Frame ist bereits in `gesamt` enthalten.
    pub fn ausgabe_voll_erfassen(&mut self) {
        self.verworfen += 1;
        self.ausgabe_voll += 1;
    }

    pub fn gesamt(&self) -> u64 {
        self.gesamt
    }

    pub fn verworfen(&self) -> u64 {
        self.verworfen
    }

    /// Erstellt den serialisierbaren Snapshot
    pub fn snapshot(
        &self,
        generation: u8,
        vorherige_generation: Option<u8>,
        aktiviert: bool,
    ) -> FrameStats {
        FrameStats {
            total_frames: self.gesamt,
            encrypted_frames: self.verschluesselt,
            decrypted_frames: self.entschluesselt,
            passthrough_frames: self.durchgereicht,
            dropped_frames: self.verworfen,
            encryption_errors: self.verschluesselungs_fehler,
            decryption_errors: self.entschluesselungs_fehler,
            no_key_drops: self.ohne_schluessel,
            output_full_drops: self.ausgabe_voll,
            encrypt_time_us: self.verschluesselungs_zeit.as_micros() as u64,
            decrypt_time_us: self.entschluesselungs_zeit.as_micros() as u64,
            avg_encrypt_time_us: durchschnitt(self.verschluesselungs_zeit, self.verschluesselt),
            avg_decrypt_time_us: durchschnitt(
                self.entschluesselungs_zeit,
                self.entschluesselt + self.entschluesselungs_fehler,
            ),
            generation,
            previous_generation: vorherige_generation,
            enabled: aktiviert,
        }
    }

    pub fn zuruecksetzen(&mut self) {
        *self = Self::default();
    }
}

fn durchschnitt(summe: Duration, anzahl: u64) -> f64 {
    if anzahl == 0 {
        0.0
    } else {
        summe.as_micros() as f64 / anzahl as f64
    }
}
