//! Frame-Statistik-Snapshot
//!
//! Wird auf `getStats` geantwortet und bei aktivierter Verschluesselung
//! periodisch (Standard: alle 5 Sekunden) unaufgefordert gepusht.

use serde::{Deserialize, Serialize};

/// Zaehlerstand eines Transform-Kontexts
///
/// Alle Zaehler sind additiv und werden nur durch `cleanup` zurueckgesetzt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    /// Alle Frames, die den Kontext durchlaufen haben (beide Richtungen)
    pub total_frames: u64,
    pub encrypted_frames: u64,
    pub decrypted_frames: u64,
    /// Unveraendert weitergereichte Frames (nicht aktiviert, Klartext, Fehler beim Senden)
    pub passthrough_frames: u64,
    /// Verworfene Frames (Entschluesselung fehlgeschlagen, kein Schluessel
    /// oder volle Pipeline-Ausgabe)
    pub dropped_frames: u64,
    pub encryption_errors: u64,
    pub decryption_errors: u64,
    /// Verschluesselt aussehende Frames, die ohne Schluessel ankamen
    pub no_key_drops: u64,
    /// Transformierte Frames, die an einer vollen Pipeline-Ausgabe scheiterten
    #[serde(default)]
    pub output_full_drops: u64,
    /// Kumulierte Verschluesselungszeit in Mikrosekunden
    pub encrypt_time_us: u64,
    /// Kumulierte Entschluesselungszeit in Mikrosekunden
    pub decrypt_time_us: u64,
    pub avg_encrypt_time_us: f64,
    pub avg_decrypt_time_us: f64,
    /// Aktuelle Generation (0 = kein Schluessel)
    pub generation: u8,
    pub previous_generation: Option<u8>,
    pub enabled: bool,
}

impl FrameStats {
    /// Anteil verworfener Frames an allen Frames (0.0–1.0)
    pub fn verwurf_rate(&self) -> f64 {
        if self.total_frames == 0 {
            0.0
        } else {
            self.dropped_frames as f64 / self.total_frames as f64
        }
    }

    /// Gibt eine lesbare Zusammenfassung zurueck
    pub fn zusammenfassung(&self) -> String {
        format!(
            "Gen={} aktiv={} Frames={} enc={} dec={} drop={} ({:.1}%) Fehler enc/dec={}/{} ohneKey={} voll={}",
            self.generation,
            self.enabled,
            self.total_frames,
            self.encrypted_frames,
            self.decrypted_frames,
            self.dropped_frames,
            self.verwurf_rate() * 100.0,
            self.encryption_errors,
            self.decryption_errors,
            self.no_key_drops,
            self.output_full_drops,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verwurf_rate_ohne_frames() {
        assert_eq!(FrameStats::default().verwurf_rate(), 0.0);
    }

    #[test]
    fn verwurf_rate_berechnung() {
        let stats = FrameStats {
            total_frames: 10,
            dropped_frames: 2,
            ..Default::default()
        };
        assert!((stats.verwurf_rate() - 0.2).abs() < 0.001);
        assert!(stats.zusammenfassung().contains("drop=2"));
    }

    #[test]
    fn camel_case_felder() {
        let json = serde_json::to_string(&FrameStats::default()).unwrap();
        assert!(json.contains("\"noKeyDrops\""));
        assert!(json.contains("\"previousGeneration\""));
        assert!(json.contains("\"outputFullDrops\""));
    }

    #[test]
    fn aeltere_snapshots_ohne_output_full_drops() {
        let json = r#"{"totalFrames":3,"encryptedFrames":3,"decryptedFrames":0,
            "passthroughFrames":0,"droppedFrames":0,"encryptionErrors":0,
            "decryptionErrors":0,"noKeyDrops":0,"encryptTimeUs":9,"decryptTimeUs":0,
            "avgEncryptTimeUs":3.0,"avgDecryptTimeUs":0.0,"generation":1,
            "previousGeneration":null,"enabled":true}"#;
        let stats: FrameStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.output_full_drops, 0);
        assert_eq!(stats.total_frames, 3);
    }
}
