//! Fehlertypen fuer das Kryptografie-Subsystem

use thiserror::Error;

/// Fehler im Kryptografie-Subsystem
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    #[error("Entschluesselung fehlgeschlagen: {0}")]
    Entschluesselung(String),

    #[error("Ungueltige Schluessel-Laenge: erwartet 16 oder 32, erhalten {erhalten}")]
    UngueltigeSchluesselLaenge { erhalten: usize },

    #[error("Ungueltige Generation {0}: erlaubt sind 1..=10")]
    UngueltigeGeneration(u8),

    #[error("Frame zu kurz: mindestens {minimum} Bytes, erhalten {erhalten}")]
    FrameZuKurz { minimum: usize, erhalten: usize },

    #[error("Leerer Frame kann nicht verschluesselt werden")]
    LeererFrame,

    #[error("Key Derivation fehlgeschlagen: {0}")]
    KeyDerivation(String),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
