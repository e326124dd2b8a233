//! Gemeinsame Typen fuer das Kryptografie-Subsystem

use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{CryptoError, CryptoResult};

/// Sicherer Schluessel-Container (wird beim Drop genullt)
#[derive(Clone)]
pub struct SecretBytes(Vec<u8>);

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED] {} bytes)", self.0.len())
    }
}

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// AEAD-Algorithmus eines Frame-Schluessels (ergibt sich aus der Laenge)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameKeyAlgorithm {
    Aes128Gcm,
    #[default]
    Aes256Gcm,
}

impl FrameKeyAlgorithm {
    /// Schluessel-Laenge in Bytes
    pub fn schluessel_laenge(&self) -> usize {
        match self {
            Self::Aes128Gcm => 16,
            Self::Aes256Gcm => 32,
        }
    }

    fn aus_laenge(laenge: usize) -> CryptoResult<Self> {
        match laenge {
            16 => Ok(Self::Aes128Gcm),
            32 => Ok(Self::Aes256Gcm),
            erhalten => Err(CryptoError::UngueltigeSchluesselLaenge { erhalten }),
        }
    }
}

/// Symmetrischer Frame-Schluessel
#[derive(Debug, Clone)]
pub struct FrameKey {
    bytes: SecretBytes,
    algorithm: FrameKeyAlgorithm,
}

/// HKDF-Info fuer abgeleitete Frame-Schluessel
const KDF_INFO: &[u8] = b"framesafe-frame-key-v1";

impl FrameKey {
    /// Uebernimmt rohes Schluesselmaterial von der Signalisierung
    ///
    /// 16 Bytes ergeben AES-128-GCM, 32 Bytes AES-256-GCM.
    pub fn aus_rohdaten(bytes: &[u8]) -> CryptoResult<Self> {
        let algorithm = FrameKeyAlgorithm::aus_laenge(bytes.len())?;
        Ok(Self {
            bytes: SecretBytes::new(bytes.to_vec()),
            algorithm,
        })
    }

    /// Leitet einen Frame-Schluessel per HKDF-SHA-256 aus einem gemeinsamen
    /// Geheimnis ab
    pub fn ableiten(
        geheimnis: &[u8],
        salt: &[u8],
        algorithm: FrameKeyAlgorithm,
    ) -> CryptoResult<Self> {
        let hk = Hkdf::<Sha256>::new(Some(salt), geheimnis);
        let mut okm = vec![0u8; algorithm.schluessel_laenge()];
        hk.expand(KDF_INFO, &mut okm)
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
        Ok(Self {
            bytes: SecretBytes::new(okm),
            algorithm,
        })
    }

    /// Erzeugt einen zufaelligen Schluessel
    pub fn generieren(algorithm: FrameKeyAlgorithm) -> Self {
        let mut bytes = vec![0u8; algorithm.schluessel_laenge()];
        OsRng.fill_bytes(&mut bytes);
        Self {
            bytes: SecretBytes::new(bytes),
            algorithm,
        }
    }

    pub fn algorithm(&self) -> FrameKeyAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_bytes()
    }
}

/// Generation eines Schluessels (1..=10)
///
/// Das erste Byte jedes verschluesselten Frames. Werte ausserhalb des
/// Bereichs kennzeichnen unverschluesselte Frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u8);

impl Generation {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Prueft den Wertebereich
    pub fn new(wert: u8) -> CryptoResult<Self> {
        if Self::ist_plausibel(wert) {
            Ok(Self(wert))
        } else {
            Err(CryptoError::UngueltigeGeneration(wert))
        }
    }

    /// Gibt true zurueck wenn `wert` als Generations-Byte in Frage kommt
    pub fn ist_plausibel(wert: u8) -> bool {
        (Self::MIN..=Self::MAX).contains(&wert)
    }

    /// Naechste Generation, nach 10 wieder 1
    pub fn naechste(&self) -> Self {
        if self.0 >= Self::MAX {
            Self(Self::MIN)
        } else {
            Self(self.0 + 1)
        }
    }

    pub fn wert(&self) -> u8 {
        self.0
    }
}

impl Default for Generation {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen:{}", self.0)
    }
}
