//! Frame-Codec
//!
//! Kodiert einen einzelnen Frame in das Wire-Format und zurueck.
//!
//! ## Format
//! ```text
//! [generation(1)] [iv(12)] [ciphertext + auth_tag(16)]
//! ```
//!
//! Das Generations-Byte geht als AAD in die AEAD ein, damit auch eine
//! Manipulation des Headers erkannt wird. Der IV ist pro Frame zufaellig.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes128Gcm, Aes256Gcm, Nonce,
};
use bytes::{BufMut, Bytes, BytesMut};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};
use crate::types::{FrameKey, FrameKeyAlgorithm, Generation};

pub const GENERATION_LAENGE: usize = 1;
pub const IV_LAENGE: usize = 12;
pub const TAG_LAENGE: usize = 16;
pub const HEADER_LAENGE: usize = GENERATION_LAENGE + IV_LAENGE;

/// Kleinster gueltiger verschluesselter Frame (Header + Tag + 1 Byte Nutzdaten)
pub const MIN_VERSCHLUESSELT_LAENGE: usize = HEADER_LAENGE + TAG_LAENGE + 1;

/// Verschluesselt einen Frame mit Schluessel und Generation
pub fn encode(key: &FrameKey, generation: Generation, plaintext: &[u8]) -> CryptoResult<Bytes> {
    if plaintext.is_empty() {
        return Err(CryptoError::LeererFrame);
    }

    let mut iv = [0u8; IV_LAENGE];
    OsRng.fill_bytes(&mut iv);

    let aad = [generation.wert()];
    let ciphertext = aead_verschluesseln(key, &iv, &aad, plaintext)?;

    let mut out = BytesMut::with_capacity(HEADER_LAENGE + ciphertext.len());
    out.put_u8(generation.wert());
    out.put_slice(&iv);
    out.put_slice(&ciphertext);
    Ok(out.freeze())
}

/// Entschluesselt einen Frame im Wire-Format
///
/// Schlaegt bei falschem Schluessel oder manipulierten Daten fehl,
/// liefert also nie ungepruefte Daten zurueck.
pub fn decode(key: &FrameKey, frame: &[u8]) -> CryptoResult<Bytes> {
    if frame.len() < MIN_VERSCHLUESSELT_LAENGE {
        return Err(CryptoError::FrameZuKurz {
            minimum: MIN_VERSCHLUESSELT_LAENGE,
            erhalten: frame.len(),
        });
    }

    let (header, ciphertext) = frame.split_at(HEADER_LAENGE);
    let aad = &header[..GENERATION_LAENGE];
    let iv: &[u8; IV_LAENGE] = header[GENERATION_LAENGE..]
        .try_into()
        .map_err(|_| CryptoError::Entschluesselung("IV unvollstaendig".to_string()))?;

    aead_entschluesseln(key, iv, aad, ciphertext).map(Bytes::from)
}

/// Heuristik: sieht der Frame wie ein verschluesselter Frame aus?
///
/// Erstes Byte im Generationsbereich und mindestens
/// [`MIN_VERSCHLUESSELT_LAENGE`] Bytes. Das ist eine Naeherung, keine
/// kryptografische Garantie: ein Codec-Bitstream kann zufaellig passen.
pub fn sieht_verschluesselt_aus(frame: &[u8]) -> bool {
    frame.len() >= MIN_VERSCHLUESSELT_LAENGE
        && frame.first().is_some_and(|&b| Generation::ist_plausibel(b))
}

/// Liest das Generations-Byte eines verschluesselt aussehenden Frames
pub fn generation_von(frame: &[u8]) -> Option<Generation> {
    if !sieht_verschluesselt_aus(frame) {
        return None;
    }
    frame.first().and_then(|&b| Generation::new(b).ok())
}

fn aead_verschluesseln(
    key: &FrameKey,
    iv: &[u8; IV_LAENGE],
    aad: &[u8],
    plaintext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let nonce = Nonce::from_slice(iv);
    let payload = Payload {
        msg: plaintext,
        aad,
    };

    match key.algorithm() {
        FrameKeyAlgorithm::Aes128Gcm => Aes128Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?
            .encrypt(nonce, payload),
        FrameKeyAlgorithm::Aes256Gcm => Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?
            .encrypt(nonce, payload),
    }
    .map_err(|e| CryptoError::Verschluesselung(e.to_string()))
}

fn aead_entschluesseln(
    key: &FrameKey,
    iv: &[u8; IV_LAENGE],
    aad: &[u8],
    ciphertext: &[u8],
) -> CryptoResult<Vec<u8>> {
    let nonce = Nonce::from_slice(iv);
    let payload = Payload {
        msg: ciphertext,
        aad,
    };

    match key.algorithm() {
        FrameKeyAlgorithm::Aes128Gcm => Aes128Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| CryptoError::Entschluesselung(e.to_string()))?
            .decrypt(nonce, payload),
        FrameKeyAlgorithm::Aes256Gcm => Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| CryptoError::Entschluesselung(e.to_string()))?
            .decrypt(nonce, payload),
    }
    .map_err(|e| CryptoError::Entschluesselung(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
