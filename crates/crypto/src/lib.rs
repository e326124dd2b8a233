//! # framesafe-crypto
//!
//! Ende-zu-Ende Verschluesselung einzelner Media-Frames.
//!
//! ## Module
//! - `frame` - Key-Store, Frame-Codec, Statistik und Cipher-Engine
//! - `types` - Gemeinsame Typen (FrameKey, Generation, SecretBytes)
//! - `error` - Fehlertypen

pub mod error;
pub mod frame;
pub mod types;

// Bequeme Re-Exports
pub use error::{CryptoError, CryptoResult};
pub use types::{FrameKey, FrameKeyAlgorithm, Generation, SecretBytes};

pub use frame::{
    decode, encode, frame_entschluesseln, frame_verschluesseln, sieht_verschluesselt_aus,
    DurchreichGrund, EncryptionState, Entschluesselung, FrameStatistik, InstallErgebnis,
    KeyMaterial, KeyStore, Verschluesselung, VerwerfGrund,
};
