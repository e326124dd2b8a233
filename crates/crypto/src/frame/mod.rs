//! Frame-Verschluesselung
//!
//! Verschluesselt und entschluesselt einzelne Media-Frames in einem
//! Transform-Kontext. Jeder Kontext besitzt genau einen [`EncryptionState`].
//!
//! ## Ablauf
//! 1. Schluessel wird mit Generation installiert (alter Schluessel wird "vorheriger")
//! 2. Verschluesselung erst nach expliziter Aktivierung
//! 3. Entschluesselung sobald ein Schluessel vorhanden ist, mit Rueckfall
//!    auf den vorherigen Schluessel fuer Frames aus der Rotation
//! 4. `cleanup` setzt den Zustand auf leer zurueck

pub mod codec;
pub mod engine;
pub mod key_store;
pub mod state;
pub mod stats;

pub use codec::{decode, encode, generation_von, sieht_verschluesselt_aus};
pub use engine::{
    frame_entschluesseln, frame_verschluesseln, DurchreichGrund, Entschluesselung,
    Verschluesselung, VerwerfGrund,
};
pub use key_store::{InstallErgebnis, KeyMaterial, KeyStore};
pub use state::EncryptionState;
pub use stats::FrameStatistik;
