//! framesafe-protocol – Steuerprotokoll der Transform-Kontexte
//!
//! Dieses Crate definiert alle Nachrichten, die zwischen Host und einem
//! Transform-Kontext ausgetauscht werden, sowie den Statistik-Snapshot.
//!
//! ## Module
//! - [`control`] – Request/Response-Nachrichten (init, updateKey, encrypt, ...)
//! - [`stats`] – Serialisierbarer Frame-Statistik-Snapshot
//! - [`binary`] – Base64-Kodierung fuer Binaerfelder in JSON

pub mod binary;
pub mod control;
pub mod stats;

pub use control::{
    ControlMessage, ControlPayload, DecryptSuccess, EncryptSuccess, ErrorCode, ErrorResponse,
    FrameRequest, InitRequest, KeyUpdated, ProtocolError, Timing, UpdateKeyRequest,
    UNAUFGEFORDERT,
};
pub use stats::FrameStats;
