//! framesafe-core – Gemeinsame Typen und Ereignisse
//!
//! Dieses Crate stellt die Identifikationstypen und Lifecycle-Ereignisse
//! bereit, die von Krypto-, Medien- und Worker-Crate gemeinsam genutzt werden.

pub mod event;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use event::{StreamEvent, StreamEventArt, StreamMetadata, StreamZweck};
pub use types::{StreamId, TrackArt, TrackId};
