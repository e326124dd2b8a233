//! Stream-Lebenszyklus
//!
//! - [`track`] – Tracks und Streams mit Listenern
//! - [`manager`] – Erstellen, Ueberwachen und Abbauen von Streams
//! - [`source`] – Aufnahme-Quellen des Hosts

pub mod manager;
pub mod source;
pub mod track;

pub use manager::{AbonnementId, StreamManager};
pub use source::{CaptureAnforderung, CaptureQuelle};
pub use track::{ListenerId, MediaStream, MediaTrack, StreamAenderung, TrackEreignis};
