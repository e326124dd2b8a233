//! framesafe-media – Transform-Kontexte und Stream-Lebenszyklus
//!
//! Verbindet die Frame-Verschluesselung aus `framesafe-crypto` mit den
//! Media-Pipelines des Hosts.
//!
//! ## Module
//! - [`context`] – Transform-Kontext als Task, Host-Handle
//! - [`adapter`] – Diskreter und kontinuierlicher Adapter
//! - [`rotation`] – Schluessel-Rotation und Keyframe-Anforderung
//! - [`frame`] – Frames und Frame-Pipelines
//! - [`stream`] – Stream-Manager, Tracks, Aufnahme-Quellen
//! - [`config`] – Einstellungen
//! - [`error`] – Fehlertypen

pub mod adapter;
pub mod config;
pub mod context;
pub mod error;
pub mod frame;
pub mod rotation;
pub mod stream;

pub use adapter::{AdapterArt, DiscreteAdapter, HostFaehigkeiten, PipelineAdapter, TransformAdapter};
pub use config::{HostProfil, KontextRolle, MediaConfig};
pub use context::{adapter_starten, kontext_starten, AdapterHandle, KontextSender};
pub use error::{MediaError, MediaResult};
pub use frame::{
    pipeline_erstellen, EncodedFrame, FramePipeline, FrameTyp, KeyframeAnforderer, PipelineEnden,
    PipelineId, Richtung,
};
pub use rotation::{KeyRotation, KeyframeSync};
pub use stream::{MediaStream, MediaTrack, StreamManager};
