//! Aufnahme-Quellen des Hosts
//!
//! Kamera, Mikrofon und Bildschirmfreigabe gehoeren zur Plattform. Der
//! Stream-Manager sieht sie nur ueber [`CaptureQuelle`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::track::MediaTrack;
use crate::error::MediaResult;

/// Welche Geraete fuer einen lokalen Stream geoeffnet werden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureAnforderung {
    pub audio: bool,
    pub video: bool,
}

impl Default for CaptureAnforderung {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Liefert Tracks von Aufnahmegeraeten
#[async_trait]
pub trait CaptureQuelle: Send + Sync {
    /// Oeffnet Kamera und/oder Mikrofon
    async fn kamera_oeffnen(&self, anforderung: CaptureAnforderung)
        -> MediaResult<Vec<MediaTrack>>;

    /// Startet eine Bildschirmfreigabe
    async fn bildschirm_teilen(&self) -> MediaResult<Vec<MediaTrack>>;
}
