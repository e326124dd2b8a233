//! Stream-Lifecycle-Ereignisse
//!
//! Definiert die Ereignisse, die der Stream-Manager an seine Abonnenten
//! ausstrahlt, sowie den Metadaten-Snapshot der mit ihnen mitgeliefert wird.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{StreamId, TrackId};

/// Zweck eines verwalteten Streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamZweck {
    /// Lokale Kamera/Mikrofon-Aufnahme
    LocalCamera,
    /// Lokale Bildschirmfreigabe
    LocalScreen,
    /// Vom Peer empfangener Stream
    Remote,
}

/// Metadaten eines Streams
///
/// Wird bei jeder Track-Aenderung (hinzugefuegt, entfernt, stumm, beendet)
/// neu berechnet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamMetadata {
    pub id: StreamId,
    pub zweck: StreamZweck,
    pub erstellt: DateTime<Utc>,
    pub track_ids: BTreeSet<TrackId>,
    /// Mindestens ein Video-Track ist live, aktiviert und nicht stumm
    pub hat_live_video: bool,
    /// Mindestens ein Audio-Track ist live, aktiviert und nicht stumm
    pub hat_live_audio: bool,
}

/// Namen der abonnierbaren Ereignisse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StreamEventArt {
    StreamCreated,
    StreamDestroyed,
    TrackEnded,
    TrackMuted,
    TrackUnmuted,
    TrackAdded,
    TrackRemoved,
    Error,
}

impl StreamEventArt {
    /// Gibt den Ereignis-Namen als String zurueck
    pub fn name(&self) -> &'static str {
        match self {
            Self::StreamCreated => "streamCreated",
            Self::StreamDestroyed => "streamDestroyed",
            Self::TrackEnded => "trackEnded",
            Self::TrackMuted => "trackMuted",
            Self::TrackUnmuted => "trackUnmuted",
            Self::TrackAdded => "trackAdded",
            Self::TrackRemoved => "trackRemoved",
            Self::Error => "error",
        }
    }

    /// Sucht die Ereignis-Art anhand ihres Namens
    pub fn aus_name(name: &str) -> Option<Self> {
        [
            Self::StreamCreated,
            Self::StreamDestroyed,
            Self::TrackEnded,
            Self::TrackMuted,
            Self::TrackUnmuted,
            Self::TrackAdded,
            Self::TrackRemoved,
            Self::Error,
        ]
        .into_iter()
        .find(|art| art.name() == name)
    }
}

/// Alle Ereignisse die der Stream-Manager ausstrahlt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StreamEvent {
    StreamCreated {
        stream_id: StreamId,
        metadata: StreamMetadata,
    },
    StreamDestroyed {
        stream_id: StreamId,
    },
    TrackEnded {
        stream_id: StreamId,
        track_id: TrackId,
        metadata: StreamMetadata,
    },
    TrackMuted {
        stream_id: StreamId,
        track_id: TrackId,
        metadata: StreamMetadata,
    },
    TrackUnmuted {
        stream_id: StreamId,
        track_id: TrackId,
        metadata: StreamMetadata,
    },
    TrackAdded {
        stream_id: StreamId,
        track_id: TrackId,
        metadata: StreamMetadata,
    },
    TrackRemoved {
        stream_id: StreamId,
        track_id: TrackId,
        metadata: StreamMetadata,
    },
    /// Fehler, z.B. fehlgeschlagene Aufnahme (noch ohne Stream)
    Error {
        stream_id: Option<StreamId>,
        nachricht: String,
    },
}

impl StreamEvent {
    /// Gibt die Art des Ereignisses zurueck (fuer Abonnement-Vergleich)
    pub fn art(&self) -> StreamEventArt {
        match self {
            Self::StreamCreated { .. } => StreamEventArt::StreamCreated,
            Self::StreamDestroyed { .. } => StreamEventArt::StreamDestroyed,
            Self::TrackEnded { .. } => StreamEventArt::TrackEnded,
            Self::TrackMuted { .. } => StreamEventArt::TrackMuted,
            Self::TrackUnmuted { .. } => StreamEventArt::TrackUnmuted,
            Self::TrackAdded { .. } => StreamEventArt::TrackAdded,
            Self::TrackRemoved { .. } => StreamEventArt::TrackRemoved,
            Self::Error { .. } => StreamEventArt::Error,
        }
    }

    /// Gibt die betroffene Stream-ID zurueck
    pub fn stream_id(&self) -> Option<StreamId> {
        match self {
            Self::StreamCreated { stream_id, .. }
            | Self::StreamDestroyed { stream_id }
            | Self::TrackEnded { stream_id, .. }
            | Self::TrackMuted { stream_id, .. }
            | Self::TrackUnmuted { stream_id, .. }
            | Self::TrackAdded { stream_id, .. }
            | Self::TrackRemoved { stream_id, .. } => Some(*stream_id),
            Self::Error { stream_id, .. } => *stream_id,
        }
    }

    /// Gibt den betroffenen Track zurueck, falls das Ereignis einen betrifft
    pub fn track_id(&self) -> Option<TrackId> {
        match self {
            Self::TrackEnded { track_id, .. }
            | Self::TrackMuted { track_id, .. }
            | Self::TrackUnmuted { track_id, .. }
            | Self::TrackAdded { track_id, .. }
            | Self::TrackRemoved { track_id, .. } => Some(*track_id),
            _ => None,
        }
    }
}
