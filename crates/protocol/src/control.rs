//! Steuerprotokoll (Host <-> Transform-Kontext)
//!
//! Definiert alle Nachrichten die zwischen dem Host und einem
//! Transform-Kontext ausgetauscht werden.
//!
//! ## Design
//! - Request/Response Pattern: jede Nachricht hat eine `request_id: u32`,
//!   Antworten tragen die ID der Anfrage
//! - Unaufgeforderte Nachrichten (periodische Statistik) tragen
//!   [`UNAUFGEFORDERT`]
//! - JSON-Serialisierung via serde, Binaerfelder als Base64
//! - Tagged Enums fuer typsichere Nachrichtentypen

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::FrameStats;

/// Request-ID fuer Nachrichten, die auf keine Anfrage antworten
pub const UNAUFGEFORDERT: u32 = 0;

// ---------------------------------------------------------------------------
// Fehler-Codes
// ---------------------------------------------------------------------------

/// Standardisierte Fehler-Codes fuer Error-Responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Verschluesselung fehlgeschlagen, der Host reicht den Original-Frame weiter
    EncryptionFailed,
    /// Entschluesselung fehlgeschlagen, der Frame wurde verworfen
    DecryptionFailed,
    /// Verschluesselter Frame ohne installierten Schluessel
    NoKey,
    /// Nachricht wird von dieser Adapter-Variante nicht unterstuetzt
    UnsupportedOperation,
    /// Unbekannter Nachrichtentyp
    UnknownMessage,
    /// Ungueltige Parameter (Schluessel-Laenge, Generation, JSON)
    InvalidRequest,
    InternalError,
}

// ---------------------------------------------------------------------------
// Nachrichten-Inhalte
// ---------------------------------------------------------------------------

/// Initialisierung des Kontexts, optional direkt mit Schluessel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRequest {
    #[serde(default, with = "crate::binary::optional", skip_serializing_if = "Option::is_none")]
    pub key: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<u8>,
}

/// Neuer Schluessel von der Signalisierung
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKeyRequest {
    #[serde(with = "crate::binary")]
    pub key: Bytes,
    pub generation: u8,
}

/// Bestaetigung eines `updateKey`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyUpdated {
    pub generation: u8,
    /// false wenn das Update ein Duplikat war (gleiche Generation, Schluessel vorhanden)
    pub changed: bool,
}

/// Einzelner Frame fuer den diskreten Adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRequest {
    #[serde(with = "crate::binary")]
    pub frame_data: Bytes,
}

/// Dauer einer Frame-Operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub duration_us: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptSuccess {
    #[serde(with = "crate::binary")]
    pub encrypted_data: Bytes,
    pub timing: Timing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptSuccess {
    /// Leer wenn der Frame verworfen wurde
    #[serde(with = "crate::binary")]
    pub decrypted_data: Bytes,
    pub timing: Timing,
    pub was_encrypted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropped: Option<bool>,
}

/// Strukturierte Fehler-Antwort
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

// ---------------------------------------------------------------------------
// ControlPayload – Alle Nachrichtentypen
// ---------------------------------------------------------------------------

/// Inhalt einer Steuernachricht
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlPayload {
    // Anfragen
    Init(InitRequest),
    UpdateKey(UpdateKeyRequest),
    EnableEncryption,
    DisableEncryption,
    GetStats,
    Cleanup,
    /// Nur kontinuierlicher Adapter: Keyframe manuell anfordern
    RequestKeyframe,
    /// Nur diskreter Adapter
    Encrypt(FrameRequest),
    /// Nur diskreter Adapter
    Decrypt(FrameRequest),

    // Antworten
    Ready,
    KeyUpdated(KeyUpdated),
    Stats(FrameStats),
    CleanupComplete,
    KeyframeRequested,
    EncryptSuccess(EncryptSuccess),
    DecryptSuccess(DecryptSuccess),
    Error(ErrorResponse),
}

impl ControlPayload {
    /// Alle bekannten Werte des `type`-Felds
    pub const TYPEN: &'static [&'static str] = &[
        "init",
        "updateKey",
        "enableEncryption",
        "disableEncryption",
        "getStats",
        "cleanup",
        "requestKeyframe",
        "encrypt",
        "decrypt",
        "ready",
        "keyUpdated",
        "stats",
        "cleanupComplete",
        "keyframeRequested",
        "encryptSuccess",
        "decryptSuccess",
        "error",
    ];

    /// Gibt true zurueck fuer Nachrichten, die ein Host an den Kontext sendet
    pub fn ist_anfrage(&self) -> bool {
        matches!(
            self,
            Self::Init(_)
                | Self::UpdateKey(_)
                | Self::EnableEncryption
                | Self::DisableEncryption
                | Self::GetStats
                | Self::Cleanup
                | Self::RequestKeyframe
                | Self::Encrypt(_)
                | Self::Decrypt(_)
        )
    }

    /// Name des Nachrichtentyps (Wert des `type`-Felds)
    pub fn typ(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::UpdateKey(_) => "updateKey",
            Self::EnableEncryption => "enableEncryption",
            Self::DisableEncryption => "disableEncryption",
            Self::GetStats => "getStats",
            Self::Cleanup => "cleanup",
            Self::RequestKeyframe => "requestKeyframe",
            Self::Encrypt(_) => "encrypt",
            Self::Decrypt(_) => "decrypt",
            Self::Ready => "ready",
            Self::KeyUpdated(_) => "keyUpdated",
            Self::Stats(_) => "stats",
            Self::CleanupComplete => "cleanupComplete",
            Self::KeyframeRequested => "keyframeRequested",
            Self::EncryptSuccess(_) => "encryptSuccess",
            Self::DecryptSuccess(_) => "decryptSuccess",
            Self::Error(_) => "error",
        }
    }
}

// ---------------------------------------------------------------------------
// ControlMessage – Umschlag
// ---------------------------------------------------------------------------

/// Steuernachricht mit Request-ID, damit der Host Anfrage und Antwort
/// zuordnen kann.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlMessage {
    /// Nachrichten-ID fuer Request/Response-Zuordnung
    pub request_id: u32,
    /// Inhalt der Nachricht
    pub payload: ControlPayload,
}

/// Fehler beim Lesen einer Steuernachricht
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Unbekannter Nachrichtentyp '{typ}'")]
    UnbekannteNachricht { request_id: u32, typ: String },

    #[error("Ungueltige Nachricht: {grund}")]
    UngueltigeNachricht { request_id: u32, grund: String },
}

impl ProtocolError {
    /// Request-ID der fehlerhaften Nachricht (0 falls nicht lesbar)
    pub fn request_id(&self) -> u32 {
        match self {
            Self::UnbekannteNachricht { request_id, .. }
            | Self::UngueltigeNachricht { request_id, .. } => *request_id,
        }
    }

    /// Wandelt den Fehler in eine Error-Antwort um
    pub fn als_antwort(&self) -> ControlMessage {
        let code = match self {
            Self::UnbekannteNachricht { .. } => ErrorCode::UnknownMessage,
            Self::UngueltigeNachricht { .. } => ErrorCode::InvalidRequest,
        };
        ControlMessage::error(self.request_id(), code, self.to_string())
    }
}

impl ControlMessage {
    /// Erstellt eine neue Control-Nachricht
    pub fn new(request_id: u32, payload: ControlPayload) -> Self {
        Self {
            request_id,
            payload,
        }
    }

    /// Erstellt eine Fehler-Antwort
    pub fn error(request_id: u32, code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(
            request_id,
            ControlPayload::Error(ErrorResponse {
                code,
                message: message.into(),
            }),
        )
    }

    /// Erstellt eine unaufgeforderte Statistik-Nachricht
    pub fn stats_push(stats: FrameStats) -> Self {
        Self::new(UNAUFGEFORDERT, ControlPayload::Stats(stats))
    }

    /// Gibt true zurueck wenn die Nachricht auf keine Anfrage antwortet
    pub fn ist_unaufgefordert(&self) -> bool {
        self.request_id == UNAUFGEFORDERT
    }

    /// Serialisiert die Nachricht als JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialisiert eine Nachricht aus JSON
    ///
    /// Unterscheidet unbekannte Nachrichtentypen von sonst ungueltigem JSON,
    /// damit der Host eine passende Fehler-Antwort mit seiner Request-ID erhaelt.
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        let wert: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ProtocolError::UngueltigeNachricht {
                request_id: UNAUFGEFORDERT,
                grund: e.to_string(),
            })?;

        let request_id = wert
            .get("requestId")
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(UNAUFGEFORDERT);

        let typ = wert
            .get("payload")
            .and_then(|p| p.get("type"))
            .and_then(|t| t.as_str());

        match typ {
            Some(t) if !ControlPayload::TYPEN.contains(&t) => {
                return Err(ProtocolError::UnbekannteNachricht {
                    request_id,
                    typ: t.to_string(),
                });
            }
            None => {
                return Err(ProtocolError::UngueltigeNachricht {
                    request_id,
                    grund: "Feld 'payload.type' fehlt".to_string(),
                });
            }
            Some(_) => {}
        }

        serde_json::from_value(wert).map_err(|e| ProtocolError::UngueltigeNachricht {
            request_id,
            grund: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_key_serialisierung() {
        let msg = ControlMessage::new(
            7,
            ControlPayload::UpdateKey(UpdateKeyRequest {
                key: Bytes::from(vec![1u8; 16]),
                generation: 2,
            }),
        );
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"type\":\"updateKey\""));
        assert!(json.contains("\"requestId\":7"));

        let decoded = ControlMessage::from_json(&json).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn init_ohne_schluessel() {
        let decoded =
            ControlMessage::from_json(r#"{"requestId":1,"payload":{"type":"init"}}"#).unwrap();
        assert_eq!(
            decoded.payload,
            ControlPayload::Init(InitRequest::default())
        );
    }

    #[test]
    fn error_response_serialisierung() {
        let msg = ControlMessage::error(42, ErrorCode::UnsupportedOperation, "Nicht hier");
        let json = msg.to_json().unwrap();
        assert!(json.contains("UNSUPPORTED_OPERATION"));
        let decoded = ControlMessage::from_json(&json).unwrap();
        assert_eq!(decoded.request_id, 42);
        if let ControlPayload::Error(e) = decoded.payload {
            assert_eq!(e.code, ErrorCode::UnsupportedOperation);
            assert_eq!(e.message, "Nicht hier");
        } else {
            panic!("Erwartet Error-Payload");
        }
    }

    #[test]
    fn unbekannter_typ_behaelt_request_id() {
        let err = ControlMessage::from_json(r#"{"requestId":9,"payload":{"type":"reboot"}}"#)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::UnbekannteNachricht { request_id: 9, .. }));

        let antwort = err.als_antwort();
        assert_eq!(antwort.request_id, 9);
        match antwort.payload {
            ControlPayload::Error(e) => assert_eq!(e.code, ErrorCode::UnknownMessage),
            other => panic!("Erwartet Error, erhalten {other:?}"),
        }
    }

    #[test]
    fn kaputtes_json_ist_ungueltig() {
        let err = ControlMessage::from_json("{nicht json").unwrap_err();
        assert!(matches!(err, ProtocolError::UngueltigeNachricht { request_id: 0, .. }));
    }

    #[test]
    fn falsche_felder_sind_ungueltig() {
        let err = ControlMessage::from_json(
            r#"{"requestId":3,"payload":{"type":"updateKey","generation":"x"}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ProtocolError::UngueltigeNachricht { request_id: 3, .. }));
    }

    #[test]
    fn typ_namen_sind_vollstaendig() {
        let beispiele = [
            ControlPayload::GetStats,
            ControlPayload::Cleanup,
            ControlPayload::RequestKeyframe,
            ControlPayload::CleanupComplete,
            ControlPayload::Ready,
        ];
        for p in beispiele {
            assert!(ControlPayload::TYPEN.contains(&p.typ()));
            let json = serde_json::to_string(&p).unwrap();
            assert!(json.contains(p.typ()));
        }
    }

    #[test]
    fn anfragen_und_antworten_unterscheiden() {
        assert!(ControlPayload::GetStats.ist_anfrage());
        assert!(!ControlPayload::Ready.ist_anfrage());
        assert!(ControlMessage::stats_push(FrameStats::default()).ist_unaufgefordert());
    }

    #[test]
    fn decrypt_success_dropped_optional() {
        let msg = ControlMessage::new(
            5,
            ControlPayload::DecryptSuccess(DecryptSuccess {
                decrypted_data: Bytes::new(),
                timing: Timing::default(),
                was_encrypted: true,
                dropped: Some(true),
            }),
        );
        let json = msg.to_json().unwrap();
        assert!(json.contains("\"wasEncrypted\":true"));
        assert!(json.contains("\"dropped\":true"));
        assert_eq!(ControlMessage::from_json(&json).unwrap(), msg);
    }
}
