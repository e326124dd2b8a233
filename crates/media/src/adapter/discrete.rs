//! Diskreter Adapter: ein Frame pro Anfrage
//!
//! Der Host schickt jeden Frame einzeln als `encrypt`/`decrypt` und erhaelt
//! genau eine Antwort mit derselben Request-ID.

use framesafe_crypto::{
    frame_entschluesseln, frame_verschluesseln, DurchreichGrund, EncryptionState,
    Entschluesselung, Verschluesselung,
};
use framesafe_protocol::{
    ControlMessage, ControlPayload, DecryptSuccess, EncryptSuccess, ErrorCode, FrameRequest,
    Timing,
};

use super::{AdapterArt, TransformAdapter};

/// Adapter fuer Hosts, die Frames einzeln per Nachricht uebergeben
#[derive(Debug, Default)]
pub struct DiscreteAdapter;

impl DiscreteAdapter {
    pub fn neu() -> Self {
        Self
    }

    fn verschluesseln(
        state: &mut EncryptionState,
        request_id: u32,
        anfrage: FrameRequest,
    ) -> ControlMessage {
        match frame_verschluesseln(state, anfrage.frame_data) {
            Verschluesselung::Verschluesselt { daten, dauer } => ControlMessage::new(
                request_id,
                ControlPayload::EncryptSuccess(EncryptSuccess {
                    encrypted_data: daten,
                    timing: Timing {
                        duration_us: dauer.as_micros() as u64,
                    },
                }),
            ),
            // Der Host behaelt bei einem Fehler seinen Original-Frame
            Verschluesselung::Durchgereicht {
                grund: DurchreichGrund::Fehler,
                ..
            } => ControlMessage::error(
                request_id,
                ErrorCode::EncryptionFailed,
                "Verschluesselung fehlgeschlagen",
            ),
            Verschluesselung::Durchgereicht { daten, .. } => ControlMessage::new(
                request_id,
                ControlPayload::EncryptSuccess(EncryptSuccess {
                    encrypted_data: daten,
                    timing: Timing { duration_us: 0 },
                }),
            ),
        }
    }

    fn entschluesseln(
        state: &mut EncryptionState,
        request_id: u32,
        anfrage: FrameRequest,
    ) -> ControlMessage {
        let antwort = match frame_entschluesseln(state, anfrage.frame_data) {
            Entschluesselung::Entschluesselt { daten, dauer, .. } => DecryptSuccess {
                decrypted_data: daten,
                timing: Timing {
                    duration_us: dauer.as_micros() as u64,
                },
                was_encrypted: true,
                dropped: None,
            },
            Entschluesselung::Durchgereicht(daten) => DecryptSuccess {
                decrypted_data: daten,
                timing: Timing { duration_us: 0 },
                was_encrypted: false,
                dropped: None,
            },
            Entschluesselung::Verworfen(_) => DecryptSuccess {
                decrypted_data: Default::default(),
                timing: Timing { duration_us: 0 },
                was_encrypted: true,
                dropped: Some(true),
            },
        };
        ControlMessage::new(request_id, ControlPayload::DecryptSuccess(antwort))
    }
}

impl TransformAdapter for DiscreteAdapter {
    fn art(&self) -> AdapterArt {
        AdapterArt::Discrete
    }

    fn frame_anfrage(
        &mut self,
        state: &mut EncryptionState,
        request_id: u32,
        payload: ControlPayload,
    ) -> ControlMessage {
        match payload {
            ControlPayload::Encrypt(anfrage) => Self::verschluesseln(state, request_id, anfrage),
            ControlPayload::Decrypt(anfrage) => Self::entschluesseln(state, request_id, anfrage),
            andere => ControlMessage::error(
                request_id,
                ErrorCode::UnknownMessage,
                format!("'{}' ist keine Frame-Anfrage", andere.typ()),
            ),
        }
    }
}
