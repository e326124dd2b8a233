//! Transform-Adapter
//!
//! Zwei Integrationsvarianten mit identischem Steuerprotokoll:
//! - [`DiscreteAdapter`]: ein Frame pro Anfrage, eine Antwort pro Frame
//! - [`PipelineAdapter`]: persistente Frame-Pipeline pro Track
//!
//! Die Kryptografie liegt in beiden Faellen in `framesafe-crypto`; die
//! Adapter unterscheiden sich nur darin, wie Frames ankommen und abgehen.

mod discrete;
mod pipeline;

use std::sync::Arc;

use framesafe_crypto::EncryptionState;
use framesafe_protocol::{ControlMessage, ControlPayload, ErrorCode};
use serde::{Deserialize, Serialize};

use crate::error::{MediaError, MediaResult};
use crate::frame::{EncodedFrame, KeyframeAnforderer, PipelineId, PipelineSenke};

pub use discrete::DiscreteAdapter;
pub use pipeline::PipelineAdapter;

/// Variante eines Transform-Adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterArt {
    Discrete,
    Continuous,
}

/// Frame-Transform-Primitiven, die der Host anbietet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostFaehigkeiten {
    /// Persistente Transform-Pipeline pro Track
    pub script_transform: bool,
    /// Einzelne Frames per Nachricht
    pub encoded_streams: bool,
}

impl HostFaehigkeiten {
    /// Waehlt die Adapter-Variante, die kontinuierliche wird bevorzugt
    pub fn adapter_art(&self) -> MediaResult<AdapterArt> {
        if self.script_transform {
            Ok(AdapterArt::Continuous)
        } else if self.encoded_streams {
            Ok(AdapterArt::Discrete)
        } else {
            Err(MediaError::KeinTransform)
        }
    }

    /// Ende-zu-Ende Verschluesselung ist ueberhaupt moeglich
    pub fn e2ee_verfuegbar(&self) -> bool {
        self.adapter_art().is_ok()
    }
}

/// Gemeinsame Schnittstelle beider Adapter-Varianten
///
/// Der Transform-Kontext erledigt das gemeinsame Steuerprotokoll selbst und
/// ruft den Adapter nur fuer variantenspezifische Teile. Die Standard-
/// implementierungen lehnen ab, was eine Variante nicht kann.
pub trait TransformAdapter: Send + Sync + 'static {
    fn art(&self) -> AdapterArt;

    /// Beantwortet `encrypt` und `decrypt`
    fn frame_anfrage(
        &mut self,
        state: &mut EncryptionState,
        request_id: u32,
        payload: ControlPayload,
    ) -> ControlMessage {
        let _ = state;
        ControlMessage::error(
            request_id,
            ErrorCode::UnsupportedOperation,
            MediaError::NichtUnterstuetzt(payload.typ()).to_string(),
        )
    }

    /// Uebernimmt die Schreibseite einer neuen Pipeline
    fn pipeline_anhaengen(&mut self, id: PipelineId, senke: PipelineSenke) -> MediaResult<()> {
        let _ = (id, senke);
        Err(MediaError::NichtUnterstuetzt("pipeline"))
    }

    /// Transformiert einen Frame einer angehaengten Pipeline
    fn pipeline_frame(&mut self, state: &mut EncryptionState, id: PipelineId, frame: EncodedFrame) {
        let _ = (state, id, frame);
    }

    fn pipeline_beendet(&mut self, id: PipelineId) {
        let _ = id;
    }

    /// Aktuelle Ziele fuer Keyframe-Anforderungen
    fn sync_ziele(&self) -> Vec<Arc<dyn KeyframeAnforderer>> {
        Vec::new()
    }

    /// Gibt alle Ressourcen frei, wenn der Kontext endet
    fn aufraeumen(&mut self) {}
}
