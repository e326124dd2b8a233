//! Kontinuierlicher Adapter: persistente Pipeline pro Track
//!
//! Frames werden einzeln in Ankunftsreihenfolge transformiert und in die
//! Schreibseite der Pipeline gelegt. Eingehende Video-Pipelines bleiben als
//! Ziele fuer Keyframe-Anforderungen nach einer Rotation registriert.

use std::collections::BTreeMap;
use std::sync::Arc;

use framesafe_crypto::{frame_entschluesseln, frame_verschluesseln, EncryptionState};
use tokio::sync::mpsc;

use super::{AdapterArt, TransformAdapter};
use crate::error::MediaResult;
use crate::frame::{EncodedFrame, KeyframeAnforderer, PipelineId, PipelineSenke, Richtung};

/// Adapter fuer Hosts mit persistenten Transform-Pipelines
#[derive(Default)]
pub struct PipelineAdapter {
    senken: BTreeMap<PipelineId, PipelineSenke>,
}

impl PipelineAdapter {
    pub fn neu() -> Self {
        Self::default()
    }

    pub fn pipeline_anzahl(&self) -> usize {
        self.senken.len()
    }
}

impl TransformAdapter for PipelineAdapter {
    fn art(&self) -> AdapterArt {
        AdapterArt::Continuous
    }

    fn pipeline_anhaengen(&mut self, id: PipelineId, senke: PipelineSenke) -> MediaResult<()> {
        tracing::debug!(
            pipeline = id,
            richtung = ?senke.richtung,
            track_art = ?senke.track_art,
            "Pipeline angehaengt"
        );
        self.senken.insert(id, senke);
        Ok(())
    }

    fn pipeline_frame(&mut self, state: &mut EncryptionState, id: PipelineId, frame: EncodedFrame) {
        let Some(senke) = self.senken.get(&id) else {
            tracing::trace!(pipeline = id, "Frame fuer unbekannte Pipeline verworfen");
            return;
        };

        let ausgabe = match senke.richtung {
            Richtung::Ausgehend => {
                let daten = frame_verschluesseln(state, frame.daten.clone()).into_daten();
                Some(frame.mit_daten(daten))
            }
            Richtung::Eingehend => frame_entschluesseln(state, frame.daten.clone())
                .into_daten()
                .map(|daten| frame.mit_daten(daten)),
        };

        let Some(ausgabe) = ausgabe else {
            return;
        };

        // Echtzeit-Semantik: bei voller Ausgabe wird verworfen statt gewartet
        match senke.schreiben.try_send(ausgabe) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                state.statistik_mut().ausgabe_voll_erfassen();
                tracing::warn!(pipeline = id, "Pipeline-Ausgabe voll, Frame verworfen");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(pipeline = id, "Pipeline-Ausgabe geschlossen");
                self.senken.remove(&id);
            }
        }
    }

    fn pipeline_beendet(&mut self, id: PipelineId) {
        if self.senken.remove(&id).is_some() {
            tracing::debug!(pipeline = id, "Pipeline beendet");
        }
    }

    fn sync_ziele(&self) -> Vec<Arc<dyn KeyframeAnforderer>> {
        self.senken
            .values()
            .filter_map(PipelineSenke::keyframe_ziel)
            .collect()
    }

    fn aufraeumen(&mut self) {
        self.senken.clear();
    }
}
