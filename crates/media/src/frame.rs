//! Frames und Frame-Pipelines
//!
//! Eine [`FramePipeline`] ist der persistente, bidirektionale Kanal, den der
//! Host pro Track fuer den kontinuierlichen Adapter bereitstellt: Frames
//! werden aus `lesen` gelesen, transformiert und in `schreiben` abgelegt.
//! Die Nutzdaten sind [`Bytes`], die Weitergabe kopiert also nicht.

use std::sync::Arc;

use bytes::Bytes;
use framesafe_core::TrackArt;
use tokio::sync::mpsc;

/// Laufende Nummer einer Pipeline innerhalb eines Kontexts
pub type PipelineId = u64;

/// Hinweis des Encoders zur Frame-Art
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTyp {
    Key,
    Delta,
}

/// Ein kodierter Audio- oder Video-Frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
    pub daten: Bytes,
    /// RTP-Zeitstempel
    pub zeitstempel: u32,
    pub typ: Option<FrameTyp>,
}

impl EncodedFrame {
    pub fn neu(daten: impl Into<Bytes>, zeitstempel: u32) -> Self {
        Self {
            daten: daten.into(),
            zeitstempel,
            typ: None,
        }
    }

    pub fn mit_typ(mut self, typ: FrameTyp) -> Self {
        self.typ = Some(typ);
        self
    }

    /// Gleicher Frame mit ersetzten Nutzdaten
    pub fn mit_daten(self, daten: Bytes) -> Self {
        Self { daten, ..self }
    }
}

/// Flussrichtung eines Tracks aus Sicht des Kontexts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Richtung {
    /// Lokal aufgenommen, wird verschluesselt
    Ausgehend,
    /// Vom Netz empfangen, wird entschluesselt
    Eingehend,
}

/// Kann beim Sender einen neuen Keyframe anfordern (z.B. per RTCP PLI)
pub trait KeyframeAnforderer: Send + Sync {
    /// Gibt true zurueck wenn die Anforderung abgesetzt werden konnte
    fn keyframe_anfordern(&self) -> bool;
}

/// Bidirektionaler Frame-Kanal eines Tracks
pub struct FramePipeline {
    pub richtung: Richtung,
    pub track_art: TrackArt,
    pub lesen: mpsc::Receiver<EncodedFrame>,
    pub schreiben: mpsc::Sender<EncodedFrame>,
    /// Nur bei eingehenden Video-Tracks sinnvoll
    pub keyframe: Option<Arc<dyn KeyframeAnforderer>>,
}

impl FramePipeline {
    /// Zerlegt die Pipeline in Leseseite und den Rest, den der Adapter behaelt
    pub fn aufteilen(self) -> (mpsc::Receiver<EncodedFrame>, PipelineSenke) {
        (
            self.lesen,
            PipelineSenke {
                richtung: self.richtung,
                track_art: self.track_art,
                schreiben: self.schreiben,
                keyframe: self.keyframe,
            },
        )
    }
}

/// Schreibseite einer Pipeline samt Metadaten
pub struct PipelineSenke {
    pub richtung: Richtung,
    pub track_art: TrackArt,
    pub schreiben: mpsc::Sender<EncodedFrame>,
    pub keyframe: Option<Arc<dyn KeyframeAnforderer>>,
}

impl PipelineSenke {
    /// Eingehende Video-Pipelines sind Ziele fuer Keyframe-Anforderungen
    pub fn keyframe_ziel(&self) -> Option<Arc<dyn KeyframeAnforderer>> {
        match (self.richtung, self.track_art) {
            (Richtung::Eingehend, TrackArt::Video) => self.keyframe.clone(),
            _ => None,
        }
    }
}

/// Host-Seite einer Pipeline fuer Tests und eingebettete Hosts
pub struct PipelineEnden {
    /// Hier legt der Host Frames zur Transformation ab
    pub eingabe: mpsc::Sender<EncodedFrame>,
    /// Hier kommen transformierte Frames heraus
    pub ausgabe: mpsc::Receiver<EncodedFrame>,
}

/// Erzeugt eine Pipeline und die zugehoerigen Host-Enden
pub fn pipeline_erstellen(
    richtung: Richtung,
    track_art: TrackArt,
    kapazitaet: usize,
    keyframe: Option<Arc<dyn KeyframeAnforderer>>,
) -> (FramePipeline, PipelineEnden) {
    let kapazitaet = kapazitaet.max(1);
    let (eingabe, lesen) = mpsc::channel(kapazitaet);
    let (schreiben, ausgabe) = mpsc::channel(kapazitaet);
    (
        FramePipeline {
            richtung,
            track_art,
            lesen,
            schreiben,
            keyframe,
        },
        PipelineEnden { eingabe, ausgabe },
    )
}
