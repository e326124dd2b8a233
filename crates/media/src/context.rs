//! Transform-Kontext – ein kooperativer Task pro Kontext
//!
//! Steuernachrichten und Pipeline-Frames werden nacheinander in
//! Ankunftsreihenfolge bearbeitet. Der [`EncryptionState`] gehoert dem Task
//! allein, es gibt keine Locks.
//!
//! ## Architektur
//!
//! ```text
//! AdapterHandle::senden ──┐
//! Pipeline-Weiterleiter ──┼──> mpsc Eingang ──> Kontext-Task ──> mpsc Ausgang ──> AdapterHandle::empfangen
//!                         │                        │
//!                         │                        ├─ Stats-Intervall (nur wenn aktiviert)
//!                         │                        └─ Keyframe-Wiederholung (sleep_until)
//! ```

use std::collections::{HashMap, VecDeque};

use framesafe_crypto::{EncryptionState, FrameKey, Generation};
use framesafe_protocol::{
    ControlMessage, ControlPayload, InitRequest, KeyUpdated, UpdateKeyRequest,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::adapter::{
    AdapterArt, DiscreteAdapter, HostFaehigkeiten, PipelineAdapter, TransformAdapter,
};
use crate::config::MediaConfig;
use crate::error::{MediaError, MediaResult};
use crate::frame::{EncodedFrame, FramePipeline, PipelineId};
use crate::rotation::KeyRotation;

// ---------------------------------------------------------------------------
// Eingang
// ---------------------------------------------------------------------------

enum Eingang {
    Steuerung(ControlMessage),
    PipelineAnhaengen {
        pipeline: FramePipeline,
        antwort: oneshot::Sender<MediaResult<PipelineId>>,
    },
    PipelineFrame {
        id: PipelineId,
        frame: EncodedFrame,
    },
    PipelineBeendet {
        id: PipelineId,
    },
    Beenden,
}

// ---------------------------------------------------------------------------
// Starten
// ---------------------------------------------------------------------------

/// Startet einen Kontext mit der zu den Host-Faehigkeiten passenden Variante
pub fn adapter_starten(
    faehigkeiten: HostFaehigkeiten,
    config: MediaConfig,
) -> MediaResult<AdapterHandle> {
    let handle = match faehigkeiten.adapter_art()? {
        AdapterArt::Continuous => kontext_starten(PipelineAdapter::neu(), config),
        AdapterArt::Discrete => kontext_starten(DiscreteAdapter::neu(), config),
    };
    Ok(handle)
}

/// Startet einen Transform-Kontext als eigenen Task
///
/// Muss innerhalb einer Tokio-Runtime aufgerufen werden.
pub fn kontext_starten<A: TransformAdapter>(adapter: A, config: MediaConfig) -> AdapterHandle {
    let kapazitaet = config.kanal_kapazitaet();
    let (eingang_tx, eingang_rx) = mpsc::channel(kapazitaet);
    let (ausgang_tx, ausgang_rx) = mpsc::channel(kapazitaet);
    let art = adapter.art();

    let kontext = TransformContext {
        rotation: KeyRotation::neu(&config),
        adapter,
        state: EncryptionState::new(),
        config,
        ausgang: ausgang_tx,
        eingang: eingang_tx.downgrade(),
        naechste_pipeline: 1,
        weiterleiter: HashMap::new(),
        stats_ticker: None,
    };

    let task = tokio::spawn(kontext.ausfuehren(eingang_rx));
    tracing::debug!(art = ?art, "Transform-Kontext gestartet");

    AdapterHandle {
        art,
        eingang: eingang_tx,
        ausgang: ausgang_rx,
        zurueckgestellt: VecDeque::new(),
        naechste_request_id: 1,
        task: Some(task),
    }
}

// ---------------------------------------------------------------------------
// AdapterHandle
// ---------------------------------------------------------------------------

/// Host-Seite eines laufenden Transform-Kontexts
pub struct AdapterHandle {
    art: AdapterArt,
    eingang: mpsc::Sender<Eingang>,
    ausgang: mpsc::Receiver<ControlMessage>,
    /// Nachrichten, die `anfrage` beim Warten auf eine Antwort gesehen hat
    zurueckgestellt: VecDeque<ControlMessage>,
    naechste_request_id: u32,
    task: Option<JoinHandle<()>>,
}

impl AdapterHandle {
    pub fn art(&self) -> AdapterArt {
        self.art
    }

    /// Schickt eine Steuernachricht mit eigener Request-ID
    pub async fn senden(&self, nachricht: ControlMessage) -> MediaResult<()> {
        self.eingang
            .send(Eingang::Steuerung(nachricht))
            .await
            .map_err(|_| MediaError::KontextBeendet)
    }

    /// Naechste Nachricht vom Kontext (Antworten und Stats-Pushes)
    ///
    /// Gibt `None` zurueck, wenn der Kontext beendet ist und alles gelesen wurde.
    pub async fn empfangen(&mut self) -> Option<ControlMessage> {
        if let Some(nachricht) = self.zurueckgestellt.pop_front() {
            return Some(nachricht);
        }
        self.ausgang.recv().await
    }

    /// Schickt eine Anfrage und wartet auf die Antwort mit derselben Request-ID
    ///
    /// Andere Nachrichten (z.B. Stats-Pushes) bleiben fuer `empfangen` erhalten.
    pub async fn anfrage(&mut self, payload: ControlPayload) -> MediaResult<ControlMessage> {
        let request_id = self.naechste_request_id;
        self.naechste_request_id = self.naechste_request_id.wrapping_add(1).max(1);

        self.senden(ControlMessage::new(request_id, payload)).await?;

        loop {
            let nachricht = self.ausgang.recv().await.ok_or(MediaError::KontextBeendet)?;
            if nachricht.request_id == request_id {
                return Ok(nachricht);
            }
            self.zurueckgestellt.push_back(nachricht);
        }
    }

    /// Eigene Sendeseite, z.B. fuer einen getrennten Lese-Task
    pub fn sender(&self) -> KontextSender {
        KontextSender {
            eingang: self.eingang.clone(),
        }
    }

    /// Haengt eine Frame-Pipeline an (nur kontinuierlicher Adapter)
    pub async fn pipeline_anhaengen(&self, pipeline: FramePipeline) -> MediaResult<PipelineId> {
        let (antwort, antwort_rx) = oneshot::channel();
        self.eingang
            .send(Eingang::PipelineAnhaengen { pipeline, antwort })
            .await
            .map_err(|_| MediaError::KontextBeendet)?;
        antwort_rx.await.map_err(|_| MediaError::KontextBeendet)?
    }

    /// Fordert das Ende des Kontexts an
    ///
    /// Bereits eingereihte Nachrichten werden noch bearbeitet; ihre Antworten
    /// koennen danach mit `empfangen` bis `None` gelesen werden.
    pub async fn schliessen(&self) {
        let _ = self.eingang.send(Eingang::Beenden).await;
    }

    /// Beendet den Kontext und wartet auf das Ende des Tasks
    pub async fn beenden(mut self) {
        self.schliessen().await;
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(fehler = %e, "Transform-Kontext nicht sauber beendet");
            }
        }
    }
}

/// Klonbare Sendeseite eines [`AdapterHandle`]
///
/// Der Kontext laeuft weiter, solange ein Sender oder das Handle existiert.
#[derive(Clone)]
pub struct KontextSender {
    eingang: mpsc::Sender<Eingang>,
}

impl KontextSender {
    pub async fn senden(&self, nachricht: ControlMessage) -> MediaResult<()> {
        self.eingang
            .send(Eingang::Steuerung(nachricht))
            .await
            .map_err(|_| MediaError::KontextBeendet)
    }

    /// Wie [`AdapterHandle::schliessen`]
    pub async fn schliessen(&self) {
        let _ = self.eingang.send(Eingang::Beenden).await;
    }
}

// ---------------------------------------------------------------------------
// TransformContext
// ---------------------------------------------------------------------------

struct TransformContext<A: TransformAdapter> {
    adapter: A,
    state: EncryptionState,
    rotation: KeyRotation,
    config: MediaConfig,
    ausgang: mpsc::Sender<ControlMessage>,
    /// Schwach, damit der Kontext endet wenn alle Handles weg sind
    eingang: mpsc::WeakSender<Eingang>,
    naechste_pipeline: PipelineId,
    weiterleiter: HashMap<PipelineId, JoinHandle<()>>,
    stats_ticker: Option<Interval>,
}

impl<A: TransformAdapter> TransformContext<A> {
    async fn ausfuehren(mut self, mut eingang: mpsc::Receiver<Eingang>) {
        loop {
            let keyframe_faellig = self.rotation.faellig();

            tokio::select! {
                nachricht = eingang.recv() => match nachricht {
                    Some(Eingang::Beenden) | None => break,
                    Some(e) => {
                        if !self.verarbeiten(e).await {
                            break;
                        }
                    }
                },

                _ = stats_tick(&mut self.stats_ticker) => {
                    if !self.stats_pushen() {
                        break;
                    }
                }

                _ = keyframe_frist(keyframe_faellig) => {
                    let ziele = self.adapter.sync_ziele();
                    self.rotation.tick(&ziele, Instant::now());
                }
            }
        }

        for (_, task) in self.weiterleiter.drain() {
            task.abort();
        }
        self.adapter.aufraeumen();
        tracing::debug!(art = ?self.adapter.art(), "Transform-Kontext beendet");
    }

    /// Gibt false zurueck wenn der Host nicht mehr zuhoert
    async fn verarbeiten(&mut self, eingang: Eingang) -> bool {
        match eingang {
            Eingang::Steuerung(nachricht) => {
                let antwort = self.steuerung(nachricht);
                self.antworten(antwort).await
            }
            Eingang::PipelineAnhaengen { pipeline, antwort } => {
                let _ = antwort.send(self.pipeline_anhaengen(pipeline));
                true
            }
            Eingang::PipelineFrame { id, frame } => {
                self.adapter.pipeline_frame(&mut self.state, id, frame);
                true
            }
            Eingang::PipelineBeendet { id } => {
                self.weiterleiter.remove(&id);
                self.adapter.pipeline_beendet(id);
                true
            }
            Eingang::Beenden => false,
        }
    }

    async fn antworten(&self, nachricht: ControlMessage) -> bool {
        self.ausgang.send(nachricht).await.is_ok()
    }

    /// Statistik-Push ohne Warten: liest der Host nicht, entfaellt er
    ///
    /// Gibt false zurueck wenn der Host nicht mehr zuhoert.
    fn stats_pushen(&self) -> bool {
        let push = ControlMessage::stats_push(self.state.stats());
        match self.ausgang.try_send(push) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::trace!("Ausgang voll, Statistik-Push entfaellt");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    fn steuerung(&mut self, nachricht: ControlMessage) -> ControlMessage {
        let ControlMessage {
            request_id,
            payload,
        } = nachricht;
        tracing::trace!(request_id, typ = payload.typ(), "Steuernachricht");

        let ergebnis = match payload {
            ControlPayload::Init(init) => self.init(init).map(|()| ControlPayload::Ready),
            ControlPayload::UpdateKey(update) => self.update_key(update),
            ControlPayload::EnableEncryption => {
                self.rotation.aktivieren(&mut self.state);
                self.stats_ticker_starten();
                Ok(ControlPayload::Ready)
            }
            ControlPayload::DisableEncryption => {
                self.state.deaktivieren();
                self.stats_ticker = None;
                Ok(ControlPayload::Ready)
            }
            ControlPayload::GetStats => Ok(ControlPayload::Stats(self.state.stats())),
            ControlPayload::Cleanup => {
                self.state.zuruecksetzen();
                self.rotation.abbrechen();
                self.stats_ticker = None;
                Ok(ControlPayload::CleanupComplete)
            }
            ControlPayload::RequestKeyframe => self.keyframe_anfordern(),
            frame @ (ControlPayload::Encrypt(_) | ControlPayload::Decrypt(_)) => {
                return self.adapter.frame_anfrage(&mut self.state, request_id, frame);
            }
            antwort => Err(MediaError::UnbekannteNachricht(antwort.typ())),
        };

        match ergebnis {
            Ok(payload) => ControlMessage::new(request_id, payload),
            Err(e) => {
                tracing::debug!(request_id, fehler = %e, "Steuernachricht abgelehnt");
                ControlMessage::error(request_id, e.error_code(), e.to_string())
            }
        }
    }

    fn init(&mut self, init: InitRequest) -> MediaResult<()> {
        let Some(key) = init.key else {
            tracing::debug!("Kontext ohne Schluessel initialisiert");
            return Ok(());
        };
        let generation = match init.generation {
            Some(g) => Generation::new(g)?,
            None => Generation::default(),
        };
        self.schluessel_installieren(&key, generation)?;
        Ok(())
    }

    fn update_key(&mut self, update: UpdateKeyRequest) -> MediaResult<ControlPayload> {
        let generation = Generation::new(update.generation)?;
        let changed = self.schluessel_installieren(&update.key, generation)?;
        Ok(ControlPayload::KeyUpdated(KeyUpdated {
            generation: generation.wert(),
            changed,
        }))
    }

    fn schluessel_installieren(&mut self, roh: &[u8], generation: Generation) -> MediaResult<bool> {
        let key = FrameKey::aus_rohdaten(roh)?;
        let ziele = self.adapter.sync_ziele();
        let ergebnis =
            self.rotation
                .installieren(&mut self.state, key, generation, &ziele, Instant::now());
        Ok(ergebnis.ist_installiert())
    }

    fn keyframe_anfordern(&mut self) -> MediaResult<ControlPayload> {
        if self.adapter.art() != AdapterArt::Continuous {
            return Err(MediaError::NichtUnterstuetzt("requestKeyframe"));
        }
        let ziele = self.adapter.sync_ziele();
        self.rotation.sync_starten(&ziele, Instant::now());
        Ok(ControlPayload::KeyframeRequested)
    }

    fn stats_ticker_starten(&mut self) {
        let periode = self.config.stats_intervall();
        let mut ticker = time::interval_at(Instant::now() + periode, periode);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.stats_ticker = Some(ticker);
    }

    fn pipeline_anhaengen(&mut self, pipeline: FramePipeline) -> MediaResult<PipelineId> {
        let Some(eingang) = self.eingang.upgrade() else {
            return Err(MediaError::KontextBeendet);
        };

        let id = self.naechste_pipeline;
        let (mut lesen, senke) = pipeline.aufteilen();
        self.adapter.pipeline_anhaengen(id, senke)?;
        self.naechste_pipeline += 1;

        // Frames laufen ueber den Eingang, damit sie mit den Steuernachrichten
        // in einer Reihenfolge bearbeitet werden
        let task = tokio::spawn(async move {
            while let Some(frame) = lesen.recv().await {
                if eingang.send(Eingang::PipelineFrame { id, frame }).await.is_err() {
                    return;
                }
            }
            let _ = eingang.send(Eingang::PipelineBeendet { id }).await;
        });
        self.weiterleiter.insert(id, task);

        Ok(id)
    }
}

async fn stats_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn keyframe_frist(faellig: Option<Instant>) {
    match faellig {
        Some(zeitpunkt) => time::sleep_until(zeitpunkt).await,
        None => std::future::pending().await,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
