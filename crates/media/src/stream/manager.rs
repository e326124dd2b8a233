//! Stream-Manager – Lebenszyklus lokaler und entfernter Streams
//!
//! Verwaltet pro Stream:
//! - den Stream selbst und seine Metadaten
//! - je einen Listener pro Track (beendet, stumm, laut), dedupliziert nach TrackId
//! - einen Listener fuer hinzugefuegte und entfernte Tracks
//!
//! Thread-safe durch DashMap; `Clone` teilt den inneren Zustand.
//!
//! ## Abbau eines Streams
//! 1. alle live Tracks stoppen (vor jedem anderen Schritt)
//! 2. Track- und Stream-Listener entfernen
//! 3. nur bei Hosts mit Hardware-Anzeige-Defekt: Tracks aus dem Stream loesen
//! 4. Metadaten entfernen
//! 5. `streamDestroyed` melden

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::Utc;
use dashmap::DashMap;
use framesafe_core::{
    StreamEvent, StreamEventArt, StreamId, StreamMetadata, StreamZweck, TrackArt, TrackId,
};
use parking_lot::RwLock;

use super::source::{CaptureAnforderung, CaptureQuelle};
use super::track::{ListenerId, MediaStream, MediaTrack, StreamAenderung, TrackEreignis};
use crate::config::HostProfil;
use crate::error::{MediaError, MediaResult};

/// Kennung eines Ereignis-Abonnements
pub type AbonnementId = u64;

type EventCallback = Arc<dyn Fn(&StreamEvent) + Send + Sync>;

struct Abonnement {
    id: AbonnementId,
    art: StreamEventArt,
    callback: EventCallback,
}

// ---------------------------------------------------------------------------
// StreamEintrag
// ---------------------------------------------------------------------------

struct StreamEintrag {
    stream: MediaStream,
    metadata: StreamMetadata,
    /// Registrierte Track-Listener, indexiert nach TrackId
    track_listener: HashMap<TrackId, (MediaTrack, ListenerId)>,
    stream_listener: Option<ListenerId>,
    /// Gesetzt sobald der Abbau begonnen hat
    wird_zerstoert: Arc<AtomicBool>,
}

impl StreamEintrag {
    /// Berechnet Track-Menge und Live-Flags aus dem aktuellen Track-Zustand
    fn metadata_aktualisieren(&mut self) {
        let tracks = self.stream.tracks();
        self.metadata.track_ids = tracks.iter().map(MediaTrack::id).collect();
        self.metadata.hat_live_video = tracks
            .iter()
            .any(|t| t.art() == TrackArt::Video && t.liefert_medien());
        self.metadata.hat_live_audio = tracks
            .iter()
            .any(|t| t.art() == TrackArt::Audio && t.liefert_medien());
    }
}

// ---------------------------------------------------------------------------
// StreamManager
// ---------------------------------------------------------------------------

/// Zentrale Verwaltung aller Streams einer Sitzung
#[derive(Clone)]
pub struct StreamManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    profil: HostProfil,
    streams: DashMap<StreamId, StreamEintrag>,
    abonnenten: RwLock<Vec<Abonnement>>,
    naechstes_abonnement: AtomicU64,
}

impl StreamManager {
    pub fn neu(profil: HostProfil) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                profil,
                streams: DashMap::new(),
                abonnenten: RwLock::new(Vec::new()),
                naechstes_abonnement: AtomicU64::new(1),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Erstellen
    // -----------------------------------------------------------------------

    /// Oeffnet Kamera/Mikrofon und registriert den lokalen Stream
    pub async fn lokalen_stream_erstellen(
        &self,
        quelle: &dyn CaptureQuelle,
        anforderung: CaptureAnforderung,
    ) -> MediaResult<StreamId> {
        match quelle.kamera_oeffnen(anforderung).await {
            Ok(tracks) => Ok(self.registrieren(MediaStream::neu(tracks), StreamZweck::LocalCamera)),
            Err(e) => Err(self.capture_fehler(e)),
        }
    }

    /// Startet eine Bildschirmfreigabe und registriert den Stream
    pub async fn bildschirm_stream_erstellen(
        &self,
        quelle: &dyn CaptureQuelle,
    ) -> MediaResult<StreamId> {
        match quelle.bildschirm_teilen().await {
            Ok(tracks) => Ok(self.registrieren(MediaStream::neu(tracks), StreamZweck::LocalScreen)),
            Err(e) => Err(self.capture_fehler(e)),
        }
    }

    /// Registriert einen vom Netz empfangenen Stream
    ///
    /// Ein bereits registrierter Stream wird nicht erneut angelegt.
    pub fn remote_stream_registrieren(&self, stream: MediaStream) -> StreamId {
        if self.inner.streams.contains_key(&stream.id()) {
            tracing::warn!(stream_id = %stream.id(), "Remote-Stream bereits registriert");
            return stream.id();
        }
        self.registrieren(stream, StreamZweck::Remote)
    }

    fn capture_fehler(&self, fehler: MediaError) -> MediaError {
        let fehler = match fehler {
            MediaError::Capture(_) => fehler,
            andere => MediaError::Capture(andere.to_string()),
        };
        tracing::warn!(fehler = %fehler, "Aufnahme fehlgeschlagen");
        self.melden(&StreamEvent::Error {
            stream_id: None,
            nachricht: fehler.to_string(),
        });
        fehler
    }

    fn registrieren(&self, stream: MediaStream, zweck: StreamZweck) -> StreamId {
        let stream_id = stream.id();
        let mut eintrag = StreamEintrag {
            stream: stream.clone(),
            metadata: StreamMetadata {
                id: stream_id,
                zweck,
                erstellt: Utc::now(),
                track_ids: BTreeSet::new(),
                hat_live_video: false,
                hat_live_audio: false,
            },
            track_listener: HashMap::new(),
            stream_listener: None,
            wird_zerstoert: Arc::new(AtomicBool::new(false)),
        };

        for track in stream.tracks() {
            self.track_listener_anhaengen(&mut eintrag, stream_id, track);
        }

        let schwach = Arc::downgrade(&self.inner);
        eintrag.stream_listener = Some(stream.listener_hinzufuegen(move |_, aenderung| {
            if let Some(manager) = Self::aus_schwach(&schwach) {
                manager.stream_aenderung(stream_id, aenderung);
            }
        }));

        eintrag.metadata_aktualisieren();
        let metadata = eintrag.metadata.clone();
        self.inner.streams.insert(stream_id, eintrag);

        tracing::info!(
            stream_id = %stream_id,
            zweck = ?zweck,
            tracks = metadata.track_ids.len(),
            "Stream registriert"
        );
        self.melden(&StreamEvent::StreamCreated {
            stream_id,
            metadata,
        });
        stream_id
    }

    fn aus_schwach(schwach: &Weak<ManagerInner>) -> Option<Self> {
        schwach.upgrade().map(|inner| Self { inner })
    }

    /// Haengt einen Listener an, sofern der Track noch keinen hat
    fn track_listener_anhaengen(
        &self,
        eintrag: &mut StreamEintrag,
        stream_id: StreamId,
        track: MediaTrack,
    ) {
        if eintrag.track_listener.contains_key(&track.id()) {
            return;
        }
        let schwach = Arc::downgrade(&self.inner);
        let listener_id = track.listener_hinzufuegen(move |track, ereignis| {
            if let Some(manager) = Self::aus_schwach(&schwach) {
                manager.track_ereignis(stream_id, track, ereignis);
            }
        });
        eintrag.track_listener.insert(track.id(), (track, listener_id));
    }

    // -----------------------------------------------------------------------
    // Listener-Callbacks
    // -----------------------------------------------------------------------

    fn track_ereignis(&self, stream_id: StreamId, track: &MediaTrack, ereignis: TrackEreignis) {
        let metadata = {
            let Some(mut eintrag) = self.inner.streams.get_mut(&stream_id) else {
                return;
            };
            if eintrag.wird_zerstoert.load(Ordering::SeqCst) {
                return;
            }
            eintrag.metadata_aktualisieren();
            eintrag.metadata.clone()
        };

        let track_id = track.id();
        tracing::debug!(stream_id = %stream_id, track_id = %track_id, ereignis = ?ereignis, "Track-Ereignis");
        let event = match ereignis {
            TrackEreignis::Beendet => StreamEvent::TrackEnded {
                stream_id,
                track_id,
                metadata,
            },
            TrackEreignis::Stumm => StreamEvent::TrackMuted {
                stream_id,
                track_id,
                metadata,
            },
            TrackEreignis::Laut => StreamEvent::TrackUnmuted {
                stream_id,
                track_id,
                metadata,
            },
        };
        self.melden(&event);
    }

    fn stream_aenderung(&self, stream_id: StreamId, aenderung: &StreamAenderung) {
        let event = {
            let Some(mut eintrag) = self.inner.streams.get_mut(&stream_id) else {
                return;
            };
            if eintrag.wird_zerstoert.load(Ordering::SeqCst) {
                return;
            }

            match aenderung {
                StreamAenderung::TrackHinzugefuegt(track) => {
                    self.track_listener_anhaengen(&mut eintrag, stream_id, track.clone());
                    eintrag.metadata_aktualisieren();
                    StreamEvent::TrackAdded {
                        stream_id,
                        track_id: track.id(),
                        metadata: eintrag.metadata.clone(),
                    }
                }
                StreamAenderung::TrackEntfernt(track) => {
                    if let Some((t, lid)) = eintrag.track_listener.remove(&track.id()) {
                        t.listener_entfernen(lid);
                    }
                    eintrag.metadata_aktualisieren();
                    StreamEvent::TrackRemoved {
                        stream_id,
                        track_id: track.id(),
                        metadata: eintrag.metadata.clone(),
                    }
                }
            }
        };
        self.melden(&event);
    }

    // -----------------------------------------------------------------------
    // Abbau
    // -----------------------------------------------------------------------

    /// Baut einen Stream ab
    ///
    /// Gibt false zurueck (mit Warnung) wenn die ID unbekannt ist oder der
    /// Stream bereits abgebaut wird.
    pub fn stream_zerstoeren(&self, stream_id: StreamId) -> bool {
        let (stream, track_listener, stream_listener) = {
            let Some(mut eintrag) = self.inner.streams.get_mut(&stream_id) else {
                tracing::warn!(stream_id = %stream_id, "Unbekannter Stream, nichts zu zerstoeren");
                return false;
            };
            if eintrag.wird_zerstoert.swap(true, Ordering::SeqCst) {
                tracing::warn!(stream_id = %stream_id, "Stream wird bereits zerstoert");
                return false;
            }
            let track_listener: Vec<(MediaTrack, ListenerId)> =
                eintrag.track_listener.drain().map(|(_, v)| v).collect();
            (
                eintrag.stream.clone(),
                track_listener,
                eintrag.stream_listener.take(),
            )
        };

        // 1. Tracks stoppen, bevor irgendetwas anderes passiert
        let tracks = stream.tracks();
        let gestoppt = tracks.iter().filter(|t| t.stop()).count();

        // 2. Listener entfernen
        for (track, listener_id) in &track_listener {
            track.listener_entfernen(*listener_id);
        }
        if let Some(id) = stream_listener {
            stream.listener_entfernen(id);
        }

        // 3. Hardware-Anzeige-Defekt: Tracks zusaetzlich aus dem Stream loesen
        if self.inner.profil.hardware_indicator_defect {
            for track in &tracks {
                stream.track_entfernen(track.id());
            }
        }

        // 4. Metadaten entfernen
        self.inner.streams.remove(&stream_id);

        tracing::info!(stream_id = %stream_id, gestoppt, "Stream zerstoert");

        // 5. Abonnenten benachrichtigen
        self.melden(&StreamEvent::StreamDestroyed { stream_id });
        true
    }

    /// Baut alle Streams ab und entfernt alle Abonnements
    ///
    /// Mehrfacher Aufruf ist unschaedlich.
    pub fn alle_zerstoeren(&self) {
        let ids: Vec<StreamId> = self.inner.streams.iter().map(|e| *e.key()).collect();
        let anzahl = ids.len();
        for id in ids {
            self.stream_zerstoeren(id);
        }
        self.inner.abonnenten.write().clear();
        tracing::info!(streams = anzahl, "Alle Streams zerstoert");
    }

    // -----------------------------------------------------------------------
    // Abfragen
    // -----------------------------------------------------------------------

    pub fn stream(&self, stream_id: StreamId) -> Option<MediaStream> {
        self.inner.streams.get(&stream_id).map(|e| e.stream.clone())
    }

    pub fn metadata(&self, stream_id: StreamId) -> Option<StreamMetadata> {
        self.inner.streams.get(&stream_id).map(|e| e.metadata.clone())
    }

    pub fn stream_ids(&self) -> Vec<StreamId> {
        let mut ids: Vec<StreamId> = self.inner.streams.iter().map(|e| *e.key()).collect();
        ids.sort();
        ids
    }

    /// Alle Streams eines Zwecks, z.B. alle entfernten
    pub fn streams_mit_zweck(&self, zweck: StreamZweck) -> Vec<StreamId> {
        self.inner
            .streams
            .iter()
            .filter(|e| e.metadata.zweck == zweck)
            .map(|e| *e.key())
            .collect()
    }

    pub fn anzahl(&self) -> usize {
        self.inner.streams.len()
    }

    /// Schaltet alle Tracks einer Art lokal ein oder aus (Stummschalt-Taste)
    ///
    /// Gibt die Anzahl betroffener Tracks zurueck.
    pub fn tracks_aktivieren(
        &self,
        stream_id: StreamId,
        art: TrackArt,
        aktiviert: bool,
    ) -> MediaResult<usize> {
        let mut eintrag = self
            .inner
            .streams
            .get_mut(&stream_id)
            .ok_or(MediaError::StreamUnbekannt(stream_id))?;
        let mut anzahl = 0;
        for track in eintrag.stream.tracks().iter().filter(|t| t.art() == art) {
            track.set_enabled(aktiviert);
            anzahl += 1;
        }
        eintrag.metadata_aktualisieren();
        drop(eintrag);
        tracing::debug!(stream_id = %stream_id, art = ?art, aktiviert, anzahl, "Tracks umgeschaltet");
        Ok(anzahl)
    }

    // -----------------------------------------------------------------------
    // Ereignisse
    // -----------------------------------------------------------------------

    /// Abonniert eine Ereignis-Art
    pub fn abonnieren<F>(&self, art: StreamEventArt, callback: F) -> AbonnementId
    where
        F: Fn(&StreamEvent) + Send + Sync + 'static,
    {
        let id = self.inner.naechstes_abonnement.fetch_add(1, Ordering::Relaxed);
        self.inner.abonnenten.write().push(Abonnement {
            id,
            art,
            callback: Arc::new(callback),
        });
        id
    }

    pub fn abmelden(&self, id: AbonnementId) -> bool {
        let mut abonnenten = self.inner.abonnenten.write();
        let vorher = abonnenten.len();
        abonnenten.retain(|a| a.id != id);
        abonnenten.len() != vorher
    }

    /// Ruft alle passenden Abonnenten ausserhalb des Locks auf
    fn melden(&self, event: &StreamEvent) {
        let art = event.art();
        let callbacks: Vec<EventCallback> = self
            .inner
            .abonnenten
            .read()
            .iter()
            .filter(|a| a.art == art)
            .map(|a| Arc::clone(&a.callback))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct TestQuelle {
        fehler: bool,
    }

    #[async_trait]
    impl CaptureQuelle for TestQuelle {
        async fn kamera_oeffnen(
            &self,
            anforderung: CaptureAnforderung,
        ) -> MediaResult<Vec<MediaTrack>> {
            if self.fehler {
                return Err(MediaError::Capture("Zugriff verweigert".into()));
            }
            let mut tracks = Vec::new();
            if anforderung.audio {
                tracks.push(MediaTrack::neu(TrackArt::Audio, "mikrofon"));
            }
            if anforderung.video {
                tracks.push(MediaTrack::neu(TrackArt::Video, "kamera"));
            }
            Ok(tracks)
        }

        async fn bildschirm_teilen(&self) -> MediaResult<Vec<MediaTrack>> {
            if self.fehler {
                return Err(MediaError::Capture("abgebrochen".into()));
            }
            Ok(vec![MediaTrack::neu(TrackArt::Video, "bildschirm")])
        }
    }

    fn mitschnitt(manager: &StreamManager, art: StreamEventArt) -> Arc<Mutex<Vec<StreamEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = log.clone();
        manager.abonnieren(art, move |e| l.lock().push(e.clone()));
        log
    }

    #[tokio::test]
    async fn lokaler_stream_erstellen() {
        let manager = StreamManager::neu(HostProfil::default());
        let erstellt = mitschnitt(&manager, StreamEventArt::StreamCreated);

        let id = manager
            .lokalen_stream_erstellen(&TestQuelle { fehler: false }, CaptureAnforderung::default())
            .await
            .unwrap();

        let meta = manager.metadata(id).unwrap();
        assert_eq!(meta.zweck, StreamZweck::LocalCamera);
        assert_eq!(meta.track_ids.len(), 2);
        assert!(meta.hat_live_audio);
        assert!(meta.hat_live_video);
        assert_eq!(erstellt.lock().len(), 1);
        assert_eq!(erstellt.lock()[0].stream_id(), Some(id));
    }

    #[tokio::test]
    async fn capture_fehler_meldet_error() {
        let manager = StreamManager::neu(HostProfil::default());
        let fehler = mitschnitt(&manager, StreamEventArt::Error);

        let erg = manager
            .bildschirm_stream_erstellen(&TestQuelle { fehler: true })
            .await;

        assert!(matches!(erg, Err(MediaError::Capture(_))));
        assert_eq!(fehler.lock().len(), 1);
        assert_eq!(manager.anzahl(), 0);
    }

    #[test]
    fn track_ereignisse_aktualisieren_metadaten() {
        let manager = StreamManager::neu(HostProfil::default());
        let stumm = mitschnitt(&manager, StreamEventArt::TrackMuted);
        let beendet = mitschnitt(&manager, StreamEventArt::TrackEnded);

        let video = MediaTrack::neu(TrackArt::Video, "remote-video");
        let id = manager.remote_stream_registrieren(MediaStream::neu(vec![video.clone()]));
        assert!(manager.metadata(id).unwrap().hat_live_video);

        video.stumm_setzen(true);
        assert!(!manager.metadata(id).unwrap().hat_live_video);
        match &stumm.lock()[0] {
            StreamEvent::TrackMuted { track_id, metadata, .. } => {
                assert_eq!(*track_id, video.id());
                assert!(!metadata.hat_live_video);
            }
            andere => panic!("{andere:?}"),
        }

        video.beenden_melden();
        assert_eq!(beendet.lock().len(), 1);
    }

    #[test]
    fn hinzugefuegte_tracks_werden_ueberwacht() {
        let manager = StreamManager::neu(HostProfil::default());
        let hinzugefuegt = mitschnitt(&manager, StreamEventArt::TrackAdded);
        let entfernt = mitschnitt(&manager, StreamEventArt::TrackRemoved);

        let stream = MediaStream::neu(vec![]);
        let id = manager.remote_stream_registrieren(stream.clone());
        assert!(!manager.metadata(id).unwrap().hat_live_audio);

        let audio = MediaTrack::neu(TrackArt::Audio, "remote-audio");
        stream.track_hinzufuegen(audio.clone());
        assert_eq!(hinzugefuegt.lock().len(), 1);
        assert!(manager.metadata(id).unwrap().hat_live_audio);
        assert_eq!(audio.listener_anzahl(), 1);

        stream.track_entfernen(audio.id());
        assert_eq!(entfernt.lock().len(), 1);
        assert_eq!(audio.listener_anzahl(), 0);
        assert!(manager.metadata(id).unwrap().track_ids.is_empty());
    }

    #[test]
    fn doppelte_registrierung_ohne_doppelte_listener() {
        let manager = StreamManager::neu(HostProfil::default());
        let track = MediaTrack::neu(TrackArt::Video, "v");
        let stream = MediaStream::neu(vec![track.clone()]);

        manager.remote_stream_registrieren(stream.clone());
        manager.remote_stream_registrieren(stream.clone());

        assert_eq!(manager.anzahl(), 1);
        assert_eq!(track.listener_anzahl(), 1);
        assert_eq!(stream.listener_anzahl(), 1);
    }

    #[test]
    fn zerstoeren_stoppt_tracks_ohne_ereignisse() {
        let manager = StreamManager::neu(HostProfil::default());
        let beendet = mitschnitt(&manager, StreamEventArt::TrackEnded);
        let zerstoert = mitschnitt(&manager, StreamEventArt::StreamDestroyed);

        let a = MediaTrack::neu(TrackArt::Audio, "a");
        let v = MediaTrack::neu(TrackArt::Video, "v");
        let stream = MediaStream::neu(vec![a.clone(), v.clone()]);
        let id = manager.remote_stream_registrieren(stream.clone());

        assert!(manager.stream_zerstoeren(id));

        assert!(!a.ist_live());
        assert!(!v.ist_live());
        assert_eq!(a.listener_anzahl(), 0);
        assert_eq!(stream.listener_anzahl(), 0);
        assert!(manager.metadata(id).is_none());
        assert_eq!(zerstoert.lock().len(), 1);

        // Ohne Defekt bleiben die Tracks im Stream
        assert_eq!(stream.tracks().len(), 2);

        // Spaetere Host-Ereignisse erreichen niemanden mehr
        a.beenden_melden();
        assert!(beendet.lock().is_empty());
    }

    #[test]
    fn defekt_loest_tracks_aus_dem_stream() {
        let manager = StreamManager::neu(HostProfil {
            hardware_indicator_defect: true,
        });
        let entfernt = mitschnitt(&manager, StreamEventArt::TrackRemoved);
        let stream = MediaStream::neu(vec![
            MediaTrack::neu(TrackArt::Audio, "a"),
            MediaTrack::neu(TrackArt::Video, "v"),
        ]);
        let id = manager.remote_stream_registrieren(stream.clone());

        assert!(manager.stream_zerstoeren(id));
        assert!(stream.tracks().is_empty());
        // Listener waren vorher entfernt, also kein trackRemoved
        assert!(entfernt.lock().is_empty());
    }

    #[test]
    fn unbekannte_id_ist_noop() {
        let manager = StreamManager::neu(HostProfil::default());
        let zerstoert = mitschnitt(&manager, StreamEventArt::StreamDestroyed);

        assert!(!manager.stream_zerstoeren(StreamId::new()));

        let id = manager.remote_stream_registrieren(MediaStream::neu(vec![]));
        assert!(manager.stream_zerstoeren(id));
        assert!(!manager.stream_zerstoeren(id));
        assert_eq!(zerstoert.lock().len(), 1);
    }

    #[test]
    fn alle_zerstoeren_mehrfach() {
        let manager = StreamManager::neu(HostProfil::default());
        for _ in 0..3 {
            manager.remote_stream_registrieren(MediaStream::neu(vec![MediaTrack::neu(
                TrackArt::Video,
                "v",
            )]));
        }
        let zerstoert = mitschnitt(&manager, StreamEventArt::StreamDestroyed);

        manager.alle_zerstoeren();
        manager.alle_zerstoeren();

        assert_eq!(manager.anzahl(), 0);
        assert_eq!(zerstoert.lock().len(), 3);
    }

    #[test]
    fn abmelden_beendet_benachrichtigung() {
        let manager = StreamManager::neu(HostProfil::default());
        let log = Arc::new(Mutex::new(0usize));
        let l = log.clone();
        let abo = manager.abonnieren(StreamEventArt::StreamCreated, move |_| *l.lock() += 1);

        manager.remote_stream_registrieren(MediaStream::neu(vec![]));
        assert!(manager.abmelden(abo));
        assert!(!manager.abmelden(abo));
        manager.remote_stream_registrieren(MediaStream::neu(vec![]));

        assert_eq!(*log.lock(), 1);
    }

    #[test]
    fn tracks_umschalten() {
        let manager = StreamManager::neu(HostProfil::default());
        let audio = MediaTrack::neu(TrackArt::Audio, "a");
        let id = manager.remote_stream_registrieren(MediaStream::neu(vec![
            audio.clone(),
            MediaTrack::neu(TrackArt::Video, "v"),
        ]));

        assert!(manager.metadata(id).unwrap().hat_live_audio);
        assert_eq!(manager.tracks_aktivieren(id, TrackArt::Audio, false).unwrap(), 1);
        assert!(!audio.ist_aktiviert());
        let metadata = manager.metadata(id).unwrap();
        assert!(!metadata.hat_live_audio);
        assert!(metadata.hat_live_video);

        manager.tracks_aktivieren(id, TrackArt::Audio, true).unwrap();
        assert!(manager.metadata(id).unwrap().hat_live_audio);
        assert!(matches!(
            manager.tracks_aktivieren(StreamId::new(), TrackArt::Audio, false),
            Err(MediaError::StreamUnbekannt(_))
        ));
        assert_eq!(manager.streams_mit_zweck(StreamZweck::Remote), vec![id]);
    }
}
