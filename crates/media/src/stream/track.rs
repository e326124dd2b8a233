//! Media-Tracks und -Streams
//!
//! Leichtgewichtige Abbildung der Host-Objekte: ein [`MediaTrack`] hat einen
//! Live-Zustand, kann stummgeschaltet werden und meldet Zustandswechsel an
//! registrierte Listener. Ein [`MediaStream`] buendelt Tracks und meldet
//! hinzugefuegte und entfernte Tracks.
//!
//! Listener werden ausserhalb der internen Locks aufgerufen und duerfen
//! deshalb selbst wieder auf Track oder Stream zugreifen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use framesafe_core::{StreamId, TrackArt, TrackId};
use parking_lot::Mutex;

/// Kennung eines registrierten Listeners
pub type ListenerId = u64;

// ---------------------------------------------------------------------------
// MediaTrack
// ---------------------------------------------------------------------------

/// Zustandswechsel eines Tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEreignis {
    Beendet,
    Stumm,
    Laut,
}

type TrackListener = Arc<dyn Fn(&MediaTrack, TrackEreignis) + Send + Sync>;

#[derive(Debug, Clone, Copy)]
struct TrackStatus {
    live: bool,
    stumm: bool,
    aktiviert: bool,
}

struct TrackInner {
    id: TrackId,
    art: TrackArt,
    label: String,
    status: Mutex<TrackStatus>,
    listener: Mutex<Vec<(ListenerId, TrackListener)>>,
    naechster_listener: AtomicU64,
}

/// Ein Audio- oder Video-Track (Clone teilt den Zustand)
#[derive(Clone)]
pub struct MediaTrack {
    inner: Arc<TrackInner>,
}

impl std::fmt::Debug for MediaTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = *self.inner.status.lock();
        f.debug_struct("MediaTrack")
            .field("id", &self.inner.id)
            .field("art", &self.inner.art)
            .field("label", &self.inner.label)
            .field("live", &status.live)
            .field("stumm", &status.stumm)
            .finish()
    }
}

impl MediaTrack {
    pub fn neu(art: TrackArt, label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(TrackInner {
                id: TrackId::new(),
                art,
                label: label.into(),
                status: Mutex::new(TrackStatus {
                    live: true,
                    stumm: false,
                    aktiviert: true,
                }),
                listener: Mutex::new(Vec::new()),
                naechster_listener: AtomicU64::new(1),
            }),
        }
    }

    pub fn id(&self) -> TrackId {
        self.inner.id
    }

    pub fn art(&self) -> TrackArt {
        self.inner.art
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub fn ist_live(&self) -> bool {
        self.inner.status.lock().live
    }

    pub fn ist_stumm(&self) -> bool {
        self.inner.status.lock().stumm
    }

    pub fn ist_aktiviert(&self) -> bool {
        self.inner.status.lock().aktiviert
    }

    /// Liefert tatsaechlich Medien: live, aktiviert und nicht stumm
    pub fn liefert_medien(&self) -> bool {
        let status = self.inner.status.lock();
        status.live && status.aktiviert && !status.stumm
    }

    /// Stoppt den Track lokal und gibt die Aufnahme-Hardware frei
    ///
    /// Wie beim Host loest ein lokaler Stopp kein `Beendet` aus. Gibt true
    /// zurueck wenn der Track vorher live war.
    pub fn stop(&self) -> bool {
        let mut status = self.inner.status.lock();
        let war_live = status.live;
        status.live = false;
        war_live
    }

    /// Der Host meldet das Ende des Tracks (Geraet entfernt, Gegenseite weg)
    pub fn beenden_melden(&self) {
        let war_live = self.stop();
        if war_live {
            self.melden(TrackEreignis::Beendet);
        }
    }

    /// Der Host meldet Stummschaltung (z.B. keine Pakete mehr vom Netz)
    pub fn stumm_setzen(&self, stumm: bool) {
        let geaendert = {
            let mut status = self.inner.status.lock();
            let geaendert = status.live && status.stumm != stumm;
            if geaendert {
                status.stumm = stumm;
            }
            geaendert
        };
        if geaendert {
            self.melden(if stumm {
                TrackEreignis::Stumm
            } else {
                TrackEreignis::Laut
            });
        }
    }

    /// Lokales Ein-/Ausschalten fuer die Stummschalt-Taste der UI
    pub fn set_enabled(&self, aktiviert: bool) {
        self.inner.status.lock().aktiviert = aktiviert;
    }

    pub fn listener_hinzufuegen<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&MediaTrack, TrackEreignis) + Send + Sync + 'static,
    {
        let id = self.inner.naechster_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listener.lock().push((id, Arc::new(listener)));
        id
    }

    pub fn listener_entfernen(&self, id: ListenerId) -> bool {
        let mut listener = self.inner.listener.lock();
        let vorher = listener.len();
        listener.retain(|(lid, _)| *lid != id);
        listener.len() != vorher
    }

    pub fn listener_anzahl(&self) -> usize {
        self.inner.listener.lock().len()
    }

    fn melden(&self, ereignis: TrackEreignis) {
        let listener: Vec<TrackListener> = self
            .inner
            .listener
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for l in listener {
            l(self, ereignis);
        }
    }
}

// ---------------------------------------------------------------------------
// MediaStream
// ---------------------------------------------------------------------------

/// Aenderung der Track-Liste eines Streams
#[derive(Debug, Clone)]
pub enum StreamAenderung {
    TrackHinzugefuegt(MediaTrack),
    TrackEntfernt(MediaTrack),
}

type StreamListener = Arc<dyn Fn(&MediaStream, &StreamAenderung) + Send + Sync>;

struct StreamInner {
    id: StreamId,
    tracks: Mutex<Vec<MediaTrack>>,
    listener: Mutex<Vec<(ListenerId, StreamListener)>>,
    naechster_listener: AtomicU64,
}

/// Buendel von Tracks (Clone teilt den Zustand)
#[derive(Clone)]
pub struct MediaStream {
    inner: Arc<StreamInner>,
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.inner.id)
            .field("tracks", &self.inner.tracks.lock().len())
            .finish()
    }
}

impl MediaStream {
    pub fn neu(tracks: Vec<MediaTrack>) -> Self {
        Self {
            inner: Arc::new(StreamInner {
                id: StreamId::new(),
                tracks: Mutex::new(tracks),
                listener: Mutex::new(Vec::new()),
                naechster_listener: AtomicU64::new(1),
            }),
        }
    }

    pub fn id(&self) -> StreamId {
        self.inner.id
    }

    pub fn tracks(&self) -> Vec<MediaTrack> {
        self.inner.tracks.lock().clone()
    }

    pub fn track(&self, id: TrackId) -> Option<MediaTrack> {
        self.inner.tracks.lock().iter().find(|t| t.id() == id).cloned()
    }

    /// Fuegt einen Track hinzu; ein bereits enthaltener Track wird ignoriert
    pub fn track_hinzufuegen(&self, track: MediaTrack) -> bool {
        {
            let mut tracks = self.inner.tracks.lock();
            if tracks.iter().any(|t| t.id() == track.id()) {
                return false;
            }
            tracks.push(track.clone());
        }
        self.melden(&StreamAenderung::TrackHinzugefuegt(track));
        true
    }

    pub fn track_entfernen(&self, id: TrackId) -> Option<MediaTrack> {
        let entfernt = {
            let mut tracks = self.inner.tracks.lock();
            let pos = tracks.iter().position(|t| t.id() == id)?;
            tracks.remove(pos)
        };
        self.melden(&StreamAenderung::TrackEntfernt(entfernt.clone()));
        Some(entfernt)
    }

    pub fn listener_hinzufuegen<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&MediaStream, &StreamAenderung) + Send + Sync + 'static,
    {
        let id = self.inner.naechster_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listener.lock().push((id, Arc::new(listener)));
        id
    }

    pub fn listener_entfernen(&self, id: ListenerId) -> bool {
        let mut listener = self.inner.listener.lock();
        let vorher = listener.len();
        listener.retain(|(lid, _)| *lid != id);
        listener.len() != vorher
    }

    pub fn listener_anzahl(&self) -> usize {
        self.inner.listener.lock().len()
    }

    fn melden(&self, aenderung: &StreamAenderung) {
        let listener: Vec<StreamListener> = self
            .inner
            .listener
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for l in listener {
            l(self, aenderung);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn stop_meldet_nichts() {
        let track = MediaTrack::neu(TrackArt::Video, "kamera");
        let aufrufe = Arc::new(AtomicUsize::new(0));
        let a = aufrufe.clone();
        track.listener_hinzufuegen(move |_, _| {
            a.fetch_add(1, Ordering::SeqCst);
        });

        assert!(track.stop());
        assert!(!track.ist_live());
        assert!(!track.stop(), "Zweiter Stopp aendert nichts");
        assert_eq!(aufrufe.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn beenden_melden_einmalig() {
        let track = MediaTrack::neu(TrackArt::Audio, "mikrofon");
        let ereignisse = Arc::new(Mutex::new(Vec::new()));
        let e = ereignisse.clone();
        track.listener_hinzufuegen(move |_, ereignis| e.lock().push(ereignis));

        track.beenden_melden();
        track.beenden_melden();

        assert_eq!(*ereignisse.lock(), vec![TrackEreignis::Beendet]);
    }

    #[test]
    fn deaktivierter_track_liefert_keine_medien() {
        let track = MediaTrack::neu(TrackArt::Audio, "mikrofon");
        assert!(track.liefert_medien());

        track.set_enabled(false);
        assert!(track.ist_live());
        assert!(!track.liefert_medien());

        track.set_enabled(true);
        assert!(track.liefert_medien());
    }

    #[test]
    fn stumm_nur_bei_aenderung() {
        let track = MediaTrack::neu(TrackArt::Video, "remote");
        let ereignisse = Arc::new(Mutex::new(Vec::new()));
        let e = ereignisse.clone();
        track.listener_hinzufuegen(move |_, ereignis| e.lock().push(ereignis));

        track.stumm_setzen(true);
        track.stumm_setzen(true);
        assert!(!track.liefert_medien());
        track.stumm_setzen(false);

        assert_eq!(
            *ereignisse.lock(),
            vec![TrackEreignis::Stumm, TrackEreignis::Laut]
        );
    }

    #[test]
    fn listener_entfernen() {
        let track = MediaTrack::neu(TrackArt::Audio, "a");
        let id = track.listener_hinzufuegen(|_, _| {});
        assert_eq!(track.listener_anzahl(), 1);
        assert!(track.listener_entfernen(id));
        assert!(!track.listener_entfernen(id));
        assert_eq!(track.listener_anzahl(), 0);
    }

    #[test]
    fn listener_darf_track_abfragen() {
        let track = MediaTrack::neu(TrackArt::Audio, "a");
        let gesehen = Arc::new(Mutex::new(None));
        let g = gesehen.clone();
        track.listener_hinzufuegen(move |t, _| *g.lock() = Some(t.ist_live()));

        track.beenden_melden();
        assert_eq!(*gesehen.lock(), Some(false));
    }

    #[test]
    fn stream_meldet_track_aenderungen() {
        let stream = MediaStream::neu(vec![]);
        let aenderungen = Arc::new(AtomicUsize::new(0));
        let a = aenderungen.clone();
        stream.listener_hinzufuegen(move |_, _| {
            a.fetch_add(1, Ordering::SeqCst);
        });

        let track = MediaTrack::neu(TrackArt::Video, "v");
        assert!(stream.track_hinzufuegen(track.clone()));
        assert!(!stream.track_hinzufuegen(track.clone()), "Doppelt ignoriert");
        assert!(stream.track_entfernen(track.id()).is_some());
        assert!(stream.track_entfernen(track.id()).is_none());

        assert_eq!(aenderungen.load(Ordering::SeqCst), 2);
        assert!(stream.tracks().is_empty());
    }
}
