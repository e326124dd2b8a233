//! Abbau von Streams ueber den Stream-Manager

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use framesafe_core::{StreamEventArt, TrackArt};
use framesafe_media::{HostProfil, MediaStream, MediaTrack, StreamManager};

fn zaehlen(manager: &StreamManager, art: StreamEventArt) -> Arc<AtomicUsize> {
    let zaehler = Arc::new(AtomicUsize::new(0));
    let z = zaehler.clone();
    manager.abonnieren(art, move |_| {
        z.fetch_add(1, Ordering::SeqCst);
    });
    zaehler
}

#[test]
fn stream_mit_zwei_live_tracks_abbauen() {
    let manager = StreamManager::neu(HostProfil::default());
    let audio = MediaTrack::neu(TrackArt::Audio, "mikrofon");
    let video = MediaTrack::neu(TrackArt::Video, "kamera");
    let stream = MediaStream::neu(vec![audio.clone(), video.clone()]);
    let id = manager.remote_stream_registrieren(stream.clone());

    let track_ereignisse: Vec<Arc<AtomicUsize>> = [
        StreamEventArt::TrackEnded,
        StreamEventArt::TrackMuted,
        StreamEventArt::TrackUnmuted,
        StreamEventArt::TrackAdded,
        StreamEventArt::TrackRemoved,
    ]
    .into_iter()
    .map(|art| zaehlen(&manager, art))
    .collect();
    let zerstoert = zaehlen(&manager, StreamEventArt::StreamDestroyed);

    assert!(audio.ist_live() && video.ist_live());
    assert!(manager.stream_zerstoeren(id));

    // Beide Tracks beendet
    assert!(!audio.ist_live());
    assert!(!video.ist_live());
    assert_eq!(zerstoert.load(Ordering::SeqCst), 1);

    // Danach feuert kein Listener mehr
    audio.stumm_setzen(true);
    video.beenden_melden();
    stream.track_hinzufuegen(MediaTrack::neu(TrackArt::Video, "spaet"));
    stream.track_entfernen(audio.id());

    for zaehler in &track_ereignisse {
        assert_eq!(zaehler.load(Ordering::SeqCst), 0);
    }
    assert_eq!(audio.listener_anzahl(), 0);
    assert_eq!(video.listener_anzahl(), 0);
    assert_eq!(stream.listener_anzahl(), 0);
    assert!(manager.stream(id).is_none());
}

#[test]
fn vollstaendiger_abbau_ist_wiederholbar() {
    let manager = StreamManager::neu(HostProfil {
        hardware_indicator_defect: true,
    });
    let streams: Vec<MediaStream> = (0..4)
        .map(|_| {
            MediaStream::neu(vec![
                MediaTrack::neu(TrackArt::Audio, "a"),
                MediaTrack::neu(TrackArt::Video, "v"),
            ])
        })
        .collect();
    for s in &streams {
        manager.remote_stream_registrieren(s.clone());
    }
    assert_eq!(manager.stream_ids().len(), 4);

    manager.alle_zerstoeren();
    manager.alle_zerstoeren();

    assert_eq!(manager.anzahl(), 0);
    for s in &streams {
        assert!(s.tracks().is_empty(), "Defekt-Profil loest Tracks");
        assert_eq!(s.listener_anzahl(), 0);
    }
}
