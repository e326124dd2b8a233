//! framesafe-worker – Bibliotheks-Root
//!
//! Der Worker bedient genau einen diskreten Transform-Kontext. Jede Zeile
//! der Eingabe ist eine JSON-[`ControlMessage`], jede Antwort und jeder
//! Statistik-Push wird als eine Zeile geschrieben.
//!
//! ```text
//! stdin ──> Lese-Task ──> KontextSender ──> Kontext-Task ──┐
//!              │                                           ├──> stdout
//!              └── Fehler-Antworten (ungueltiges JSON) ────┘
//! ```

pub mod config;

use anyhow::{Context, Result};
use config::WorkerConfig;
use framesafe_media::{kontext_starten, DiscreteAdapter, KontextSender};
use framesafe_protocol::ControlMessage;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Zaehler eines Worker-Laufs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerBilanz {
    /// Nicht-leere Eingabezeilen
    pub gelesen: u64,
    /// Zeilen, die nicht als Steuernachricht lesbar waren
    pub abgelehnt: u64,
    pub geschrieben: u64,
}

pub struct Worker {
    pub config: WorkerConfig,
}

impl Worker {
    pub fn neu(config: WorkerConfig) -> Self {
        Self { config }
    }

    /// Bedient den Kontext bis die Eingabe endet
    ///
    /// Nach EOF werden alle bereits eingereihten Nachrichten noch bearbeitet
    /// und ihre Antworten geschrieben.
    pub async fn ausfuehren<R, W>(&self, eingabe: R, ausgabe: &mut W) -> Result<WorkerBilanz>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin,
    {
        let mut handle = kontext_starten(DiscreteAdapter::neu(), self.config.media.clone());
        let (fehler_tx, mut fehler_rx) = mpsc::channel(self.config.media.kanal_kapazitaet());
        let leser = tokio::spawn(zeilen_lesen(eingabe, handle.sender(), fehler_tx));

        tracing::info!(rolle = ?self.config.media.rolle, "Worker bereit");

        let mut geschrieben = 0;
        loop {
            let nachricht = tokio::select! {
                Some(n) = handle.empfangen() => n,
                Some(f) = fehler_rx.recv() => f,
                else => break,
            };
            nachricht_schreiben(ausgabe, &nachricht).await?;
            geschrieben += 1;
        }

        let (gelesen, abgelehnt) = leser.await.context("Lese-Task abgebrochen")??;
        handle.beenden().await;

        Ok(WorkerBilanz {
            gelesen,
            abgelehnt,
            geschrieben,
        })
    }
}

/// Liest bis EOF und schliesst danach immer den Kontext
async fn zeilen_lesen<R>(
    eingabe: R,
    kontext: KontextSender,
    fehler: mpsc::Sender<ControlMessage>,
) -> Result<(u64, u64)>
where
    R: AsyncBufRead + Unpin,
{
    let ergebnis = zeilen_weiterleiten(eingabe, &kontext, &fehler).await;
    kontext.schliessen().await;
    ergebnis
}

async fn zeilen_weiterleiten<R>(
    eingabe: R,
    kontext: &KontextSender,
    fehler: &mpsc::Sender<ControlMessage>,
) -> Result<(u64, u64)>
where
    R: AsyncBufRead + Unpin,
{
    let mut zeilen = eingabe.lines();
    let mut gelesen = 0;
    let mut abgelehnt = 0;

    while let Some(zeile) = zeilen.next_line().await.context("Eingabe nicht lesbar")? {
        let zeile = zeile.trim();
        if zeile.is_empty() {
            continue;
        }
        gelesen += 1;

        match ControlMessage::from_json(zeile) {
            Ok(nachricht) => {
                if kontext.senden(nachricht).await.is_err() {
                    tracing::warn!("Kontext beendet, restliche Eingabe wird verworfen");
                    break;
                }
            }
            Err(e) => {
                abgelehnt += 1;
                tracing::debug!(request_id = e.request_id(), fehler = %e, "Eingabezeile abgelehnt");
                if fehler.send(e.als_antwort()).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::debug!(gelesen, abgelehnt, "Eingabe beendet");
    Ok((gelesen, abgelehnt))
}

async fn nachricht_schreiben<W>(ausgabe: &mut W, nachricht: &ControlMessage) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = nachricht.to_json()?;
    ausgabe.write_all(json.as_bytes()).await?;
    ausgabe.write_all(b"\n").await?;
    // Der Host wartet zeilenweise auf Antworten
    ausgabe.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use framesafe_protocol::{ControlPayload, ErrorCode, FrameRequest, InitRequest};
    use std::collections::HashMap;
    use std::io::Cursor;

    const SCHLUESSEL: [u8; 32] = [0x5A; 32];

    fn init() -> ControlPayload {
        ControlPayload::Init(InitRequest {
            key: Some(Bytes::from_static(&SCHLUESSEL)),
            generation: Some(3),
        })
    }

    fn eingabe(zeilen: &[String]) -> Cursor<Vec<u8>> {
        let mut text = zeilen.join("\n");
        text.push('\n');
        Cursor::new(text.into_bytes())
    }

    fn zeile(request_id: u32, payload: ControlPayload) -> String {
        ControlMessage::new(request_id, payload).to_json().unwrap()
    }

    async fn lauf(zeilen: &[String]) -> (WorkerBilanz, HashMap<u32, ControlMessage>) {
        let worker = Worker::neu(WorkerConfig::default());
        let mut ausgabe = Vec::new();
        let bilanz = worker.ausfuehren(eingabe(zeilen), &mut ausgabe).await.unwrap();

        let text = String::from_utf8(ausgabe).unwrap();
        let antworten = text
            .lines()
            .map(|l| ControlMessage::from_json(l).unwrap())
            .filter(|n| !matches!(n.payload, ControlPayload::Stats(_)) || n.request_id != 0)
            .map(|n| (n.request_id, n))
            .collect();
        (bilanz, antworten)
    }

    fn fehler_code(nachricht: &ControlMessage) -> Option<ErrorCode> {
        match &nachricht.payload {
            ControlPayload::Error(e) => Some(e.code),
            _ => None,
        }
    }

    #[tokio::test]
    async fn leere_eingabe_endet_ohne_ausgabe() {
        let (bilanz, antworten) = lauf(&[]).await;
        assert_eq!(bilanz, WorkerBilanz::default());
        assert!(antworten.is_empty());
    }

    #[tokio::test]
    async fn jede_anfrage_erhaelt_eine_antwort() {
        let frame = Bytes::from_static(b"\x9d\x01\x2a worker frame payload");
        let zeilen = vec![
            zeile(1, init()),
            zeile(2, ControlPayload::EnableEncryption),
            zeile(3, ControlPayload::Encrypt(FrameRequest { frame_data: frame })),
            zeile(4, ControlPayload::GetStats),
            String::new(),
            r#"{"requestId":5,"payload":{"type":"selfDestruct"}}"#.into(),
            "{kaputt".into(),
            zeile(7, ControlPayload::RequestKeyframe),
        ];

        let (bilanz, antworten) = lauf(&zeilen).await;
        assert_eq!(bilanz.gelesen, 7);
        assert_eq!(bilanz.abgelehnt, 2);
        assert_eq!(bilanz.geschrieben, 7);

        assert_eq!(antworten[&1].payload, ControlPayload::Ready);
        assert_eq!(antworten[&2].payload, ControlPayload::Ready);
        match &antworten[&3].payload {
            ControlPayload::EncryptSuccess(e) => assert_eq!(e.encrypted_data[0], 3),
            andere => panic!("Erwartet encryptSuccess, erhalten {andere:?}"),
        }
        match &antworten[&4].payload {
            ControlPayload::Stats(s) => {
                assert_eq!(s.encrypted_frames, 1);
                assert!(s.enabled);
            }
            andere => panic!("{andere:?}"),
        }
        assert_eq!(fehler_code(&antworten[&5]), Some(ErrorCode::UnknownMessage));
        assert_eq!(fehler_code(&antworten[&0]), Some(ErrorCode::InvalidRequest));
        // Keyframes gibt es nur im kontinuierlichen Adapter
        assert_eq!(
            fehler_code(&antworten[&7]),
            Some(ErrorCode::UnsupportedOperation)
        );
    }

    #[tokio::test]
    async fn zwei_worker_mit_gleichem_schluessel() {
        let klartext = Bytes::from_static(b"\x9d\x01\x2a zwischen zwei workern");

        let (_, sender) = lauf(&[
            zeile(1, init()),
            zeile(2, ControlPayload::EnableEncryption),
            zeile(3, ControlPayload::Encrypt(FrameRequest { frame_data: klartext.clone() })),
        ])
        .await;
        let verschluesselt = match &sender[&3].payload {
            ControlPayload::EncryptSuccess(e) => e.encrypted_data.clone(),
            andere => panic!("{andere:?}"),
        };

        let (_, empfaenger) = lauf(&[
            zeile(1, init()),
            zeile(2, ControlPayload::Decrypt(FrameRequest { frame_data: verschluesselt })),
        ])
        .await;
        match &empfaenger[&2].payload {
            ControlPayload::DecryptSuccess(d) => {
                assert_eq!(d.decrypted_data, klartext);
                assert!(d.was_encrypted);
                assert_eq!(d.dropped, None);
            }
            andere => panic!("{andere:?}"),
        }
    }
}
