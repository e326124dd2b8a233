//! Framesafe Worker – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und bedient einen
//! diskreten Transform-Kontext ueber stdin/stdout (eine JSON-Nachricht pro Zeile).

use anyhow::Result;
use framesafe_observability::logging_initialisieren;
use framesafe_worker::{config::WorkerConfig, Worker};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    let config_pfad = WorkerConfig::pfad_aus_umgebung();

    // Standardwerte falls Datei fehlt
    let config = WorkerConfig::laden(&config_pfad)?;

    logging_initialisieren(&config.logging.level, &config.logging.format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Framesafe Worker wird initialisiert"
    );

    let worker = Worker::neu(config);
    let mut stdout = tokio::io::stdout();
    let bilanz = worker
        .ausfuehren(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?;

    tracing::info!(
        gelesen = bilanz.gelesen,
        abgelehnt = bilanz.abgelehnt,
        geschrieben = bilanz.geschrieben,
        "Framesafe Worker beendet"
    );
    Ok(())
}
