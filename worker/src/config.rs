//! Worker-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Fehlt die Datei, laeuft
//! der Worker mit Standardwerten.

use framesafe_media::MediaConfig;
use framesafe_observability::{log_format_gueltig, log_level_gueltig, LoggingEinstellungen};
use serde::{Deserialize, Serialize};

/// Umgebungsvariable fuer den Pfad der Konfigurationsdatei
pub const ENV_CONFIG: &str = "FRAMESAFE_CONFIG";
pub const STANDARD_PFAD: &str = "framesafe.toml";

/// Vollstaendige Worker-Konfiguration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub logging: LoggingEinstellungen,
    /// Einstellungen des Transform-Kontexts
    pub media: MediaConfig,
}

impl WorkerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                config
                    .pruefen()
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Prueft Werte, die TOML allein nicht einschraenkt
    pub fn pruefen(&self) -> anyhow::Result<()> {
        if !log_level_gueltig(&self.logging.level) {
            anyhow::bail!("ungueltiger Log-Level '{}'", self.logging.level);
        }
        if !log_format_gueltig(&self.logging.format) {
            anyhow::bail!(
                "ungueltiges Log-Format '{}' (erlaubt: text, json)",
                self.logging.format
            );
        }
        Ok(())
    }

    /// Pfad aus `FRAMESAFE_CONFIG`, sonst `framesafe.toml`
    pub fn pfad_aus_umgebung() -> String {
        std::env::var(ENV_CONFIG).unwrap_or_else(|_| STANDARD_PFAD.into())
    }
}
