//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `FS_LOG_LEVEL`: Filter (trace/debug/info/warn/error oder EnvFilter-Direktiven), Standard: info
//! - `FS_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Der Worker schreibt Steuernachrichten auf stdout, deshalb geht das Log
//! immer nach stderr.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LOG_LEVEL: &str = "FS_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "FS_LOG_FORMAT";

/// Logging-Abschnitt der Konfigurationsdatei
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level oder Filter-Direktive, z.B. "info,framesafe_media=debug"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Initialisiert das Logging-System.
///
/// `FS_LOG_LEVEL` und `FS_LOG_FORMAT` haben Vorrang vor den uebergebenen
/// Werten. Gibt false zurueck wenn bereits ein globaler Subscriber
/// installiert war.
pub fn logging_initialisieren(level: &str, format: &str) -> bool {
    let filter = EnvFilter::try_from_env(ENV_LOG_LEVEL)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format_env = std::env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| format.to_string());

    let ergebnis = match format_env.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
        _ => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init(),
    };

    ergebnis.is_ok()
}

/// Validiert einen Log-Level oder eine Liste von Filter-Direktiven.
///
/// Jede Direktive ist ein Level (`debug`) oder `ziel=level`
/// (`framesafe_media=trace`). Gross-/Kleinschreibung egal, wie beim EnvFilter.
pub fn log_level_gueltig(level: &str) -> bool {
    if level.trim().is_empty() {
        return false;
    }
    level.split(',').all(|direktive| {
        let direktive = direktive.trim();
        let stufe = match direktive.rsplit_once('=') {
            Some((ziel, stufe)) if !ziel.trim().is_empty() => stufe.trim(),
            Some(_) => return false,
            None => direktive,
        };
        matches!(
            stufe.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        )
    })
}

/// Validiert ob ein Log-Format-String gueltig ist.
pub fn log_format_gueltig(format: &str) -> bool {
    matches!(format, "text" | "json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_gueltige_werte() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(log_level_gueltig(level), "{level}");
        }
    }

    #[test]
    fn log_level_direktiven() {
        assert!(log_level_gueltig("info,framesafe_media=debug"));
        assert!(log_level_gueltig("warn, framesafe_crypto=trace"));
        assert!(log_level_gueltig("INFO"));
        assert!(log_level_gueltig("off"));
    }

    #[test]
    fn log_level_ungueltige_werte() {
        assert!(!log_level_gueltig("verbose"));
        assert!(!log_level_gueltig(""));
        assert!(!log_level_gueltig("info,"));
        assert!(!log_level_gueltig("framesafe_media=laut"));
        assert!(!log_level_gueltig("=debug"));
    }

    #[test]
    fn log_format_werte() {
        assert!(log_format_gueltig("text"));
        assert!(log_format_gueltig("json"));
        assert!(!log_format_gueltig("xml"));
        assert!(!log_format_gueltig("JSON"));
    }

    #[test]
    fn standard_einstellungen() {
        let e = LoggingEinstellungen::default();
        assert_eq!(e.level, "info");
        assert_eq!(e.format, "text");
    }

    #[test]
    fn zweite_initialisierung_meldet_false() {
        // Erster Aufruf kann in parallelen Tests schon passiert sein
        let _ = logging_initialisieren("warn", "text");
        assert!(!logging_initialisieren("debug", "json"));
    }
}
