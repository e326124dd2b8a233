//! # framesafe-observability
//!
//! Structured Logging via tracing-subscriber fuer alle framesafe-Binaries.
//! Metriken gibt es nicht als eigenen Endpunkt, die Frame-Statistik laeuft
//! ueber das Steuerprotokoll.

pub mod logging;

pub use logging::{
    log_format_gueltig, log_level_gueltig, logging_initialisieren, LoggingEinstellungen,
};
