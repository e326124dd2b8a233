//! Fehlertypen fuer Transform-Kontexte und Stream-Verwaltung

use framesafe_core::StreamId;
use framesafe_crypto::CryptoError;
use framesafe_protocol::ErrorCode;
use thiserror::Error;

/// Fehler im Media-Subsystem
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Operation '{0}' wird von diesem Adapter nicht unterstuetzt")]
    NichtUnterstuetzt(&'static str),

    #[error("Unbekannte Nachricht '{0}'")]
    UnbekannteNachricht(&'static str),

    #[error("Transform-Kontext ist beendet")]
    KontextBeendet,

    #[error("Host bietet keine Frame-Transform-Primitive an")]
    KeinTransform,

    #[error("Stream {0} ist unbekannt")]
    StreamUnbekannt(StreamId),

    #[error("Aufnahme fehlgeschlagen: {0}")]
    Capture(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl MediaError {
    /// Fehler-Code fuer die Error-Antwort an den Host
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::NichtUnterstuetzt(_) | Self::KeinTransform => ErrorCode::UnsupportedOperation,
            Self::UnbekannteNachricht(_) => ErrorCode::UnknownMessage,
            Self::Crypto(CryptoError::Verschluesselung(_)) => ErrorCode::EncryptionFailed,
            Self::Crypto(CryptoError::Entschluesselung(_)) => ErrorCode::DecryptionFailed,
            Self::Crypto(_) => ErrorCode::InvalidRequest,
            Self::KontextBeendet | Self::StreamUnbekannt(_) | Self::Capture(_) => {
                ErrorCode::InternalError
            }
        }
    }
}

pub type MediaResult<T> = Result<T, MediaError>;
