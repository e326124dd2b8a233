//! Cipher-Engine
//!
//! Entscheidet pro Frame anhand des [`EncryptionState`], ob verschluesselt,
//! entschluesselt, durchgereicht oder verworfen wird, und fuehrt die
//! Statistik nach.
//!
//! ## Entschluesselung
//! | Schluessel | Frame sieht verschluesselt aus | Ergebnis |
//! |---|---|---|
//! | nein | nein | durchgereicht |
//! | nein | ja | verworfen (kein Schluessel) |
//! | ja | nein | verworfen (nicht authentifiziert) |
//! | ja | ja | aktueller, dann vorheriger Schluessel; sonst verworfen |

use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::frame::codec;
use crate::frame::state::EncryptionState;
use crate::types::Generation;

/// Grund fuer ein unveraendertes Weiterreichen beim Senden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurchreichGrund {
    NichtAktiviert,
    KeinSchluessel,
    LeererFrame,
    /// Verschluesselung fehlgeschlagen, Original geht weiter
    Fehler,
}

/// Ergebnis von [`frame_verschluesseln`]
#[derive(Debug, Clone)]
pub enum Verschluesselung {
    Verschluesselt { daten: Bytes, dauer: Duration },
    Durchgereicht { daten: Bytes, grund: DurchreichGrund },
}

impl Verschluesselung {
    /// Die Bytes, die weitergereicht werden
    pub fn daten(&self) -> &Bytes {
        match self {
            Self::Verschluesselt { daten, .. } | Self::Durchgereicht { daten, .. } => daten,
        }
    }

    pub fn into_daten(self) -> Bytes {
        match self {
            Self::Verschluesselt { daten, .. } | Self::Durchgereicht { daten, .. } => daten,
        }
    }
}

/// Grund fuer einen verworfenen Frame beim Empfangen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerwerfGrund {
    /// Frame sieht verschluesselt aus, aber es gibt keinen Schluessel
    KeinSchluessel,
    /// Weder aktueller noch vorheriger Schluessel passen
    Fehlgeschlagen,
    /// Schluessel vorhanden, Frame kann kein Chiffrat sein
    NichtAuthentifiziert,
}

/// Ergebnis von [`frame_entschluesseln`]
#[derive(Debug, Clone)]
pub enum Entschluesselung {
    Entschluesselt {
        daten: Bytes,
        generation: Generation,
        /// true wenn erst der vorherige Schluessel gepasst hat
        vorheriger_schluessel: bool,
        dauer: Duration,
    },
    /// Klartext-Frame, unveraendert
    Durchgereicht(Bytes),
    Verworfen(VerwerfGrund),
}

impl Entschluesselung {
    pub fn war_verschluesselt(&self) -> bool {
        matches!(self, Self::Entschluesselt { .. })
    }

    pub fn ist_verworfen(&self) -> bool {
        matches!(self, Self::Verworfen(_))
    }

    /// Weiterzureichende Bytes, `None` wenn verworfen
    pub fn into_daten(self) -> Option<Bytes> {
        match self {
            Self::Entschluesselt { daten, .. } | Self::Durchgereicht(daten) => Some(daten),
            Self::Verworfen(_) => None,
        }
    }
}

/// Verschluesselt einen ausgehenden Frame
///
/// Ohne Aktivierung oder Schluessel wird der Frame unveraendert
/// weitergereicht. Ein Fehler beim Verschluesseln verwirft nie, sondern
/// reicht das Original durch und zaehlt den Fehler.
pub fn frame_verschluesseln(state: &mut EncryptionState, daten: Bytes) -> Verschluesselung {
    let grund = if !state.ist_aktiviert() {
        Some(DurchreichGrund::NichtAktiviert)
    } else if daten.is_empty() {
        Some(DurchreichGrund::LeererFrame)
    } else {
        None
    };
    if let Some(grund) = grund {
        state.statistik_mut().durchgereicht_erfassen();
        return Verschluesselung::Durchgereicht { daten, grund };
    }

    let Some(material) = state.aktueller_schluessel().cloned() else {
        state.statistik_mut().durchgereicht_erfassen();
        return Verschluesselung::Durchgereicht {
            daten,
            grund: DurchreichGrund::KeinSchluessel,
        };
    };

    let start = Instant::now();
    match codec::encode(&material.key, material.generation, &daten) {
        Ok(verschluesselt) => {
            let dauer = start.elapsed();
            state.statistik_mut().verschluesselt_erfassen(dauer);
            tracing::trace!(
                generation = material.generation.wert(),
                laenge = verschluesselt.len(),
                "Frame verschluesselt"
            );
            Verschluesselung::Verschluesselt {
                daten: verschluesselt,
                dauer,
            }
        }
        Err(e) => {
            state.statistik_mut().verschluesselungs_fehler_erfassen();
            tracing::debug!(fehler = %e, "Verschluesselung fehlgeschlagen, Original wird weitergereicht");
            Verschluesselung::Durchgereicht {
                daten,
                grund: DurchreichGrund::Fehler,
            }
        }
    }
}

/// Entschluesselt einen eingehenden Frame
///
/// Wird unabhaengig von der Aktivierung versucht, sobald ein Schluessel
/// existiert. Der vorherige Schluessel dient als Rueckfall fuer Frames, die
/// waehrend einer Rotation noch unterwegs waren. Mit Schluessel wird nichts
/// Unauthentifiziertes mehr durchgereicht.
pub fn frame_entschluesseln(state: &mut EncryptionState, daten: Bytes) -> Entschluesselung {
    let verschluesselt = codec::sieht_verschluesselt_aus(&daten);

    let Some(aktuell) = state.aktueller_schluessel().cloned() else {
        if verschluesselt {
            state.statistik_mut().ohne_schluessel_erfassen();
            tracing::trace!(laenge = daten.len(), "Verschluesselter Frame ohne Schluessel verworfen");
            return Entschluesselung::Verworfen(VerwerfGrund::KeinSchluessel);
        }
        state.statistik_mut().durchgereicht_erfassen();
        return Entschluesselung::Durchgereicht(daten);
    };

    if !verschluesselt {
        state.statistik_mut().entschluesselungs_fehler_erfassen(Duration::ZERO);
        tracing::debug!(
            laenge = daten.len(),
            generation = aktuell.generation.wert(),
            "Frame ohne Chiffrat-Format trotz Schluessel verworfen"
        );
        return Entschluesselung::Verworfen(VerwerfGrund::NichtAuthentifiziert);
    }

    let start = Instant::now();
    if let Ok(klartext) = codec::decode(&aktuell.key, &daten) {
        let dauer = start.elapsed();
        state.statistik_mut().entschluesselt_erfassen(dauer);
        return Entschluesselung::Entschluesselt {
            daten: klartext,
            generation: aktuell.generation,
            vorheriger_schluessel: false,
            dauer,
        };
    }

    if let Some(vorherig) = state.vorheriger_schluessel().cloned() {
        if let Ok(klartext) = codec::decode(&vorherig.key, &daten) {
            let dauer = start.elapsed();
            state.statistik_mut().entschluesselt_erfassen(dauer);
            tracing::trace!(
                generation = vorherig.generation.wert(),
                "Frame mit vorherigem Schluessel entschluesselt"
            );
            return Entschluesselung::Entschluesselt {
                daten: klartext,
                generation: vorherig.generation,
                vorheriger_schluessel: true,
                dauer,
            };
        }
    }

    let dauer = start.elapsed();
    state.statistik_mut().entschluesselungs_fehler_erfassen(dauer);
    tracing::debug!(
        frame_generation = daten[0],
        generation = aktuell.generation.wert(),
        "Entschluesselung fehlgeschlagen, Frame verworfen"
    );
    Entschluesselung::Verworfen(VerwerfGrund::Fehlgeschlagen)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
