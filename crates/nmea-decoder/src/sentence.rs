//! NMEA Sentence Types

use serde::{Deserialize, Serialize};

/// Sentence types recognised by the decoder
///
/// The two-letter talker prefix (`GP`, `GN`, `GL`, ...) does not affect the
/// type: `$GPGGA` and `$GNGGA` are both [`SentenceKind::FixData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentenceKind {
    /// GGA: time, position, fix quality, satellites in use
    FixData,
    /// RMC: time, status, position, speed, course, date
    RecommendedMinimum,
    /// GSA: DOP and active satellites
    ActiveSatellites,
    /// GSV: satellites in view
    SatellitesInView,
    /// Valid sentence of a type the decoder does not interpret
    Other,
}

impl SentenceKind {
    /// Classify a sentence address such as `GPGGA`
    pub fn from_address(address: &str) -> Self {
        let sentence_type = match address.get(2..) {
            Some(t) if address.len() == 5 => t,
            _ => return SentenceKind::Other,
        };

        match sentence_type {
            "GGA" => SentenceKind::FixData,
            "RMC" => SentenceKind::RecommendedMinimum,
            "GSA" => SentenceKind::ActiveSatellites,
            "GSV" => SentenceKind::SatellitesInView,
            _ => SentenceKind::Other,
        }
    }
}
