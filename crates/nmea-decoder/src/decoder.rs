//! Sentence Decoder
//!
//! Validates one line at a time and merges the fields it carries into a
//! caller-owned [`PositionFix`].

use crate::checksum::{split_fields, verify_checksum};
use crate::error::SentenceError;
use crate::fix::PositionFix;
use crate::sentence::SentenceKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Running counters for a decode session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderStats {
    /// Sentences that passed checksum validation
    pub accepted: usize,
    /// Sentences rejected before decoding
    pub rejected: usize,
}

/// Checksum-guarded NMEA sentence decoder
#[derive(Debug, Default)]
pub struct SentenceDecoder {
    stats: DecoderStats,
}

impl SentenceDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one sentence (no CR/LF) into `fix`
    ///
    /// On error `fix` is left untouched. Valid sentences of types that carry
    /// no fix data succeed without changing anything.
    pub fn decode(
        &mut self,
        line: &str,
        fix: &mut PositionFix,
    ) -> Result<SentenceKind, SentenceError> {
        let body = match verify_checksum(line) {
            Ok(body) => body,
            Err(e) => {
                warn!("Rejected sentence {:?}: {}", line, e);
                self.stats.rejected += 1;
                return Err(e);
            }
        };
        self.stats.accepted += 1;

        let fields = split_fields(body);
        let kind = SentenceKind::from_address(fields[0]);
        match kind {
            SentenceKind::FixData => apply_fix_data(&fields, fix),
            SentenceKind::RecommendedMinimum => apply_recommended_minimum(&fields, fix),
            _ => debug!("Ignoring {} sentence", fields[0]),
        }

        Ok(kind)
    }

    /// Counters since creation
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }
}

/// Non-empty field at `index`
fn field<'a>(fields: &[&'a str], index: usize) -> Option<&'a str> {
    fields.get(index).copied().filter(|f| !f.is_empty())
}

/// Leading decimal digits of a field as a saturating `u8` (0 when none)
fn leading_number(field: &str) -> u8 {
    let digits = field
        .trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, d| {
            acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
        });
    u8::try_from(digits).unwrap_or(u8::MAX)
}

/// Apply the position fields starting at `start` (lat, N/S, lon, E/W)
fn apply_position(fields: &[&str], start: usize, fix: &mut PositionFix) {
    if let (Some(lat), Some(lat_hem), Some(lon), Some(lon_hem)) = (
        field(fields, start),
        field(fields, start + 1),
        field(fields, start + 2),
        field(fields, start + 3),
    ) {
        fix.set_position(lat, lat_hem, lon, lon_hem);
    }
}

/// GGA: time, lat, N/S, lon, E/W, quality, satellites, ...
fn apply_fix_data(fields: &[&str], fix: &mut PositionFix) {
    if let Some(time) = field(fields, 1) {
        fix.time_utc = time.to_string();
    }
    if let Some(quality) = field(fields, 6) {
        fix.fix_quality = leading_number(quality);
        fix.has_fix = fix.fix_quality > 0;
    }
    if let Some(satellites) = field(fields, 7) {
        fix.satellites = leading_number(satellites);
    }
    apply_position(fields, 2, fix);
}

/// RMC: time, status, lat, N/S, lon, E/W, ...
fn apply_recommended_minimum(fields: &[&str], fix: &mut PositionFix) {
    if let Some(time) = field(fields, 1) {
        fix.time_utc = time.to_string();
    }
    // V (void) withholds confirmation but never clears an earlier fix
    if field(fields, 2) == Some("A") {
        fix.has_fix = true;
    }
    apply_position(fields, 3, fix);
}
