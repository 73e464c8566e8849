//! Position Fix Accumulator and Coordinate Conversion

use serde::{Deserialize, Serialize};
use tracing::debug;

/// GGA fix quality indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixQuality {
    /// No fix (0)
    Invalid,
    /// Single receiver GPS fix (1)
    Gps,
    /// Differential GPS fix (2)
    Differential,
    /// PPS fix (3)
    Pps,
    /// Real time kinematic (4)
    Rtk,
    /// Float RTK (5)
    FloatRtk,
    /// Dead reckoning (6)
    Estimated,
    /// Manual input mode (7)
    Manual,
    /// Simulation mode (8)
    Simulation,
    /// Any other code
    Unknown(u8),
}

impl From<u8> for FixQuality {
    fn from(code: u8) -> Self {
        match code {
            0 => FixQuality::Invalid,
            1 => FixQuality::Gps,
            2 => FixQuality::Differential,
            3 => FixQuality::Pps,
            4 => FixQuality::Rtk,
            5 => FixQuality::FloatRtk,
            6 => FixQuality::Estimated,
            7 => FixQuality::Manual,
            8 => FixQuality::Simulation,
            other => FixQuality::Unknown(other),
        }
    }
}

/// Position state accumulated across sentences
///
/// Each decoded sentence only overwrites the fields it carries, so a GGA
/// followed by an RMC leaves a record holding data from both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    /// Set by GGA quality > 0 or RMC status `A`
    pub has_fix: bool,
    /// Raw GGA quality code (0 = none, 1 = GPS, 2 = DGPS, ...)
    pub fix_quality: u8,
    /// Satellites in use
    pub satellites: u8,
    /// Decimal degrees, positive north
    pub latitude: f64,
    /// Decimal degrees, positive east
    pub longitude: f64,
    /// UTC time of day as sent (`HHMMSS.sss`), empty until seen
    pub time_utc: String,
}

impl PositionFix {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded quality indicator
    pub fn quality(&self) -> FixQuality {
        FixQuality::from(self.fix_quality)
    }

    /// Check if any sentence reported a usable fix
    pub fn is_valid(&self) -> bool {
        self.has_fix || self.fix_quality > 0
    }

    /// UTC time or `"unknown"` when no sentence carried one
    pub fn time_or_unknown(&self) -> &str {
        if self.time_utc.is_empty() {
            "unknown"
        } else {
            &self.time_utc
        }
    }

    /// Update latitude and longitude from `DDMM.MMMM` tokens and hemispheres
    pub fn set_position(&mut self, lat: &str, lat_hem: &str, lon: &str, lon_hem: &str) {
        self.latitude = to_decimal_degrees(lat, lat_hem);
        self.longitude = to_decimal_degrees(lon, lon_hem);
    }
}

/// Convert an NMEA `DDDMM.MMMM` coordinate to signed decimal degrees
///
/// Degrees are every digit before the last two ahead of the decimal point and
/// must number 1 to 3, otherwise the result is 0.0. `S` and `W` negate.
pub fn to_decimal_degrees(token: &str, hemisphere: &str) -> f64 {
    let integer_len = token.find('.').unwrap_or(token.len());
    let degree_len = match integer_len.checked_sub(2) {
        Some(len @ 1..=3) => len,
        _ => {
            debug!("Coordinate {:?} has no 1-3 digit degree part", token);
            return 0.0;
        }
    };

    let (Some(degrees), Some(minutes)) = (token.get(..degree_len), token.get(degree_len..)) else {
        return 0.0;
    };
    let degrees: f64 = degrees.parse().unwrap_or(0.0);
    let minutes: f64 = minutes.parse().unwrap_or(0.0);

    let value = degrees + minutes / 60.0;
    match hemisphere.chars().next() {
        Some('S') | Some('W') => -value,
        _ => value,
    }
}
