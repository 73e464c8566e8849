//! NMEA 0183 Sentence Decoding
//!
//! This crate validates and decodes `$GPGGA`/`$GPRMC` style sentences into a
//! [`PositionFix`] accumulator, and provides the UART receiver that feeds
//! them from a GPS module.

mod checksum;
mod decoder;
mod error;
mod fix;
mod line;
mod receiver;
mod sentence;

pub use checksum::{compute_checksum, split_fields, verify_checksum, MAX_FIELDS};
pub use decoder::{DecoderStats, SentenceDecoder};
pub use error::{ReceiverError, SentenceError};
pub use fix::{to_decimal_degrees, FixQuality, PositionFix};
pub use line::{LineAssembler, MAX_LINE_LEN};
pub use receiver::{GpsReceiver, GpsReport, DEFAULT_BAUD_RATES, DEFAULT_DEVICE, RECENT_LINES};
pub use sentence::SentenceKind;
