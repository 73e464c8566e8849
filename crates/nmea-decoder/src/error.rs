//! NMEA Error Types

use thiserror::Error;

/// Reasons a sentence is rejected before any field is decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentenceError {
    /// Line does not begin with `$`
    #[error("Sentence does not start with '$'")]
    MissingStart,

    /// No `*` checksum delimiter
    #[error("Sentence has no '*' checksum delimiter")]
    MissingChecksum,

    /// Characters after `*` are not two hex digits
    #[error("Malformed checksum digits: {0:?}")]
    InvalidChecksumDigits(String),

    /// Checksum mismatch
    #[error("Checksum mismatch: expected {expected:02X}, got {actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

/// Errors that can occur while reading a GPS module
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// Serial port could not be opened at any baud rate
    #[error("Failed to open {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: tokio_serial::Error,
    },

    /// No baud rates to try
    #[error("No baud rates configured for {0}")]
    NoBaudRates(String),

    /// Read failure on an open port
    #[error("Serial read error: {0}")]
    Io(#[from] std::io::Error),

    /// Receiver was closed
    #[error("GPS receiver is not connected")]
    NotConnected,

    /// Raw sentence buffer could not be created
    #[error("Sentence buffer error: {0}")]
    Buffer(#[from] bounded_queue::QueueError),
}
