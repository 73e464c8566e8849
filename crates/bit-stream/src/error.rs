//! Bitstream Error Types

use thiserror::Error;

/// Errors that can occur while reading a bitstream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitStreamError {
    /// Requested field width outside 1..=32
    #[error("Invalid bit request ({0} bits)")]
    InvalidWidth(usize),

    /// Read would advance past the end of the stream
    #[error("Attempt to read beyond stream (pos={position}, requested={requested}, total={total})")]
    OutOfBounds {
        position: usize,
        requested: usize,
        total: usize,
    },

    /// Declared bit length does not fit in the backing buffer
    #[error("Bit length {bit_length} exceeds buffer of {buffer_bytes} bytes")]
    BufferTooShort {
        bit_length: usize,
        buffer_bytes: usize,
    },
}
