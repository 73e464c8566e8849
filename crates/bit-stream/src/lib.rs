//! Packed Bitstream Reader
//!
//! Extracts fixed-width unsigned fields from MSB-first bitstreams whose
//! length need not be a multiple of 8 bits.

mod error;
mod reader;

pub use error::BitStreamError;
pub use reader::{BitStreamReader, MAX_READ_BITS};
