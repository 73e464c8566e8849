//! Bit Reader Implementation

use crate::error::BitStreamError;
use tracing::{debug, info, warn};

/// Widest field a single read can return
pub const MAX_READ_BITS: usize = 32;

/// Cursor over a caller-owned, read-only bitstream
///
/// Absolute bit `i` lives in byte `i / 8` at bit `7 - i % 8`, so bit 7 of each
/// byte is read first. Fields span byte boundaries transparently.
#[derive(Debug, Clone)]
pub struct BitStreamReader<'a> {
    /// Backing bytes (never mutated)
    data: &'a [u8],
    /// Total number of valid bits in `data`
    bit_length: usize,
    /// Current position in bits
    cursor: usize,
}

impl<'a> BitStreamReader<'a> {
    /// Create a reader over `data` holding exactly `bit_length` valid bits
    ///
    /// The trailing byte may be partially used. Fails if `data` is shorter than
    /// `ceil(bit_length / 8)` bytes.
    pub fn new(data: &'a [u8], bit_length: usize) -> Result<Self, BitStreamError> {
        if bit_length > data.len().saturating_mul(8) {
            return Err(BitStreamError::BufferTooShort {
                bit_length,
                buffer_bytes: data.len(),
            });
        }

        info!("BitStreamReader initialized: {} bits total", bit_length);
        Ok(Self {
            data,
            bit_length,
            cursor: 0,
        })
    }

    /// Create a reader spanning every bit of `data`
    pub fn from_bytes(data: &'a [u8]) -> Self {
        let bit_length = data.len() * 8;
        info!("BitStreamReader initialized: {} bits total", bit_length);
        Self {
            data,
            bit_length,
            cursor: 0,
        }
    }

    /// Read `num_bits` (1..=32) MSB-first; the first bit read becomes the MSB
    ///
    /// On error the cursor is left where it was.
    pub fn read(&mut self, num_bits: usize) -> Result<u32, BitStreamError> {
        if num_bits == 0 || num_bits > MAX_READ_BITS {
            warn!("read: Invalid bit request ({} bits)", num_bits);
            return Err(BitStreamError::InvalidWidth(num_bits));
        }

        if num_bits > self.remaining() {
            warn!(
                "read: Attempt to read beyond stream (pos={}, requested={}, total={})",
                self.cursor, num_bits, self.bit_length
            );
            return Err(BitStreamError::OutOfBounds {
                position: self.cursor,
                requested: num_bits,
                total: self.bit_length,
            });
        }

        let value = (self.cursor..self.cursor + num_bits).fold(0u32, |acc, i| {
            let bit = (self.data[i / 8] >> (7 - i % 8)) & 0x01;
            (acc << 1) | u32::from(bit)
        });
        self.cursor += num_bits;

        debug!(
            "read: Read {} bits -> {:#X} (new pos={})",
            num_bits, value, self.cursor
        );
        Ok(value)
    }

    /// Read a field, yielding 0 when the request is invalid
    pub fn read_or_zero(&mut self, num_bits: usize) -> u32 {
        self.read(num_bits).unwrap_or(0)
    }

    /// Read a single bit as a flag
    pub fn read_bool(&mut self) -> Result<bool, BitStreamError> {
        Ok(self.read(1)? == 1)
    }

    /// Advance the cursor by `num_bits`, clamping at the end of the stream
    ///
    /// Returns the number of bits actually skipped.
    pub fn skip(&mut self, num_bits: usize) -> usize {
        let remaining = self.remaining();
        if num_bits <= remaining {
            self.cursor += num_bits;
            debug!("skip: Skipped {} bits (new pos={})", num_bits, self.cursor);
            num_bits
        } else {
            warn!(
                "skip: Attempted to skip past end (pos={}, skip={}, total={})",
                self.cursor, num_bits, self.bit_length
            );
            self.cursor = self.bit_length;
            remaining
        }
    }

    /// Rewind to the first bit
    pub fn reset(&mut self) {
        self.cursor = 0;
        debug!("reset: Position reset to 0");
    }

    /// Current cursor position in bits
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bits left before the end of the stream
    pub fn remaining(&self) -> usize {
        self.bit_length - self.cursor
    }

    /// Total number of valid bits
    pub fn bit_length(&self) -> usize {
        self.bit_length
    }

    /// Check if every bit has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.bit_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_both_constructors_trace_init() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            BitStreamReader::new(&[0xAB], 6).unwrap();
            BitStreamReader::from_bytes(&[0xAB, 0xCD]);
        });

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("BitStreamReader initialized: 6 bits total"));
        assert!(text.contains("BitStreamReader initialized: 16 bits total"));
    }
    use proptest::prelude::*;

    #[test]
    fn test_reads_msb_first_across_bytes() {
        // 1010_1100 0101_0011
        let data = [0xAC, 0x53];
        let mut reader = BitStreamReader::from_bytes(&data);

        assert_eq!(reader.read(3).unwrap(), 0b101);
        assert_eq!(reader.read(7).unwrap(), 0b011_0001);
        assert_eq!(reader.read(6).unwrap(), 0b01_0011);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn test_full_width_read() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF, 0x01];
        let mut reader = BitStreamReader::from_bytes(&data);
        assert_eq!(reader.read(32).unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.position(), 32);
    }

    #[test]
    fn test_invalid_widths() {
        let data = [0xFF; 8];
        let mut reader = BitStreamReader::from_bytes(&data);

        assert_eq!(reader.read(0), Err(BitStreamError::InvalidWidth(0)));
        assert_eq!(reader.read(33), Err(BitStreamError::InvalidWidth(33)));
        assert_eq!(reader.read_or_zero(33), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_read_past_end_keeps_cursor() {
        let data = [0xFF, 0xFF];
        let mut reader = BitStreamReader::new(&data, 12).unwrap();
        reader.read(8).unwrap();

        assert_eq!(
            reader.read(5),
            Err(BitStreamError::OutOfBounds {
                position: 8,
                requested: 5,
                total: 12
            })
        );
        assert_eq!(reader.read_or_zero(5), 0);
        assert_eq!(reader.position(), 8);
        assert_eq!(reader.read(4).unwrap(), 0xF);
    }

    #[test]
    fn test_partial_trailing_byte_is_ignored() {
        // Only the top 4 bits of the second byte are valid
        let data = [0x00, 0b1010_1111];
        let mut reader = BitStreamReader::new(&data, 12).unwrap();
        reader.skip(8);
        assert_eq!(reader.read(4).unwrap(), 0b1010);
        assert!(reader.read(1).is_err());
    }

    #[test]
    fn test_buffer_too_short() {
        let data = [0u8; 2];
        assert_eq!(
            BitStreamReader::new(&data, 17).unwrap_err(),
            BitStreamError::BufferTooShort {
                bit_length: 17,
                buffer_bytes: 2
            }
        );
    }

    #[test]
    fn test_skip_clamps_to_end() {
        let data = [0u8; 2];
        let mut reader = BitStreamReader::new(&data, 10).unwrap();

        assert_eq!(reader.skip(4), 4);
        assert_eq!(reader.skip(100), 6);
        assert_eq!(reader.position(), 10);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reset_keeps_length() {
        let data = [0x80];
        let mut reader = BitStreamReader::new(&data, 5).unwrap();
        assert!(reader.read_bool().unwrap());
        reader.reset();
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.bit_length(), 5);
        assert!(reader.read_bool().unwrap());
    }

    fn bit_at(data: &[u8], i: usize) -> u8 {
        (data[i / 8] >> (7 - i % 8)) & 1
    }

    proptest! {
        #[test]
        fn prop_sequential_reads_rebuild_bits(
            data in proptest::collection::vec(any::<u8>(), 1..32),
            widths in proptest::collection::vec(1usize..=32, 1..64),
        ) {
            let bit_length = data.len() * 8;
            let mut reader = BitStreamReader::from_bytes(&data);
            let mut rebuilt = Vec::with_capacity(bit_length);

            for width in widths.iter().copied().cycle() {
                if reader.is_exhausted() {
                    break;
                }
                let width = width.min(reader.remaining());
                let value = reader.read(width).unwrap();
                for shift in (0..width).rev() {
                    rebuilt.push(((value >> shift) & 1) as u8);
                }
            }

            let expected: Vec<u8> = (0..bit_length).map(|i| bit_at(&data, i)).collect();
            prop_assert_eq!(rebuilt, expected);
        }
    }
}
