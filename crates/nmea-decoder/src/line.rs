//! Serial Line Assembly

use tracing::warn;

/// Longest line kept; longer input is dropped
pub const MAX_LINE_LEN: usize = 255;

/// Splits a raw serial byte stream into sentence lines
///
/// Carriage returns are dropped and `\n` terminates a line. Empty lines are
/// skipped, overlong lines are discarded.
#[derive(Debug, Default)]
pub struct LineAssembler {
    partial: Vec<u8>,
}

impl LineAssembler {
    /// Create an empty assembler
    pub fn new() -> Self {
        Self {
            partial: Vec::with_capacity(MAX_LINE_LEN),
        }
    }

    /// Push one byte, returning a line when it completes one
    pub fn push(&mut self, byte: u8) -> Option<String> {
        match byte {
            b'\r' => None,
            b'\n' => self.finish(),
            _ if self.partial.len() < MAX_LINE_LEN => {
                self.partial.push(byte);
                None
            }
            _ => {
                warn!("Discarding overlong serial line ({} bytes)", self.partial.len());
                self.partial.clear();
                None
            }
        }
    }

    /// Push a chunk of bytes, returning every completed line
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        bytes.iter().filter_map(|&b| self.push(b)).collect()
    }

    /// Bytes waiting for a line terminator
    pub fn pending(&self) -> usize {
        self.partial.len()
    }

    fn finish(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            return None;
        }
        let bytes = std::mem::take(&mut self.partial);
        match String::from_utf8(bytes) {
            Ok(line) => Some(line),
            Err(e) => {
                warn!("Discarding non UTF-8 serial line: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_lines() {
        let mut assembler = LineAssembler::new();
        let lines = assembler.feed(b"$GPGGA,1*00\r\n$GPRMC,2*00\r\n$GPG");

        assert_eq!(lines, vec!["$GPGGA,1*00", "$GPRMC,2*00"]);
        assert_eq!(assembler.pending(), 4);

        let lines = assembler.feed(b"SV*00\n");
        assert_eq!(lines, vec!["$GPGSV*00"]);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let mut assembler = LineAssembler::new();
        assert!(assembler.feed(b"\r\n\n\r\n").is_empty());
    }

    #[test]
    fn test_overlong_line_discarded() {
        let mut assembler = LineAssembler::new();
        let mut input = vec![b'A'; MAX_LINE_LEN + 1];
        input.extend_from_slice(b"\n$OK*00\n");

        let lines = assembler.feed(&input);
        assert_eq!(lines, vec!["$OK*00"]);
    }

    #[test]
    fn test_invalid_utf8_dropped() {
        let mut assembler = LineAssembler::new();
        let lines = assembler.feed(b"\xFF\xFE\n$OK*00\n");
        assert_eq!(lines, vec!["$OK*00"]);
    }
}
