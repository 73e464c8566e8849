//! Sentence Checksum and Tokenizing

use crate::error::SentenceError;
use tracing::debug;

/// Maximum number of comma-separated fields kept per sentence (address included)
pub const MAX_FIELDS: usize = 16;

/// XOR of every byte in the sentence body
pub fn compute_checksum(body: &str) -> u8 {
    body.bytes().fold(0u8, |acc, b| acc ^ b)
}

/// Validate the `*HH` checksum of a `$...*HH` line and return the body
///
/// The body is everything strictly between the leading `$` and the first `*`.
/// Anything after the two hex digits is ignored.
pub fn verify_checksum(line: &str) -> Result<&str, SentenceError> {
    let rest = line.strip_prefix('$').ok_or(SentenceError::MissingStart)?;
    let (body, digits) = rest
        .split_once('*')
        .ok_or(SentenceError::MissingChecksum)?;

    let expected = parse_hex_pair(digits)?;
    let actual = compute_checksum(body);
    if expected != actual {
        return Err(SentenceError::ChecksumMismatch { expected, actual });
    }

    Ok(body)
}

/// Split a sentence body into at most [`MAX_FIELDS`] fields
///
/// Empty fields are kept so that field positions match the sentence layout.
pub fn split_fields(body: &str) -> Vec<&str> {
    let fields: Vec<&str> = body.split(',').take(MAX_FIELDS).collect();
    if fields.len() == MAX_FIELDS && body.split(',').nth(MAX_FIELDS).is_some() {
        debug!("Ignoring fields beyond the first {}", MAX_FIELDS);
    }
    fields
}

fn parse_hex_pair(digits: &str) -> Result<u8, SentenceError> {
    let mut chars = digits.chars();
    match (
        chars.next().and_then(|c| c.to_digit(16)),
        chars.next().and_then(|c| c.to_digit(16)),
    ) {
        (Some(hi), Some(lo)) => Ok(((hi << 4) | lo) as u8),
        _ => Err(SentenceError::InvalidChecksumDigits(
            digits.chars().take(2).collect(),
        )),
    }
}
