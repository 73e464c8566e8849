//! Fixed-Size Queue Records

use crate::error::QueueError;
use serde::{Deserialize, Serialize};

/// Maximum payload stored in a single queue item (bytes)
pub const PAYLOAD_CAPACITY: usize = 256;

/// A single queued record: payload bytes plus their explicit length
///
/// The payload is validated against [`PAYLOAD_CAPACITY`] on construction,
/// oversized input is rejected rather than truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct QueueItem {
    payload: Vec<u8>,
}

impl QueueItem {
    /// Create an item from raw payload bytes
    pub fn new(payload: &[u8]) -> Result<Self, QueueError> {
        Self::check_len(payload.len())?;
        Ok(Self {
            payload: payload.to_vec(),
        })
    }

    /// Encode a record (e.g. a decoded position fix) into an item
    pub fn encode<R: Serialize>(record: &R) -> Result<Self, QueueError> {
        let payload = postcard::to_allocvec(record)?;
        Self::check_len(payload.len())?;
        Ok(Self { payload })
    }

    /// Decode the payload back into a record
    pub fn decode<'a, R: Deserialize<'a>>(&'a self) -> Result<R, QueueError> {
        Ok(postcard::from_bytes(&self.payload)?)
    }

    /// Payload bytes
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    fn check_len(len: usize) -> Result<(), QueueError> {
        if len > PAYLOAD_CAPACITY {
            return Err(QueueError::PayloadTooLarge {
                len,
                max: PAYLOAD_CAPACITY,
            });
        }
        Ok(())
    }
}

impl TryFrom<Vec<u8>> for QueueItem {
    type Error = QueueError;

    fn try_from(payload: Vec<u8>) -> Result<Self, Self::Error> {
        Self::check_len(payload.len())?;
        Ok(Self { payload })
    }
}

impl From<QueueItem> for Vec<u8> {
    fn from(item: QueueItem) -> Self {
        item.payload
    }
}
