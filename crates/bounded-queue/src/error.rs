//! Queue Error Types

use thiserror::Error;

/// Errors returned by queue operations
#[derive(Debug, Error)]
pub enum QueueError {
    /// Queue created with zero slots
    #[error("Queue capacity must be greater than zero")]
    ZeroCapacity,

    /// Enqueue rejected because every slot is occupied
    #[error("Queue is full ({capacity} items)")]
    Full { capacity: usize },

    /// Dequeue rejected because no item is stored
    #[error("Queue is empty")]
    Empty,

    /// Payload does not fit in a queue item
    #[error("Payload of {len} bytes exceeds item capacity of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },

    /// Record could not be encoded into or decoded from a payload
    #[error("Payload codec error: {0}")]
    Codec(#[from] postcard::Error),
}
