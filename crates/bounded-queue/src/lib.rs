//! Bounded Telemetry Queue
//!
//! Provides a fixed-capacity FIFO ring buffer used to buffer decoded
//! telemetry records between the PAC-RF decoders and their consumers.

mod error;
mod item;
mod queue;

pub use error::QueueError;
pub use item::{QueueItem, PAYLOAD_CAPACITY};
pub use queue::{BoundedQueue, QueueStatus, DEFAULT_CAPACITY};
