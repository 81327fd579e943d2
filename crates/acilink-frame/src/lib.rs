//! Fixed-capacity frames and bounded frame queues for the ACI transport.
//!
//! A [`Frame`] is the unit moved across the link in one transfer slot:
//! - a status byte (set by the radio on inbound frames)
//! - a length byte (payload byte count)
//! - up to `MAX` payload bytes, stored inline
//!
//! No allocation anywhere. Queues are `heapless` deques of frames.

pub mod error;
pub mod frame;
pub mod queue;

pub use error::{FrameError, Result};
pub use frame::{Frame, DEFAULT_MAX_LENGTH};
pub use queue::{FrameQueue, DEFAULT_QUEUE_DEPTH};
