/// Errors that can occur while building frames.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the frame capacity.
    #[error("frame too long ({length} bytes, max {max})")]
    TooLong { length: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
