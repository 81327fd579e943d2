use acilink_hal::HalError;

/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Link primitive failed.
    #[error("link error: {0}")]
    Link(#[from] HalError),

    /// Outbound frame declares more payload than a frame can carry.
    #[error("frame length {length} exceeds maximum {max}")]
    FrameTooLong { length: usize, max: usize },

    /// No room in the command queue.
    #[error("command queue full ({capacity} frames)")]
    CommandQueueFull { capacity: usize },

    /// A transfer completed with the event queue already full.
    #[error("event queue overflow ({capacity} frames); received frame could not be stored")]
    EventOverflow { capacity: usize },

    /// The transport halted after an event queue overflow.
    #[error("transport halted after event queue overflow; flush to recover")]
    Faulted,

    /// A context panicked while holding the shared transport.
    #[error("shared transport lock poisoned")]
    Poisoned,
}

impl TransportError {
    /// True for rejections the caller can retry later.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TransportError::FrameTooLong { .. } | TransportError::CommandQueueFull { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_distinguished_from_faults() {
        assert!(TransportError::CommandQueueFull { capacity: 4 }.is_rejection());
        assert!(TransportError::FrameTooLong { length: 40, max: 31 }.is_rejection());
        assert!(!TransportError::EventOverflow { capacity: 4 }.is_rejection());
        assert!(!TransportError::Faulted.is_rejection());
    }

    #[test]
    fn hal_errors_convert() {
        let err: TransportError = HalError::Exchange("bus".to_string()).into();
        assert!(matches!(err, TransportError::Link(_)));
        assert_eq!(err.to_string(), "link error: byte exchange failed: bus");
    }
}
