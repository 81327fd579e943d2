use std::fmt;

/// Handshake and control lines between host and radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// Host-driven REQN line.
    Request,
    /// Peer-driven RDYN line.
    Ready,
    /// Radio reset line.
    Reset,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Line::Request => "REQN",
            Line::Ready => "RDYN",
            Line::Reset => "RESET",
        };
        f.write_str(name)
    }
}

/// Errors raised by link primitives.
#[derive(Debug, thiserror::Error)]
pub enum HalError {
    /// The synchronous byte exchange on the bus failed.
    #[error("byte exchange failed: {0}")]
    Exchange(String),

    /// Driving or sampling a handshake line failed.
    #[error("failed to access {line} line: {detail}")]
    Pin { line: Line, detail: String },
}

pub type Result<T> = std::result::Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_error_names_the_line() {
        let err = HalError::Pin {
            line: Line::Ready,
            detail: "floating".to_string(),
        };
        assert_eq!(err.to_string(), "failed to access RDYN line: floating");
    }
}
