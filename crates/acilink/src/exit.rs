use std::fmt;
use std::io;

use acilink_hal::HalError;
use acilink_transport::TransportError;

// Process exit codes. 64 follows sysexits EX_USAGE.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn hal_error(context: &str, err: HalError) -> CliError {
    CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Link(err) => hal_error(context, err),
        TransportError::FrameTooLong { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        TransportError::CommandQueueFull { .. } => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
        TransportError::EventOverflow { .. } | TransportError::Faulted => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_transport_errors_to_codes() {
        let too_long = TransportError::FrameTooLong { length: 40, max: 31 };
        assert_eq!(transport_error("send", too_long).code, DATA_INVALID);

        let link = TransportError::Link(HalError::Exchange("bus".to_string()));
        let err = transport_error("poll", link);
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert_eq!(err.message, "poll: byte exchange failed: bus");

        assert_eq!(transport_error("x", TransportError::Poisoned).code, INTERNAL);
    }
}
