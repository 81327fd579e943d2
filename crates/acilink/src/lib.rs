//! Host-side transport for the nRF8001 application controller interface.
//!
//! acilink moves length-prefixed command and event frames between a host and
//! the radio over SPI, gated by the REQN/RDYN handshake.
//!
//! # Crate Structure
//!
//! - [`hal`] — Link primitives, simulated radio, `embedded-hal` adapter
//! - [`frame`] — Fixed-capacity frames and bounded frame queues
//! - [`transport`] — Flow control, transfer engine, shared transport handle

/// Re-export link primitives.
pub mod hal {
    pub use acilink_hal::*;
}

/// Re-export frame types.
pub mod frame {
    pub use acilink_frame::*;
}

/// Re-export transport types.
pub mod transport {
    pub use acilink_transport::*;
}
