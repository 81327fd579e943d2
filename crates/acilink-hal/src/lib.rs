//! Link primitives for the ACI transport.
//!
//! The transport layer never touches registers. Everything it needs from the
//! hardware is expressed by the [`AciLink`] trait:
//! - `exchange` — clock one byte out, return the byte clocked in
//! - `set_request` — drive the host REQUEST (REQN) line
//! - `read_ready` — sample the peer READY (RDYN) line
//! - `reset` — pulse the radio's reset line and wait for its pins to settle
//!
//! This is the lowest layer of acilink. [`SimulatedRadio`] stands in for the
//! radio on a host; the `embedded-hal` feature provides [`EmbeddedHalLink`]
//! for real targets.

pub mod config;
pub mod error;
pub mod sim;
pub mod traits;

#[cfg(feature = "embedded-hal")]
pub mod embedded;

pub use config::{InterfaceMode, LinkConfig, SpiClockDivider, DEFAULT_RESET_SETTLE};
pub use error::{HalError, Line, Result};
pub use sim::{SimulatedRadio, DEFAULT_FILLER};
pub use traits::AciLink;

#[cfg(feature = "embedded-hal")]
pub use embedded::EmbeddedHalLink;
