//! Flow control and command/event queues for the ACI transport.
//!
//! This is the "just works" layer. Queue a command with
//! [`Transport::send`], pull events with [`Transport::try_receive`], and drive
//! the link from either the READY edge ([`Transport::on_ready_edge`]) or a
//! poll ([`Transport::poll`]). The transport owns both queues and the link for
//! its whole lifetime.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod shared;
pub mod transport;

pub use config::{OverflowPolicy, TransportConfig};
pub use controller::{Decision, LinkState};
pub use engine::{exchange_length, TransferOutcome};
pub use error::{Result, TransportError};
pub use shared::SharedTransport;
pub use transport::{Cycle, TransferSummary, Transport, TransportStats};
