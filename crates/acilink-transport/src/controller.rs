//! REQN/RDYN flow-control decisions.
//!
//! The controller keeps no state of its own. Every invocation looks at the
//! queues and the READY line afresh, because occupancy can change between
//! asserting REQUEST and the peer answering.

/// Observable phase of the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// REQUEST deasserted, nothing pending.
    #[default]
    Idle,
    /// REQUEST asserted, waiting for READY.
    RequestPending,
    /// A frame exchange is running.
    Transferring,
}

/// Outcome of one controller evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Event queue full: no transfer, REQUEST deasserted.
    Backpressured,
    /// Peer not ready; hold REQUEST at the given level.
    Wait { request: bool },
    /// Peer ready and the result can be stored: exchange a frame now.
    Transfer,
}

/// Whether REQUEST should be asserted.
pub fn should_request(outbound_pending: bool, inbound_full: bool) -> bool {
    outbound_pending && !inbound_full
}

/// Whether a transfer may run right now.
pub fn can_transfer(inbound_full: bool, ready: bool) -> bool {
    !inbound_full && ready
}

/// Decide what one drive cycle does.
///
/// A full event queue wins over everything else: every transfer yields a
/// received frame, so none may start without room to store it.
pub fn evaluate(outbound_pending: bool, inbound_full: bool, ready: bool) -> Decision {
    if inbound_full {
        Decision::Backpressured
    } else if can_transfer(inbound_full, ready) {
        Decision::Transfer
    } else {
        Decision::Wait {
            request: should_request(outbound_pending, inbound_full),
        }
    }
}

/// Phase implied by the REQUEST level outside of a transfer.
pub fn resting_state(request_asserted: bool) -> LinkState {
    if request_asserted {
        LinkState::RequestPending
    } else {
        LinkState::Idle
    }
}
