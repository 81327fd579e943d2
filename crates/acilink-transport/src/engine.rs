//! One complete frame exchange over the link.

use acilink_frame::Frame;
use acilink_hal::AciLink;
use tracing::{debug, trace, warn};

use crate::error::Result;

/// Result of a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOutcome<const MAX: usize> {
    /// Frame clocked in from the peer.
    pub received: Frame<MAX>,
    /// Payload bytes exchanged after the two header bytes.
    pub exchanged: usize,
}

impl<const MAX: usize> TransferOutcome<MAX> {
    /// A transfer counts as successful when any payload bytes moved.
    pub fn succeeded(&self) -> bool {
        self.exchanged > 0
    }

    /// True when the peer delivered an event.
    pub fn has_event(&self) -> bool {
        self.received.length > 0
    }
}

/// Payload bytes to exchange after the header bytes.
///
/// One payload byte of the outbound frame has already gone out with the
/// peer's length byte, hence `sent - 1`. The longer of the two directions
/// wins so that both frames fit in the shared window. The result is clamped
/// to `max`; bytes past either side's declared length are filler.
pub fn exchange_length(sent: u8, received: u8, max: usize) -> usize {
    let wanted = if sent == 0 {
        received
    } else {
        received.max(sent - 1)
    };
    (wanted as usize).min(max)
}

/// Exchange `outbound` for one frame from the peer.
///
/// REQUEST is asserted for the duration and deasserted after the last byte.
/// On a link error REQUEST is released on a best-effort basis and the error
/// is returned; `outbound` is not retried.
pub fn transfer<L, const MAX: usize>(
    link: &mut L,
    outbound: &Frame<MAX>,
) -> Result<TransferOutcome<MAX>>
where
    L: AciLink + ?Sized,
{
    link.set_request(true)?;
    match clock_frame(link, outbound) {
        Ok(outcome) => {
            link.set_request(false)?;
            debug!(
                sent = outbound.length,
                received = outcome.received.length,
                status = outcome.received.status,
                exchanged = outcome.exchanged,
                "transfer complete"
            );
            Ok(outcome)
        }
        Err(err) => {
            if let Err(release_err) = link.set_request(false) {
                warn!(error = %release_err, "failed releasing REQN after aborted transfer");
            }
            Err(err)
        }
    }
}

fn clock_frame<L, const MAX: usize>(
    link: &mut L,
    outbound: &Frame<MAX>,
) -> Result<TransferOutcome<MAX>>
where
    L: AciLink + ?Sized,
{
    let mut received = Frame::<MAX>::empty();

    received.status = link.exchange(outbound.length)?;
    received.length = link.exchange(payload_byte(outbound, 0))?;

    let exchanged = exchange_length(outbound.length, received.length, MAX);
    for i in 0..exchanged {
        let byte = link.exchange(payload_byte(outbound, i + 1))?;
        received.payload[i] = byte;
        trace!(index = i, byte, "payload byte");
    }

    Ok(TransferOutcome {
        received,
        exchanged,
    })
}

fn payload_byte<const MAX: usize>(frame: &Frame<MAX>, index: usize) -> u8 {
    frame.payload.get(index).copied().unwrap_or(0)
}
