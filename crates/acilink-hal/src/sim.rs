use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::error::{HalError, Result};
use crate::traits::AciLink;

/// Byte clocked out by the simulated radio past the end of its frame.
pub const DEFAULT_FILLER: u8 = 0x00;

/// In-memory stand-in for the radio.
///
/// Behaves like the peer side of the link: it asserts READY whenever the host
/// requests a transfer or it has an event of its own to deliver, clocks out
/// `[status, length, payload..]` for the next scripted event (or an empty
/// frame), and collects the bytes the host clocks in. A transaction opens on
/// the first exchange and closes when REQUEST is deasserted.
#[derive(Debug)]
pub struct SimulatedRadio {
    events: VecDeque<Vec<u8>>,
    commands: Vec<Vec<u8>>,
    open: Option<Transaction>,
    request: bool,
    ready_override: Option<bool>,
    idle_status: u8,
    filler: u8,
    exchanges: usize,
    transactions: usize,
    empty_polls: usize,
    resets: usize,
    request_log: Vec<bool>,
    fail_after: Option<usize>,
}

#[derive(Debug, Default)]
struct Transaction {
    outgoing: Vec<u8>,
    incoming: Vec<u8>,
}

impl Default for SimulatedRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedRadio {
    /// Create a radio with no pending events.
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
            commands: Vec::new(),
            open: None,
            request: false,
            ready_override: None,
            idle_status: 0,
            filler: DEFAULT_FILLER,
            exchanges: 0,
            transactions: 0,
            empty_polls: 0,
            resets: 0,
            request_log: Vec::new(),
            fail_after: None,
        }
    }

    /// Use `filler` for bytes clocked past the end of the radio's frame.
    pub fn with_filler(mut self, filler: u8) -> Self {
        self.filler = filler;
        self
    }

    /// Status byte sent when the radio has no event queued.
    pub fn with_idle_status(mut self, status: u8) -> Self {
        self.idle_status = status;
        self
    }

    /// Queue an event; its declared length is the payload length.
    pub fn push_event(&mut self, status: u8, payload: &[u8]) {
        let length = u8::try_from(payload.len()).unwrap_or(u8::MAX);
        self.push_event_with_length(status, length, payload);
    }

    /// Queue an event whose declared length may disagree with its payload.
    pub fn push_event_with_length(&mut self, status: u8, length: u8, payload: &[u8]) {
        let mut wire = Vec::with_capacity(payload.len() + 2);
        wire.push(status);
        wire.push(length);
        wire.extend_from_slice(payload);
        self.events.push_back(wire);
    }

    /// Force the READY line to a level, or `None` to follow the radio's own logic.
    pub fn force_ready(&mut self, level: Option<bool>) {
        self.ready_override = level;
    }

    /// Fail every exchange after `count` more successful ones.
    pub fn fail_after(&mut self, count: Option<usize>) {
        self.fail_after = count;
    }

    /// Command payloads received so far, trimmed to their declared length.
    pub fn commands(&self) -> &[Vec<u8>] {
        &self.commands
    }

    /// Events not yet clocked out.
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Total calls to [`AciLink::exchange`].
    pub fn exchange_count(&self) -> usize {
        self.exchanges
    }

    /// Completed transactions.
    pub fn transaction_count(&self) -> usize {
        self.transactions
    }

    /// Completed transactions in which the host had nothing to send.
    pub fn empty_poll_count(&self) -> usize {
        self.empty_polls
    }

    /// Completed reset sequences.
    pub fn reset_count(&self) -> usize {
        self.resets
    }

    /// Current REQUEST level as seen by the radio.
    pub fn request_asserted(&self) -> bool {
        self.request
    }

    /// Every REQUEST level change, in order.
    pub fn request_log(&self) -> &[bool] {
        &self.request_log
    }

    fn ready_level(&self) -> bool {
        self.ready_override
            .unwrap_or(self.request || self.open.is_some() || !self.events.is_empty())
    }

    fn open_transaction(&mut self) -> Transaction {
        let outgoing = self
            .events
            .pop_front()
            .unwrap_or_else(|| vec![self.idle_status, 0]);
        Transaction {
            outgoing,
            incoming: Vec::new(),
        }
    }

    fn close_transaction(&mut self, tx: Transaction) {
        self.transactions += 1;
        let declared = tx.incoming.first().copied().unwrap_or(0) as usize;
        if declared == 0 {
            self.empty_polls += 1;
            debug!(clocked = tx.incoming.len(), "radio closed empty poll");
            return;
        }
        let end = (declared + 1).min(tx.incoming.len());
        let payload = tx.incoming[1..end].to_vec();
        debug!(
            declared,
            received = payload.len(),
            "radio closed command transaction"
        );
        self.commands.push(payload);
    }
}

impl AciLink for SimulatedRadio {
    fn exchange(&mut self, byte: u8) -> Result<u8> {
        if !self.request {
            return Err(HalError::Exchange(
                "byte clocked while REQN deasserted".to_string(),
            ));
        }
        if let Some(remaining) = self.fail_after.as_mut() {
            if *remaining == 0 {
                return Err(HalError::Exchange("injected bus fault".to_string()));
            }
            *remaining -= 1;
        }

        self.exchanges += 1;
        let mut tx = match self.open.take() {
            Some(tx) => tx,
            None => self.open_transaction(),
        };
        let index = tx.incoming.len();
        let reply = tx.outgoing.get(index).copied().unwrap_or(self.filler);
        tx.incoming.push(byte);
        self.open = Some(tx);

        trace!(index, sent = byte, received = reply, "radio exchange");
        Ok(reply)
    }

    fn set_request(&mut self, asserted: bool) -> Result<()> {
        if self.request != asserted {
            self.request_log.push(asserted);
        }
        self.request = asserted;
        if !asserted {
            if let Some(tx) = self.open.take() {
                self.close_transaction(tx);
            }
        }
        Ok(())
    }

    fn read_ready(&mut self) -> Result<bool> {
        Ok(self.ready_level())
    }

    fn reset(&mut self) -> Result<()> {
        self.resets += 1;
        self.open = None;
        if self.request {
            self.request_log.push(false);
        }
        self.request = false;
        debug!("simulated radio reset");
        Ok(())
    }
}
