use acilink_frame::{Frame, FrameQueue, DEFAULT_MAX_LENGTH, DEFAULT_QUEUE_DEPTH};
use acilink_hal::AciLink;
use tracing::{debug, error, info, warn};

use crate::config::{OverflowPolicy, TransportConfig};
use crate::controller::{self, Decision, LinkState};
use crate::engine;
use crate::error::{Result, TransportError};

/// Counters kept by a transport instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Completed transfers.
    pub transfers: u64,
    /// Transfers run with nothing to send.
    pub empty_polls: u64,
    /// Command frames handed to the link.
    pub commands_sent: u64,
    /// Event frames stored in the event queue.
    pub events_received: u64,
    /// Events discarded under [`OverflowPolicy::DropOldest`].
    pub events_dropped: u64,
    /// Cycles skipped because the event queue was full.
    pub backpressure_stalls: u64,
}

/// What a single drive cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Event queue full; nothing attempted.
    Backpressured,
    /// REQUEST asserted, peer not ready yet.
    Waiting,
    /// Nothing to send and peer not ready.
    Idle,
    /// A frame exchange ran.
    Transferred(TransferSummary),
}

/// Summary of a completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSummary {
    /// Length of the command sent (0 for an empty poll).
    pub sent: u8,
    /// Length declared by the peer.
    pub received: u8,
    /// Status byte reported by the peer.
    pub status: u8,
    /// Payload bytes exchanged after the header.
    pub exchanged: usize,
    /// Whether the received frame was queued as an event.
    pub event_queued: bool,
}

/// Transport context: the link, both queues, and the REQUEST level.
///
/// Every operation takes `&mut self`, so a cycle can never re-enter itself.
/// For a READY interrupt and a polling caller sharing one transport, wrap it
/// in a [`SharedTransport`](crate::SharedTransport).
pub struct Transport<
    L,
    const MAX: usize = DEFAULT_MAX_LENGTH,
    const DEPTH: usize = DEFAULT_QUEUE_DEPTH,
> {
    link: L,
    commands: FrameQueue<MAX, DEPTH>,
    events: FrameQueue<MAX, DEPTH>,
    config: TransportConfig,
    request_asserted: bool,
    state: LinkState,
    faulted: bool,
    stats: TransportStats,
}

impl<L: AciLink, const MAX: usize, const DEPTH: usize> Transport<L, MAX, DEPTH> {
    /// Bring up the transport with default configuration.
    pub fn new(link: L) -> Result<Self> {
        Self::init(link, TransportConfig::default())
    }

    /// Bring up the transport: reset the radio if configured, empty both
    /// queues and leave REQUEST deasserted.
    pub fn init(mut link: L, config: TransportConfig) -> Result<Self> {
        if config.reset_on_init {
            link.reset()?;
        }
        link.set_request(false)?;
        info!(
            max_length = MAX,
            queue_depth = DEPTH,
            policy = ?config.overflow_policy,
            "aci transport initialized"
        );

        Ok(Self {
            link,
            commands: FrameQueue::new(),
            events: FrameQueue::new(),
            config,
            request_asserted: false,
            state: LinkState::Idle,
            faulted: false,
            stats: TransportStats::default(),
        })
    }

    /// Queue a command frame.
    ///
    /// Rejects frames whose length exceeds `MAX` and frames that find the
    /// command queue full; neither has any side effect.
    pub fn send(&mut self, frame: &Frame<MAX>) -> Result<()> {
        self.ensure_healthy()?;
        if !frame.fits() {
            return Err(TransportError::FrameTooLong {
                length: frame.length as usize,
                max: MAX,
            });
        }
        if self.commands.enqueue(*frame).is_err() {
            return Err(TransportError::CommandQueueFull { capacity: DEPTH });
        }
        debug!(length = frame.length, queued = self.commands.len(), "command queued");
        self.sync_request()
    }

    /// Take the next event, running one cycle first if there is room for
    /// another event.
    pub fn try_receive(&mut self) -> Result<Option<Frame<MAX>>> {
        self.ensure_healthy()?;
        if !self.events.is_full() {
            self.drive()?;
        }

        let event = self.events.dequeue();
        if event.is_some() {
            self.sync_request()?;
        }
        Ok(event)
    }

    /// Current level of the READY line.
    pub fn is_peer_ready(&mut self) -> Result<bool> {
        Ok(self.link.read_ready()?)
    }

    /// Drive one cycle from a polling context.
    pub fn poll(&mut self) -> Result<Cycle> {
        self.ensure_healthy()?;
        self.drive()
    }

    /// Drive one cycle from the READY edge handler.
    pub fn on_ready_edge(&mut self) -> Result<Cycle> {
        self.ensure_healthy()?;
        self.drive()
    }

    /// Empty both queues, deassert REQUEST and clear any latched fault.
    pub fn flush(&mut self) -> Result<()> {
        let dropped_commands = self.commands.len();
        let dropped_events = self.events.len();
        self.commands.init();
        self.events.init();
        self.faulted = false;
        self.set_request(false)?;
        self.state = LinkState::Idle;
        info!(dropped_commands, dropped_events, "aci queues flushed");
        Ok(())
    }

    /// Observed handshake phase.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Level last driven on REQUEST.
    pub fn is_request_asserted(&self) -> bool {
        self.request_asserted
    }

    /// True after an overflow under [`OverflowPolicy::Fault`].
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn stats(&self) -> &TransportStats {
        &self.stats
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Borrow the link.
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutably borrow the link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Consume the transport and return the link.
    pub fn into_link(self) -> L {
        self.link
    }

    fn ensure_healthy(&self) -> Result<()> {
        if self.faulted {
            Err(TransportError::Faulted)
        } else {
            Ok(())
        }
    }

    fn drive(&mut self) -> Result<Cycle> {
        let inbound_full = self.events.is_full();
        let ready = if inbound_full {
            false
        } else {
            self.link.read_ready()?
        };

        match controller::evaluate(!self.commands.is_empty(), inbound_full, ready) {
            Decision::Backpressured => {
                self.stats.backpressure_stalls += 1;
                self.sync_request()?;
                debug!(queued = self.events.len(), "event queue full; transfer deferred");
                Ok(Cycle::Backpressured)
            }
            Decision::Wait { request } => {
                self.set_request(request)?;
                self.state = controller::resting_state(request);
                Ok(if request { Cycle::Waiting } else { Cycle::Idle })
            }
            Decision::Transfer => self.run_transfer(),
        }
    }

    fn run_transfer(&mut self) -> Result<Cycle> {
        self.state = LinkState::Transferring;
        let outbound = self.commands.dequeue();
        let frame = outbound.unwrap_or_else(Frame::empty);

        let result = engine::transfer(&mut self.link, &frame);
        // The engine releases REQUEST on every path.
        self.request_asserted = false;
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                self.state = LinkState::Idle;
                if let Err(sync_err) = self.sync_request() {
                    warn!(error = %sync_err, "failed re-syncing REQN after aborted transfer");
                }
                return Err(err);
            }
        };

        self.stats.transfers += 1;
        if outbound.is_some() {
            self.stats.commands_sent += 1;
        } else {
            self.stats.empty_polls += 1;
        }

        let event_queued = outcome.has_event();
        if event_queued {
            self.deliver(outcome.received)?;
        }
        self.sync_request()?;

        Ok(Cycle::Transferred(TransferSummary {
            sent: frame.length,
            received: outcome.received.length,
            status: outcome.received.status,
            exchanged: outcome.exchanged,
            event_queued,
        }))
    }

    fn deliver(&mut self, event: Frame<MAX>) -> Result<()> {
        let Err(event) = self.events.enqueue(event) else {
            self.stats.events_received += 1;
            return Ok(());
        };

        match self.config.overflow_policy {
            OverflowPolicy::Fault => {
                self.faulted = true;
                self.state = LinkState::Idle;
                error!(
                    capacity = DEPTH,
                    "event queue overflow: backpressure cutoff violated; transport halted"
                );
                if let Err(release_err) = self.set_request(false) {
                    warn!(error = %release_err, "failed releasing REQN after overflow");
                }
                Err(TransportError::EventOverflow { capacity: DEPTH })
            }
            OverflowPolicy::DropOldest => {
                let evicted = self.events.dequeue();
                self.stats.events_dropped += 1;
                warn!(
                    capacity = DEPTH,
                    status = evicted.map(|frame| frame.status),
                    length = evicted.map(|frame| frame.length),
                    "event queue overflow: dropped oldest event"
                );
                if self.events.enqueue(event).is_ok() {
                    self.stats.events_received += 1;
                }
                Ok(())
            }
        }
    }

    fn sync_request(&mut self) -> Result<()> {
        let request = controller::should_request(!self.commands.is_empty(), self.events.is_full());
        self.set_request(request)?;
        self.state = controller::resting_state(request);
        Ok(())
    }

    fn set_request(&mut self, asserted: bool) -> Result<()> {
        if self.request_asserted != asserted {
            self.link.set_request(asserted)?;
            self.request_asserted = asserted;
        }
        Ok(())
    }
}

impl<L, const MAX: usize, const DEPTH: usize> std::fmt::Debug for Transport<L, MAX, DEPTH> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("state", &self.state)
            .field("request_asserted", &self.request_asserted)
            .field("pending_commands", &self.commands.len())
            .field("pending_events", &self.events.len())
            .field("faulted", &self.faulted)
            .finish()
    }
}
