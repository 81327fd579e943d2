use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};

use acilink_frame::{Frame, DEFAULT_MAX_LENGTH, DEFAULT_QUEUE_DEPTH};
use acilink_hal::AciLink;
use tracing::{trace, warn};

use crate::error::{Result, TransportError};
use crate::transport::{Cycle, Transport};

type Guard<'a, L, const MAX: usize, const DEPTH: usize> = MutexGuard<'a, Transport<L, MAX, DEPTH>>;

/// A transport shared between a READY edge handler and a polling caller.
///
/// Queue mutation and the REQUEST decision happen under one lock. The edge
/// path and `try_receive` never wait behind another context: if the lock is
/// held they return immediately. A skipped edge is latched, and whichever
/// context holds the lock replays it before letting go, so a peer that keeps
/// READY asserted without a second edge is still served.
pub struct SharedTransport<
    L,
    const MAX: usize = DEFAULT_MAX_LENGTH,
    const DEPTH: usize = DEFAULT_QUEUE_DEPTH,
> {
    inner: Mutex<Transport<L, MAX, DEPTH>>,
    edge_pending: AtomicBool,
}

impl<L: AciLink, const MAX: usize, const DEPTH: usize> SharedTransport<L, MAX, DEPTH> {
    pub fn new(transport: Transport<L, MAX, DEPTH>) -> Self {
        Self {
            inner: Mutex::new(transport),
            edge_pending: AtomicBool::new(false),
        }
    }

    /// READY edge handler. Returns `Ok(None)` when another context holds the
    /// transport; that context runs the cycle on release.
    pub fn on_ready_edge(&self) -> Result<Option<Cycle>> {
        // Latch before trying the lock so a holder that is releasing sees it.
        self.edge_pending.store(true, Ordering::SeqCst);
        match self.try_lock()? {
            Some(mut transport) => {
                self.edge_pending.store(false, Ordering::SeqCst);
                let cycle = transport.on_ready_edge();
                self.release(transport);
                cycle.map(Some)
            }
            None => {
                trace!("ready edge while transport busy; latched");
                Ok(None)
            }
        }
    }

    /// Non-blocking receive. Returns `Ok(None)` both when no event is queued
    /// and when another context holds the transport.
    pub fn try_receive(&self) -> Result<Option<Frame<MAX>>> {
        match self.try_lock()? {
            Some(mut transport) => {
                let event = transport.try_receive();
                self.release(transport);
                event
            }
            None => Ok(None),
        }
    }

    /// Queue a command, waiting for any running cycle to finish.
    pub fn send(&self, frame: &Frame<MAX>) -> Result<()> {
        self.with_lock(|transport| transport.send(frame))?
    }

    /// Drive one cycle, waiting for the lock.
    pub fn poll(&self) -> Result<Cycle> {
        self.with_lock(|transport| transport.poll())?
    }

    pub fn is_peer_ready(&self) -> Result<bool> {
        self.with_lock(|transport| transport.is_peer_ready())?
    }

    pub fn flush(&self) -> Result<()> {
        self.with_lock(|transport| transport.flush())?
    }

    /// Run `f` with exclusive access to the transport. Edges latched while
    /// `f` runs are replayed before the lock is released.
    pub fn with<R>(&self, f: impl FnOnce(&mut Transport<L, MAX, DEPTH>) -> R) -> Result<R> {
        self.with_lock(f)
    }

    /// Recover the transport.
    pub fn into_inner(self) -> Result<Transport<L, MAX, DEPTH>> {
        self.inner.into_inner().map_err(|_| TransportError::Poisoned)
    }

    fn with_lock<R>(&self, f: impl FnOnce(&mut Transport<L, MAX, DEPTH>) -> R) -> Result<R> {
        let mut transport = self.inner.lock().map_err(|_| TransportError::Poisoned)?;
        let out = f(&mut transport);
        self.release(transport);
        Ok(out)
    }

    /// Replay latched edges, then unlock. The flag is checked again after
    /// unlocking: an edge that lost the race for the lock after the last
    /// replay is picked up here or by the next holder.
    fn release<'a>(&'a self, mut transport: Guard<'a, L, MAX, DEPTH>) {
        loop {
            while self.edge_pending.swap(false, Ordering::SeqCst) {
                match transport.on_ready_edge() {
                    Ok(cycle) => trace!(?cycle, "replayed latched ready edge"),
                    Err(err) => {
                        warn!(error = %err, "replayed ready edge failed");
                        break;
                    }
                }
            }
            drop(transport);

            if !self.edge_pending.load(Ordering::SeqCst) {
                return;
            }
            transport = match self.inner.try_lock() {
                Ok(guard) => guard,
                Err(_) => return,
            };
        }
    }

    fn try_lock(&self) -> Result<Option<Guard<'_, L, MAX, DEPTH>>> {
        match self.inner.try_lock() {
            Ok(guard) => Ok(Some(guard)),
            Err(TryLockError::WouldBlock) => Ok(None),
            Err(TryLockError::Poisoned(_)) => Err(TransportError::Poisoned),
        }
    }
}
