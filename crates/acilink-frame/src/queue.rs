use heapless::Deque;
use tracing::trace;

use crate::frame::{Frame, DEFAULT_MAX_LENGTH};

/// Default depth of the command and event queues.
pub const DEFAULT_QUEUE_DEPTH: usize = 4;

/// Bounded FIFO of frames with fixed capacity `N`.
///
/// Frames come out in the order they went in. All operations are O(1) and
/// never allocate.
#[derive(Debug, Clone)]
pub struct FrameQueue<const MAX: usize = DEFAULT_MAX_LENGTH, const N: usize = DEFAULT_QUEUE_DEPTH> {
    frames: Deque<Frame<MAX>, N>,
}

impl<const MAX: usize, const N: usize> FrameQueue<MAX, N> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            frames: Deque::new(),
        }
    }

    /// Reset to empty. Idempotent.
    pub fn init(&mut self) {
        self.frames.clear();
    }

    /// Append at the tail. A full queue hands the frame back unchanged.
    pub fn enqueue(&mut self, frame: Frame<MAX>) -> Result<(), Frame<MAX>> {
        self.frames.push_back(frame).inspect_err(|_| {
            trace!(capacity = N, "frame queue full");
        })
    }

    /// Remove and return the head.
    pub fn dequeue(&mut self) -> Option<Frame<MAX>> {
        self.frames.pop_front()
    }

    /// Borrow the head without removing it.
    pub fn peek(&self) -> Option<&Frame<MAX>> {
        self.frames.front()
    }

    pub fn is_full(&self) -> bool {
        self.frames.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn capacity(&self) -> usize {
        N
    }
}

impl<const MAX: usize, const N: usize> Default for FrameQueue<MAX, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: u8) -> Frame<4> {
        Frame::command(&[tag]).unwrap()
    }

    #[test]
    fn preserves_fifo_order() {
        let mut q: FrameQueue<4, 4> = FrameQueue::new();
        q.enqueue(frame(b'A')).unwrap();
        q.enqueue(frame(b'B')).unwrap();
        q.enqueue(frame(b'C')).unwrap();

        assert_eq!(q.dequeue().unwrap().payload(), b"A");
        assert_eq!(q.dequeue().unwrap().payload(), b"B");
        assert_eq!(q.dequeue().unwrap().payload(), b"C");
        assert!(q.dequeue().is_none());
    }

    #[test]
    fn full_queue_rejects_and_keeps_state() {
        let mut q: FrameQueue<4, 2> = FrameQueue::new();
        q.enqueue(frame(1)).unwrap();
        q.enqueue(frame(2)).unwrap();
        assert!(q.is_full());

        let rejected = q.enqueue(frame(3)).unwrap_err();
        assert_eq!(rejected.payload(), &[3]);
        assert_eq!(q.len(), 2);
        assert_eq!(q.peek().unwrap().payload(), &[1]);
    }

    #[test]
    fn init_clears_and_is_idempotent() {
        let mut q: FrameQueue<4, 2> = FrameQueue::default();
        q.enqueue(frame(1)).unwrap();
        q.init();
        q.init();
        assert!(q.is_empty());
        assert_eq!(q.capacity(), 2);
    }

    #[test]
    fn wraps_around_ring_storage() {
        let mut q: FrameQueue<4, 2> = FrameQueue::new();
        for tag in 0..10u8 {
            q.enqueue(frame(tag)).unwrap();
            assert_eq!(q.dequeue().unwrap().payload(), &[tag]);
        }
        assert!(q.is_empty());
    }
}
