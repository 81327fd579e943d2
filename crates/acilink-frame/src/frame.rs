use crate::error::{FrameError, Result};

/// Default payload capacity of a frame.
pub const DEFAULT_MAX_LENGTH: usize = 31;

/// A length-prefixed frame with inline storage.
///
/// Outbound (command) frames put the payload byte count in `length`; `status`
/// is not transmitted. Inbound (event) frames carry the radio's status byte in
/// `status` and its declared payload length in `length`.
///
/// Wire layout of one transfer, host view:
/// ```text
///  byte   0        1            2 ..
///  MOSI   length   payload[0]   payload[1] ..
///  MISO   status   length       payload[0] ..
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame<const MAX: usize = DEFAULT_MAX_LENGTH> {
    /// Transfer status reported by the radio (inbound only).
    pub status: u8,
    /// Payload byte count.
    pub length: u8,
    /// Payload storage; bytes past `length` are undefined.
    pub payload: [u8; MAX],
}

impl<const MAX: usize> Frame<MAX> {
    /// Payload capacity.
    pub const MAX_LENGTH: usize = MAX;

    const CAPACITY_FITS_LENGTH_BYTE: () = assert!(
        MAX <= u8::MAX as usize,
        "frame capacity must fit the length byte"
    );

    /// An empty frame: zero length, zeroed payload.
    ///
    /// Sending it still performs a transfer, which lets the radio deliver an
    /// event when the host has nothing queued.
    pub const fn empty() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_FITS_LENGTH_BYTE;
        Self {
            status: 0,
            length: 0,
            payload: [0; MAX],
        }
    }

    /// Build a command frame from a payload.
    pub fn command(payload: &[u8]) -> Result<Self> {
        Self::event(0, payload)
    }

    /// Build a frame with an explicit status byte.
    pub fn event(status: u8, payload: &[u8]) -> Result<Self> {
        if payload.len() > MAX {
            return Err(FrameError::TooLong {
                length: payload.len(),
                max: MAX,
            });
        }
        let mut frame = Self::empty();
        frame.status = status;
        // MAX <= u8::MAX is enforced at compile time.
        frame.length = payload.len() as u8;
        frame.payload[..payload.len()].copy_from_slice(payload);
        Ok(frame)
    }

    /// Declared payload, clamped to capacity.
    pub fn payload(&self) -> &[u8] {
        let len = (self.length as usize).min(MAX);
        &self.payload[..len]
    }

    /// True when the frame declares no payload.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// True when the declared length is within capacity.
    pub fn fits(&self) -> bool {
        self.length as usize <= MAX
    }

    /// Bytes an outbound frame needs on the wire: length byte plus payload.
    pub fn wire_size(&self) -> usize {
        1 + self.length as usize
    }
}

impl<const MAX: usize> Default for Frame<MAX> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_copies_payload_and_length() {
        let frame: Frame = Frame::command(&[9, 9, 9]).unwrap();
        assert_eq!(frame.length, 3);
        assert_eq!(frame.payload(), &[9, 9, 9]);
        assert_eq!(frame.wire_size(), 4);
        assert!(frame.fits());
    }

    #[test]
    fn command_rejects_oversized_payload() {
        let err = Frame::<4>::command(&[0; 5]).unwrap_err();
        assert_eq!(err, FrameError::TooLong { length: 5, max: 4 });
    }

    #[test]
    fn full_capacity_payload_is_accepted() {
        let frame = Frame::<DEFAULT_MAX_LENGTH>::command(&[0xAB; DEFAULT_MAX_LENGTH]).unwrap();
        assert_eq!(frame.length as usize, DEFAULT_MAX_LENGTH);
        assert!(frame.fits());
    }

    #[test]
    fn payload_is_clamped_when_length_overstates() {
        let mut frame = Frame::<4>::empty();
        frame.length = 40;
        assert!(!frame.fits());
        assert_eq!(frame.payload().len(), 4);
    }

    #[test]
    fn empty_frame_is_zeroed() {
        let frame = Frame::<8>::default();
        assert!(frame.is_empty());
        assert_eq!(frame.status, 0);
        assert_eq!(frame.payload, [0; 8]);
        assert_eq!(Frame::<8>::MAX_LENGTH, 8);
    }

    #[test]
    fn event_keeps_status() {
        let frame = Frame::<8>::event(0x81, &[1, 2]).unwrap();
        assert_eq!(frame.status, 0x81);
        assert_eq!(frame.payload(), &[1, 2]);
    }
}
