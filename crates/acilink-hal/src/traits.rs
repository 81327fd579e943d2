use crate::error::Result;

/// Hardware primitives consumed by the transport.
///
/// Levels are logical: `true` means asserted regardless of the electrical
/// polarity of the underlying pin (REQN and RDYN are active-low on the
/// nRF8001).
pub trait AciLink {
    /// Exchange one byte synchronously and return the byte received while
    /// `byte` was sent. Blocks until the bus reports completion.
    fn exchange(&mut self, byte: u8) -> Result<u8>;

    /// Assert or deassert the REQUEST line.
    fn set_request(&mut self, asserted: bool) -> Result<()>;

    /// Sample the READY line.
    fn read_ready(&mut self) -> Result<bool>;

    /// Put the radio into a known state: pulse reset, deassert REQUEST and
    /// wait for the radio to take hold of its lines.
    fn reset(&mut self) -> Result<()>;
}

impl<L: AciLink + ?Sized> AciLink for &mut L {
    fn exchange(&mut self, byte: u8) -> Result<u8> {
        (**self).exchange(byte)
    }

    fn set_request(&mut self, asserted: bool) -> Result<()> {
        (**self).set_request(asserted)
    }

    fn read_ready(&mut self) -> Result<bool> {
        (**self).read_ready()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}

impl<L: AciLink + ?Sized> AciLink for Box<L> {
    fn exchange(&mut self, byte: u8) -> Result<u8> {
        (**self).exchange(byte)
    }

    fn set_request(&mut self, asserted: bool) -> Result<()> {
        (**self).set_request(asserted)
    }

    fn read_ready(&mut self) -> Result<bool> {
        (**self).read_ready()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }
}
