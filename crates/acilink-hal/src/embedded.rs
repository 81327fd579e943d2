use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, InputPin, OutputPin};
use embedded_hal::spi::{Error as _, SpiBus};
use tracing::debug;

use crate::config::LinkConfig;
use crate::error::{HalError, Line, Result};
use crate::traits::AciLink;

/// [`AciLink`] over `embedded-hal` 1.0 peripherals.
///
/// The bus must already be configured by the board HAL for mode 0, LSB first,
/// at the rate given by [`LinkConfig::spi_clock_divider`]. REQN and RDYN are
/// active-low.
pub struct EmbeddedHalLink<SPI, REQN, RDYN, RST, D> {
    spi: SPI,
    reqn: REQN,
    rdyn: RDYN,
    reset: RST,
    delay: D,
    config: LinkConfig,
}

impl<SPI, REQN, RDYN, RST, D> EmbeddedHalLink<SPI, REQN, RDYN, RST, D>
where
    SPI: SpiBus<u8>,
    REQN: OutputPin,
    RDYN: InputPin,
    RST: OutputPin,
    D: DelayNs,
{
    /// Wrap the peripherals. No pin is touched until [`AciLink::reset`].
    pub fn new(spi: SPI, reqn: REQN, rdyn: RDYN, reset: RST, delay: D, config: LinkConfig) -> Self {
        Self {
            spi,
            reqn,
            rdyn,
            reset,
            delay,
            config,
        }
    }

    /// Link configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Give the peripherals back.
    pub fn release(self) -> (SPI, REQN, RDYN, RST, D) {
        (self.spi, self.reqn, self.rdyn, self.reset, self.delay)
    }
}

fn pin_error<E: embedded_hal::digital::Error>(line: Line) -> impl Fn(E) -> HalError {
    move |err| HalError::Pin {
        line,
        detail: format!("{:?}", err.kind()),
    }
}

fn bus_error<E: embedded_hal::spi::Error>(err: E) -> HalError {
    HalError::Exchange(format!("{:?}", err.kind()))
}

impl<SPI, REQN, RDYN, RST, D> AciLink for EmbeddedHalLink<SPI, REQN, RDYN, RST, D>
where
    SPI: SpiBus<u8>,
    REQN: OutputPin,
    RDYN: InputPin,
    RST: OutputPin,
    D: DelayNs,
{
    fn exchange(&mut self, byte: u8) -> Result<u8> {
        let mut word = [byte];
        self.spi.transfer_in_place(&mut word).map_err(bus_error)?;
        self.spi.flush().map_err(bus_error)?;
        Ok(word[0])
    }

    fn set_request(&mut self, asserted: bool) -> Result<()> {
        if asserted {
            self.reqn.set_low().map_err(pin_error(Line::Request))
        } else {
            self.reqn.set_high().map_err(pin_error(Line::Request))
        }
    }

    fn read_ready(&mut self) -> Result<bool> {
        self.rdyn.is_low().map_err(pin_error(Line::Ready))
    }

    fn reset(&mut self) -> Result<()> {
        self.reset.set_high().map_err(pin_error(Line::Reset))?;
        self.reset.set_low().map_err(pin_error(Line::Reset))?;
        self.reset.set_high().map_err(pin_error(Line::Reset))?;
        self.reqn.set_high().map_err(pin_error(Line::Request))?;

        let settle_ms = u32::try_from(self.config.reset_settle.as_millis()).unwrap_or(u32::MAX);
        self.delay.delay_ms(settle_ms);
        debug!(settle_ms, interface = ?self.config.interface, "radio reset complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::spi::ErrorType as SpiErrorType;

    use super::*;
    use crate::config::{InterfaceMode, DEFAULT_RESET_SETTLE};

    type Log = Rc<RefCell<Vec<String>>>;

    struct LoopbackSpi {
        log: Log,
    }

    impl SpiErrorType for LoopbackSpi {
        type Error = Infallible;
    }

    impl SpiBus<u8> for LoopbackSpi {
        fn read(&mut self, words: &mut [u8]) -> std::result::Result<(), Infallible> {
            words.fill(0);
            Ok(())
        }

        fn write(&mut self, _words: &[u8]) -> std::result::Result<(), Infallible> {
            Ok(())
        }

        fn transfer(
            &mut self,
            read: &mut [u8],
            write: &[u8],
        ) -> std::result::Result<(), Infallible> {
            read.copy_from_slice(&write[..read.len()]);
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> std::result::Result<(), Infallible> {
            for w in words.iter_mut() {
                self.log.borrow_mut().push(format!("spi {w:#04x}"));
                *w = !*w;
            }
            Ok(())
        }

        fn flush(&mut self) -> std::result::Result<(), Infallible> {
            Ok(())
        }
    }

    struct Pin {
        name: &'static str,
        level: bool,
        log: Log,
    }

    impl PinErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> std::result::Result<(), Infallible> {
            self.level = false;
            self.log.borrow_mut().push(format!("{} low", self.name));
            Ok(())
        }

        fn set_high(&mut self) -> std::result::Result<(), Infallible> {
            self.level = true;
            self.log.borrow_mut().push(format!("{} high", self.name));
            Ok(())
        }
    }

    impl InputPin for Pin {
        fn is_high(&mut self) -> std::result::Result<bool, Infallible> {
            Ok(self.level)
        }

        fn is_low(&mut self) -> std::result::Result<bool, Infallible> {
            Ok(!self.level)
        }
    }

    struct Delay {
        log: Log,
    }

    impl DelayNs for Delay {
        fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(format!("delay {ns}ns"));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(format!("delay {ms}ms"));
        }
    }

    fn link(log: &Log, rdyn_level: bool) -> EmbeddedHalLink<LoopbackSpi, Pin, Pin, Pin, Delay> {
        EmbeddedHalLink::new(
            LoopbackSpi { log: log.clone() },
            Pin {
                name: "reqn",
                level: true,
                log: log.clone(),
            },
            Pin {
                name: "rdyn",
                level: rdyn_level,
                log: log.clone(),
            },
            Pin {
                name: "reset",
                level: true,
                log: log.clone(),
            },
            Delay { log: log.clone() },
            LinkConfig::default(),
        )
    }

    #[test]
    fn request_is_active_low() {
        let log = Log::default();
        let mut link = link(&log, true);

        link.set_request(true).unwrap();
        link.set_request(false).unwrap();

        assert_eq!(*log.borrow(), vec!["reqn low", "reqn high"]);
    }

    #[test]
    fn keeps_link_config() {
        let log = Log::default();
        let link = link(&log, true);
        assert_eq!(link.config().interface, InterfaceMode::Interrupt);
        assert_eq!(link.config().reset_settle, DEFAULT_RESET_SETTLE);
    }

    #[test]
    fn ready_is_active_low() {
        let log = Log::default();
        assert!(link(&log, false).read_ready().unwrap());
        assert!(!link(&log, true).read_ready().unwrap());
    }

    #[test]
    fn exchange_returns_clocked_in_byte() {
        let log = Log::default();
        let mut link = link(&log, true);
        assert_eq!(link.exchange(0x0F).unwrap(), 0xF0);
        assert_eq!(*log.borrow(), vec!["spi 0x0f"]);
    }

    #[test]
    fn reset_pulses_line_then_settles() {
        let log = Log::default();
        let mut link = link(&log, true);
        link.reset().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "reset high",
                "reset low",
                "reset high",
                "reqn high",
                "delay 30ms"
            ]
        );
    }
}
