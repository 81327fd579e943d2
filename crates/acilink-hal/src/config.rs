use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Time the radio's lines float after a reset pulse.
pub const DEFAULT_RESET_SETTLE: Duration = Duration::from_millis(30);

/// SPI clock divider relative to the host core clock.
///
/// The divider is opaque to the protocol; drivers use it to configure the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiClockDivider {
    Div2,
    Div4,
    #[default]
    Div8,
    Div16,
    Div32,
    Div64,
    Div128,
}

impl SpiClockDivider {
    /// Numeric divisor.
    pub fn divisor(self) -> u32 {
        match self {
            SpiClockDivider::Div2 => 2,
            SpiClockDivider::Div4 => 4,
            SpiClockDivider::Div8 => 8,
            SpiClockDivider::Div16 => 16,
            SpiClockDivider::Div32 => 32,
            SpiClockDivider::Div64 => 64,
            SpiClockDivider::Div128 => 128,
        }
    }

    /// Bus clock for a given core clock.
    pub fn bus_frequency(self, core_hz: u32) -> u32 {
        core_hz / self.divisor()
    }
}

/// How the READY line is wired to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceMode {
    /// RDYN falling edge raises an interrupt that drives the transport.
    #[default]
    Interrupt,
    /// The application polls the transport.
    Polling,
}

/// Link configuration shared by drivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// SPI clock divider.
    pub spi_clock_divider: SpiClockDivider,
    /// Driver context for READY handling.
    pub interface: InterfaceMode,
    /// Wait after the reset pulse before the link is usable.
    pub reset_settle: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            spi_clock_divider: SpiClockDivider::default(),
            interface: InterfaceMode::default(),
            reset_settle: DEFAULT_RESET_SETTLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divider_scales_core_clock() {
        assert_eq!(SpiClockDivider::Div8.bus_frequency(16_000_000), 2_000_000);
        assert_eq!(SpiClockDivider::Div128.divisor(), 128);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: LinkConfig = serde_json::from_str(r#"{"interface":"polling"}"#).unwrap();
        assert_eq!(cfg.interface, InterfaceMode::Polling);
        assert_eq!(cfg.spi_clock_divider, SpiClockDivider::Div8);
        assert_eq!(cfg.reset_settle, DEFAULT_RESET_SETTLE);
    }
}
