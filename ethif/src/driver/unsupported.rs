/// Unsupported/null driver — the variant used when no hardware driver is
/// compiled in.
///
/// Every operation is a safe no-op returning its neutral value, so the
/// stack above can run unmodified (and immediately learn via `init` that
/// there is nothing underneath).
use super::{DriverError, EthernetDriver, Frame, FrameSink, MacAddr};

#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedDriver;

impl UnsupportedDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl EthernetDriver for UnsupportedDriver {
    fn has_hardware(&self) -> bool {
        false
    }

    fn is_unknown(&self) -> bool {
        true
    }

    fn system_mac(&self) -> Option<MacAddr> {
        None
    }

    fn set_mac(&mut self, _mac: MacAddr) {}

    fn set_chip_select_pin(&mut self, _pin: u32) {}

    fn init(&mut self, _mac: MacAddr) -> Result<(), DriverError> {
        Err(DriverError::Unsupported)
    }

    fn deinit(&mut self) {}

    fn proc_input(&mut self, _sink: &mut dyn FrameSink) {}

    fn poll(&mut self) {}

    fn output(&mut self, _frame: Frame<'_>) -> Result<(), DriverError> {
        Err(DriverError::Unsupported)
    }

    fn output_frame(&mut self, _frame: &[u8]) -> Result<(), DriverError> {
        Err(DriverError::Unsupported)
    }

    fn link_speed(&self) -> u32 {
        0
    }

    fn link_is_full_duplex(&self) -> bool {
        false
    }

    fn link_is_crossover(&self) -> bool {
        false
    }

    #[cfg(feature = "mac-filter")]
    fn set_mac_address_allowed(&mut self, _mac: MacAddr, _allow: bool) -> Result<(), DriverError> {
        Err(DriverError::Unsupported)
    }
}
