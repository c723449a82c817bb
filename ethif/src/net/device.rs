/// smoltcp PHY adapter over the driver contract.
///
/// smoltcp pulls frames through `Device::receive`, while drivers push
/// them through `proc_input`. The adapter reconciles the two: each
/// `receive` drains the driver into a queue and yields one frame per
/// token. The driver is owned, injected state — not a hidden global — so
/// several adapters over simulated drivers can coexist in tests.
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use smoltcp::phy::{self, Device, DeviceCapabilities, Medium};
use smoltcp::time::Instant;

use crate::driver::{EthernetDriver, Frame, MAX_FRAME_LEN};

pub struct PhyDevice<D: EthernetDriver> {
    driver: D,
    rx_queue: VecDeque<Vec<u8>>,
}

impl<D: EthernetDriver> PhyDevice<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            rx_queue: VecDeque::new(),
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// One housekeeping pass: driver watchdog plus an input drain, so
    /// frames arriving between polls are staged for the next `receive`.
    pub fn service(&mut self) {
        self.driver.poll();
        self.drain_driver();
    }

    fn drain_driver(&mut self) {
        let Self { driver, rx_queue } = self;
        let mut sink = |frame: &[u8]| rx_queue.push_back(frame.to_vec());
        driver.proc_input(&mut sink);
    }
}

impl<D: EthernetDriver> Device for PhyDevice<D> {
    type RxToken<'a>
        = RxToken
    where
        Self: 'a;
    type TxToken<'a>
        = TxToken<'a, D>
    where
        Self: 'a;

    fn receive(&mut self, _timestamp: Instant) -> Option<(Self::RxToken<'_>, Self::TxToken<'_>)> {
        if self.rx_queue.is_empty() {
            self.drain_driver();
        }
        let frame = self.rx_queue.pop_front()?;
        Some((
            RxToken { frame },
            TxToken {
                driver: &mut self.driver,
            },
        ))
    }

    fn transmit(&mut self, _timestamp: Instant) -> Option<Self::TxToken<'_>> {
        // Always ready; a full transmit queue is the driver's problem.
        Some(TxToken {
            driver: &mut self.driver,
        })
    }

    fn capabilities(&self) -> DeviceCapabilities {
        let mut caps = DeviceCapabilities::default();
        caps.medium = Medium::Ethernet;
        caps.max_transmission_unit = MAX_FRAME_LEN.min(self.driver.mtu() + 14);
        caps.max_burst_size = Some(1);
        caps
    }
}

/// Receive token — holds one received Ethernet frame.
pub struct RxToken {
    frame: Vec<u8>,
}

impl phy::RxToken for RxToken {
    fn consume<R, F>(mut self, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        f(&mut self.frame)
    }
}

/// Transmit token — provides a buffer to write an outgoing frame.
pub struct TxToken<'a, D: EthernetDriver> {
    driver: &'a mut D,
}

impl<'a, D: EthernetDriver> phy::TxToken for TxToken<'a, D> {
    fn consume<R, F>(self, len: usize, f: F) -> R
    where
        F: FnOnce(&mut [u8]) -> R,
    {
        let mut buf = alloc::vec![0u8; len];
        let result = f(&mut buf);

        // Transmit errors are absorbed here; smoltcp retransmits at the
        // protocol level and the caller sees link state via queries.
        let _ = self.driver.output(Frame::new(&[&buf]));

        result
    }
}
