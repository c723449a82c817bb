/// RAM-backed simulated NIC.
///
/// Implements the full driver contract entirely in memory: injected
/// frames come back out of `proc_input`, transmitted frames land in a
/// bounded log. Used to exercise the contract's positive paths and as
/// the device under the stack glue in tests, without hardware.
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use super::{DriverCaps, DriverError, EthernetDriver, Frame, FrameSink, LinkState, MacAddr};

/// Frames the transmit log holds before `output` reports `QueueFull`.
const TX_DEPTH: usize = 32;

/// Filter table slots, sized like the small per-address tables real MACs
/// carry.
#[cfg(feature = "mac-filter")]
const FILTER_SLOTS: usize = 4;

pub struct RamNic {
    system_mac: MacAddr,
    mac_override: Option<MacAddr>,
    /// Address the interface is actually using; `Some` iff initialized.
    active_mac: Option<MacAddr>,
    cs_pin: Option<u32>,
    link: Option<LinkState>,
    rx_queue: VecDeque<Vec<u8>>,
    tx_log: Vec<Vec<u8>>,
    #[cfg(feature = "mac-filter")]
    filter: Vec<(MacAddr, bool)>,
    promiscuous: bool,
    poll_count: u64,
}

impl RamNic {
    /// Create an uninitialized NIC whose "burned-in" address is
    /// `system_mac`.
    pub fn new(system_mac: MacAddr) -> Self {
        Self {
            system_mac,
            mac_override: None,
            active_mac: None,
            cs_pin: None,
            link: None,
            rx_queue: VecDeque::new(),
            tx_log: Vec::new(),
            #[cfg(feature = "mac-filter")]
            filter: Vec::new(),
            promiscuous: false,
            poll_count: 0,
        }
    }

    /// Address the interface is using, once initialized.
    pub fn mac(&self) -> Option<MacAddr> {
        self.active_mac
    }

    pub fn chip_select_pin(&self) -> Option<u32> {
        self.cs_pin
    }

    /// Queue a frame as if it had arrived from the wire. Held until the
    /// next `proc_input` on an initialized driver.
    pub fn inject_rx(&mut self, frame: &[u8]) {
        self.rx_queue.push_back(frame.to_vec());
    }

    /// Drain and return everything transmitted so far.
    pub fn take_transmitted(&mut self) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.tx_log)
    }

    pub fn transmitted(&self) -> &[Vec<u8>] {
        &self.tx_log
    }

    /// Force the link parameters; `None` simulates a cable pull.
    pub fn set_link(&mut self, link: Option<LinkState>) {
        self.link = link;
    }

    pub fn set_promiscuous(&mut self, on: bool) {
        self.promiscuous = on;
    }

    /// How many times `poll` ran (for testing).
    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    fn push_tx(&mut self, frame: Vec<u8>) -> Result<(), DriverError> {
        if self.active_mac.is_none() {
            return Err(DriverError::NotInitialized);
        }
        if self.tx_log.len() >= TX_DEPTH {
            return Err(DriverError::QueueFull);
        }
        self.tx_log.push(frame);
        Ok(())
    }

    /// Destination-address acceptance decision for a received frame.
    fn accepts(&self, frame: &[u8]) -> bool {
        if self.promiscuous {
            return true;
        }
        let dest = match MacAddr::from_slice(&frame[..MacAddr::LEN.min(frame.len())]) {
            Some(dest) => dest,
            None => return false, // runt frame, no full destination
        };

        // An explicit filter entry overrides the defaults, including a
        // deny entry for our own address.
        #[cfg(feature = "mac-filter")]
        if let Some(&(_, allow)) = self.filter.iter().find(|(mac, _)| *mac == dest) {
            return allow;
        }

        dest.is_multicast() || Some(dest) == self.active_mac
    }
}

impl EthernetDriver for RamNic {
    fn has_hardware(&self) -> bool {
        true
    }

    fn system_mac(&self) -> Option<MacAddr> {
        Some(self.system_mac)
    }

    fn set_mac(&mut self, mac: MacAddr) {
        self.mac_override = Some(mac);
    }

    fn set_chip_select_pin(&mut self, pin: u32) {
        self.cs_pin = Some(pin);
    }

    /// Bring the NIC up. A stored `set_mac` override takes precedence
    /// over `mac`. Re-init on an initialized NIC resets the queues and
    /// renegotiates the link.
    fn init(&mut self, mac: MacAddr) -> Result<(), DriverError> {
        self.active_mac = Some(self.mac_override.unwrap_or(mac));
        self.tx_log.clear();
        self.link = Some(LinkState::FAST_FULL);
        Ok(())
    }

    fn deinit(&mut self) {
        self.active_mac = None;
        self.link = None;
        self.rx_queue.clear();
        self.tx_log.clear();
    }

    fn proc_input(&mut self, sink: &mut dyn FrameSink) {
        if self.active_mac.is_none() {
            // Injected frames stay queued until the NIC is brought up.
            return;
        }
        while let Some(frame) = self.rx_queue.pop_front() {
            if self.accepts(&frame) {
                sink.input(&frame);
            }
        }
    }

    fn poll(&mut self) {
        self.poll_count += 1;
    }

    fn output(&mut self, frame: Frame<'_>) -> Result<(), DriverError> {
        if self.active_mac.is_none() {
            return Err(DriverError::NotInitialized);
        }
        if self.link.is_none() {
            return Err(DriverError::LinkDown);
        }
        self.push_tx(frame.concat())
    }

    fn output_frame(&mut self, frame: &[u8]) -> Result<(), DriverError> {
        // Raw bootstrap path: initialized is enough, no link required.
        self.push_tx(frame.to_vec())
    }

    fn link_speed(&self) -> u32 {
        self.link.map_or(0, |l| l.speed_mbps)
    }

    fn link_is_full_duplex(&self) -> bool {
        self.link.map_or(false, |l| l.full_duplex)
    }

    fn link_is_crossover(&self) -> bool {
        self.link.map_or(false, |l| l.crossover)
    }

    #[cfg(feature = "mac-filter")]
    fn set_mac_address_allowed(&mut self, mac: MacAddr, allow: bool) -> Result<(), DriverError> {
        if let Some(entry) = self.filter.iter_mut().find(|(m, _)| *m == mac) {
            entry.1 = allow;
            return Ok(());
        }
        if self.filter.len() >= FILTER_SLOTS {
            return Err(DriverError::FilterTableFull);
        }
        self.filter.push((mac, allow));
        Ok(())
    }

    fn capabilities(&self) -> DriverCaps {
        #[allow(unused_mut)]
        let mut caps = DriverCaps::PROMISCUOUS;
        #[cfg(feature = "mac-filter")]
        {
            caps |= DriverCaps::MAC_FILTER;
        }
        caps
    }
}
