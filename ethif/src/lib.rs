#![no_std]

extern crate alloc;

/// Ethernet driver layer — the contract between NIC drivers and the
/// TCP/IP stack above them.
///
/// Architecture:
///   EthernetDriver implementors (hardware, RamNic, UnsupportedDriver)
///       ↓ ↑
///   PhyDevice (implements smoltcp::phy::Device)
///       ↓ ↑
///   smoltcp Interface (ARP, IP, TCP)
///       ↓ ↑
///   NetStack (sockets, used by application code)
pub mod driver;
pub mod entropy;
pub mod net;

pub use driver::{
    DriverCaps, DriverError, EthernetDriver, Frame, FrameSink, LinkState, MacAddr, RamNic,
    UnsupportedDriver,
};
pub use net::NetStack;
