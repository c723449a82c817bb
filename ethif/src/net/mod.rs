/// Stack glue — bridges any `EthernetDriver` to TCP/IP via smoltcp.
///
/// Architecture:
///   EthernetDriver (raw Ethernet frames)
///       ↓ ↑
///   PhyDevice (implements smoltcp::phy::Device)
///       ↓ ↑
///   smoltcp Interface (ARP, IP, TCP)
///       ↓ ↑
///   TCP sockets (application code)
pub mod device;
pub mod stack;

pub use device::PhyDevice;
pub use stack::{IfaceConfig, NetStack};
