/// TCP/IP stack wrapper built on smoltcp.
///
/// Owns the driver (through `PhyDevice`), the interface and the socket
/// set, and runs the cooperative processing loop: every `poll` services
/// the driver (housekeeping + input drain) and advances the protocol
/// state machines. Time comes from the caller, so the crate stays free
/// of platform clocks.
use alloc::vec;

use smoltcp::iface::{Config, Interface, SocketHandle, SocketSet};
use smoltcp::socket::tcp::{self, Socket as TcpSocket};
use smoltcp::time::Instant;
use smoltcp::wire::{EthernetAddress, IpAddress, IpCidr, Ipv4Address, Ipv4Cidr};

use super::device::PhyDevice;
use crate::driver::{DriverError, EthernetDriver, MacAddr};
use crate::entropy;

/// Static IPv4 configuration for one interface.
#[derive(Debug, Clone, Copy)]
pub struct IfaceConfig {
    pub addr: Ipv4Cidr,
    pub gateway: Option<Ipv4Address>,
}

impl IfaceConfig {
    pub fn new(addr: Ipv4Address, prefix_len: u8) -> Self {
        Self {
            addr: Ipv4Cidr::new(addr, prefix_len),
            gateway: None,
        }
    }

    pub fn with_gateway(mut self, gateway: Ipv4Address) -> Self {
        self.gateway = Some(gateway);
        self
    }
}

/// Network stack state over one driver.
pub struct NetStack<D: EthernetDriver> {
    device: PhyDevice<D>,
    iface: Interface,
    sockets: SocketSet<'static>,
}

impl<D: EthernetDriver> core::fmt::Debug for NetStack<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NetStack").finish_non_exhaustive()
    }
}

impl<D: EthernetDriver> NetStack<D> {
    /// Bring the interface up: resolve the MAC (caller override, else the
    /// driver's system address, else a locally administered default),
    /// initialize the driver, and attach it to a fresh interface.
    ///
    /// Fails when the driver cannot be brought up — in particular for the
    /// unsupported variant, which always refuses `init`.
    pub fn bring_up(
        mut driver: D,
        mac_override: Option<MacAddr>,
        config: IfaceConfig,
        now: Instant,
    ) -> Result<Self, DriverError> {
        if let Some(mac) = mac_override {
            driver.set_mac(mac);
        }
        let mac = mac_override
            .or_else(|| driver.system_mac())
            .unwrap_or(MacAddr::LOCAL_DEFAULT);
        driver.init(mac)?;

        let mut device = PhyDevice::new(driver);
        let iface_config = Config::new(EthernetAddress(mac.octets()).into());
        let mut iface = Interface::new(iface_config, &mut device, now);

        iface.update_ip_addrs(|addrs| {
            addrs.push(IpCidr::Ipv4(config.addr)).ok();
        });
        if let Some(gateway) = config.gateway {
            iface.routes_mut().add_default_ipv4_route(gateway).ok();
        }

        let sockets = SocketSet::new(vec![]);

        Ok(Self {
            device,
            iface,
            sockets,
        })
    }

    pub fn driver(&self) -> &D {
        self.device.driver()
    }

    pub fn driver_mut(&mut self) -> &mut D {
        self.device.driver_mut()
    }

    /// Tear the stack down and hand the (deinitialized) driver back.
    pub fn shut_down(self) -> D {
        let mut driver = self.device.into_driver();
        driver.deinit();
        driver
    }

    /// One cooperative cycle: driver housekeeping and input drain, then
    /// protocol processing. Must be called regularly; never blocks.
    pub fn poll(&mut self, now: Instant) {
        self.device.service();
        self.iface.poll(now, &mut self.device, &mut self.sockets);
    }

    /// Open a TCP connection to the given IP and port.
    /// Returns a socket handle for reading/writing.
    pub fn tcp_connect(
        &mut self,
        remote_ip: Ipv4Address,
        remote_port: u16,
    ) -> Option<SocketHandle> {
        let rx_buf = tcp::SocketBuffer::new(vec![0u8; 65536]);
        let tx_buf = tcp::SocketBuffer::new(vec![0u8; 65536]);
        let socket = TcpSocket::new(rx_buf, tx_buf);

        let handle = self.sockets.add(socket);

        // Random ephemeral local port
        let local_port = 49152 + (entropy::random_device().lock().next() % 16384) as u16;

        let socket = self.sockets.get_mut::<TcpSocket>(handle);
        socket
            .connect(
                self.iface.context(),
                (IpAddress::Ipv4(remote_ip), remote_port),
                local_port,
            )
            .ok()?;

        Some(handle)
    }

    /// Write data to a TCP socket. Returns the number of bytes queued.
    pub fn tcp_send(&mut self, handle: SocketHandle, data: &[u8]) -> usize {
        let socket = self.sockets.get_mut::<TcpSocket>(handle);
        socket.send_slice(data).unwrap_or(0)
    }

    /// Read data from a TCP socket. Returns the number of bytes read.
    pub fn tcp_recv(&mut self, handle: SocketHandle, buf: &mut [u8]) -> usize {
        let socket = self.sockets.get_mut::<TcpSocket>(handle);
        socket.recv_slice(buf).unwrap_or(0)
    }

    pub fn tcp_is_active(&mut self, handle: SocketHandle) -> bool {
        self.sockets.get_mut::<TcpSocket>(handle).is_active()
    }

    pub fn tcp_can_send(&mut self, handle: SocketHandle) -> bool {
        self.sockets.get_mut::<TcpSocket>(handle).can_send()
    }

    pub fn tcp_can_recv(&mut self, handle: SocketHandle) -> bool {
        self.sockets.get_mut::<TcpSocket>(handle).can_recv()
    }

    pub fn tcp_close(&mut self, handle: SocketHandle) {
        self.sockets.get_mut::<TcpSocket>(handle).close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{RamNic, UnsupportedDriver};

    const MAC: MacAddr = MacAddr::new([0x02, 0, 0, 0, 0, 0x30]);

    fn config() -> IfaceConfig {
        IfaceConfig::new(Ipv4Address::new(10, 0, 2, 15), 24)
            .with_gateway(Ipv4Address::new(10, 0, 2, 2))
    }

    fn now() -> Instant {
        Instant::from_millis(0)
    }

    #[test]
    fn bring_up_over_ram_nic() {
        let nic = RamNic::new(MAC);
        let mut stack = NetStack::bring_up(nic, None, config(), now()).unwrap();

        assert_eq!(stack.driver().mac(), Some(MAC));
        assert_eq!(stack.driver().link_speed(), 100);

        // A few cycles of the cooperative loop must be side-effect safe.
        for ms in 0..5 {
            stack.poll(Instant::from_millis(ms));
        }
    }

    #[test]
    fn bring_up_respects_mac_override() {
        let nic = RamNic::new(MAC);
        let override_mac = MacAddr::new([0x02, 0, 0, 0, 0, 0x31]);
        let stack = NetStack::bring_up(nic, Some(override_mac), config(), now()).unwrap();
        assert_eq!(stack.driver().mac(), Some(override_mac));
    }

    #[test]
    fn bring_up_fails_on_unsupported() {
        let err = NetStack::bring_up(UnsupportedDriver::new(), None, config(), now()).unwrap_err();
        assert_eq!(err, DriverError::Unsupported);
    }

    #[test]
    fn shut_down_returns_deinitialized_driver() {
        let stack = NetStack::bring_up(RamNic::new(MAC), None, config(), now()).unwrap();
        let nic = stack.shut_down();
        assert_eq!(nic.mac(), None);
        assert_eq!(nic.link_speed(), 0);
    }

    #[test]
    fn tcp_connect_creates_socket() {
        let mut stack = NetStack::bring_up(RamNic::new(MAC), None, config(), now()).unwrap();
        let handle = stack
            .tcp_connect(Ipv4Address::new(10, 0, 2, 2), 80)
            .expect("connect starts");

        // SYN not answered by anyone, but the socket exists and is in an
        // opening state.
        assert!(stack.tcp_is_active(handle));
        assert!(!stack.tcp_can_recv(handle));

        stack.poll(Instant::from_millis(1));
        // The SYN went out through the simulated NIC.
        assert!(!stack.driver_mut().take_transmitted().is_empty());

        stack.tcp_close(handle);
    }
}
