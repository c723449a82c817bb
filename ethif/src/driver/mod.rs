/// Driver contract — the fixed set of operations every Ethernet driver
/// variant implements identically, so the stack above stays driver-agnostic.
///
/// Lifecycle: Uninitialized → init(mac) → Initialized → deinit() →
/// Uninitialized. `deinit` is always safe, including without a prior init.
/// All operations are invoked from a single cooperative context and must
/// never block; `proc_input` and `poll` absorb internal errors rather than
/// propagate them.
mod frame;
mod mac;
mod ram_nic;
mod unsupported;

pub use frame::Frame;
pub use mac::MacAddr;
pub use ram_nic::RamNic;
pub use unsupported::UnsupportedDriver;


/// Maximum Ethernet payload the drivers in this crate advertise.
pub const MTU: usize = 1500;

/// Maximum frame length on the wire: MTU + 14-byte Ethernet header.
pub const MAX_FRAME_LEN: usize = MTU + 14;

/// Errors surfaced by driver operations.
///
/// The taxonomy is deliberately binary: "not available" (no hardware,
/// unsupported build, not initialized) versus a transient hardware
/// condition. Callers treat both as non-fatal; retry policy is theirs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// No hardware present or no real driver compiled in.
    Unsupported,
    /// The driver has not been brought up with a successful `init`.
    NotInitialized,
    /// The PHY reports no usable link.
    LinkDown,
    /// The transmit queue is full; the frame was not consumed.
    QueueFull,
    /// The hardware MAC filter table has no free slot.
    FilterTableFull,
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::Unsupported => write!(f, "interface unsupported"),
            DriverError::NotInitialized => write!(f, "driver not initialized"),
            DriverError::LinkDown => write!(f, "link down"),
            DriverError::QueueFull => write!(f, "transmit queue full"),
            DriverError::FilterTableFull => write!(f, "MAC filter table full"),
        }
    }
}

/// Live-reported link parameters. Not stored by the contract itself;
/// drivers that track a link keep one of these internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkState {
    /// Negotiated speed in Mbps.
    pub speed_mbps: u32,
    pub full_duplex: bool,
    /// Whether the PHY detected a crossover (MDI-X) cabling arrangement.
    pub crossover: bool,
}

impl LinkState {
    /// 100 Mbps full duplex, the default a simulated link negotiates to.
    pub const FAST_FULL: LinkState = LinkState {
        speed_mbps: 100,
        full_duplex: true,
        crossover: false,
    };
}

bitflags::bitflags! {
    /// Optional capabilities a driver variant may advertise.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DriverCaps: u8 {
        /// Destination-MAC filter table in hardware.
        const MAC_FILTER = 1 << 0;
        /// The bus to the MAC requires a chip-select pin.
        const CHIP_SELECT = 1 << 1;
        /// The MAC can be put in promiscuous mode.
        const PROMISCUOUS = 1 << 2;
    }
}

/// Stack-facing seam of the network-interface record.
///
/// `proc_input` delivers each fully-formed received frame here exactly
/// once; the sink consumes it before the call returns. There is no
/// deferred or async delivery.
pub trait FrameSink {
    /// Accept one complete Ethernet frame. The slice is only valid for
    /// the duration of the call.
    fn input(&mut self, frame: &[u8]);
}

impl<F: FnMut(&[u8])> FrameSink for F {
    fn input(&mut self, frame: &[u8]) {
        self(frame)
    }
}

/// The driver contract.
///
/// Every variant — real hardware or the no-hardware fallback — implements
/// these operations with identical semantics. Unsupported operations
/// return the neutral value (`false`/`0`/`None`/`Err(Unsupported)`)
/// rather than a distinct fault; distinguishing "no hardware" from
/// "hardware fault" is a higher layer's concern.
pub trait EthernetDriver {
    /// Whether the MAC/PHY hardware is present. Pure query, no side
    /// effects; checked before attempting `init`.
    fn has_hardware(&self) -> bool;

    /// True only for the no-hardware/no-support fallback variant. Lets
    /// upper layers distinguish "no driver compiled" from "driver
    /// present but down". Never true when `has_hardware()` is true.
    fn is_unknown(&self) -> bool {
        false
    }

    /// The hardware-assigned or deterministic system default address, or
    /// `None` when the variant has no such address (the caller's default
    /// applies).
    fn system_mac(&self) -> Option<MacAddr>;

    /// Store a MAC override. It takes precedence over the address passed
    /// to every subsequent `init` until changed by another `set_mac`; it
    /// does not affect an already-initialized driver. Callers wanting a
    /// guaranteed effect set it before `init`.
    fn set_mac(&mut self, mac: MacAddr);

    /// Store the chip-select pin consulted during `init`. Ignored by
    /// variants without a selectable bus.
    fn set_chip_select_pin(&mut self, pin: u32);

    /// Bring the interface up with the given (already resolved) address.
    /// Failure means the caller must not proceed to the data path.
    /// Calling `init` while initialized re-initializes; it never corrupts
    /// prior state irrecoverably.
    fn init(&mut self, mac: MacAddr) -> Result<(), DriverError>;

    /// Tear the interface down. Always safe: without a prior `init` or
    /// called repeatedly it is a no-op.
    fn deinit(&mut self);

    /// Drain all frames currently available from the hardware, handing
    /// each one to `sink` exactly once. Non-blocking; called every cycle
    /// of the main processing loop. Internal errors are absorbed and at
    /// most reflected in the link-state queries.
    fn proc_input(&mut self, sink: &mut dyn FrameSink);

    /// Periodic housekeeping independent of frame arrival (link
    /// re-negotiation checks, watchdog). Non-blocking.
    fn poll(&mut self);

    /// Transmit one possibly-chained frame. On success the frame is
    /// fully consumed; on failure driver state remains consistent for a
    /// retry with the same frame.
    fn output(&mut self, frame: Frame<'_>) -> Result<(), DriverError>;

    /// Raw flat-buffer transmit path bypassing normal frame chaining,
    /// for diagnostic or bootstrap use.
    fn output_frame(&mut self, frame: &[u8]) -> Result<(), DriverError>;

    /// Negotiated link speed in Mbps; 0 when down or unknown.
    fn link_speed(&self) -> u32;

    /// False when down or unknown.
    fn link_is_full_duplex(&self) -> bool;

    /// False when down or unknown.
    fn link_is_crossover(&self) -> bool;

    /// Allow or deny reception of frames addressed to `mac`. Fails with
    /// `Unsupported` on variants without a filter table and with
    /// `FilterTableFull` when no slot is free for a new entry.
    #[cfg(feature = "mac-filter")]
    fn set_mac_address_allowed(&mut self, mac: MacAddr, allow: bool) -> Result<(), DriverError>;

    /// Optional capabilities of this variant.
    fn capabilities(&self) -> DriverCaps {
        DriverCaps::empty()
    }

    /// Maximum payload this driver can move in one frame.
    fn mtu(&self) -> usize {
        MTU
    }
}
