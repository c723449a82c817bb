/// 6-octet Ethernet hardware address.
use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr([u8; 6]);

static_assertions::const_assert_eq!(core::mem::size_of::<MacAddr>(), MacAddr::LEN);

impl MacAddr {
    pub const LEN: usize = 6;

    pub const BROADCAST: MacAddr = MacAddr([0xFF; 6]);

    /// Locally administered fallback used when neither a caller override
    /// nor a system address is available.
    pub const LOCAL_DEFAULT: MacAddr = MacAddr([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);

    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Parse from a byte slice; `None` unless it is exactly 6 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = bytes.try_into().ok()?;
        Some(Self(octets))
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    pub fn is_broadcast(&self) -> bool {
        self.0 == [0xFF; 6]
    }

    /// Group bit (LSB of the first octet) set. Broadcast counts.
    pub fn is_multicast(&self) -> bool {
        (self.0[0] & 0x01) != 0
    }

    pub fn is_unicast(&self) -> bool {
        !self.is_multicast()
    }

    /// Locally-administered bit set (not globally unique).
    pub fn is_local_admin(&self) -> bool {
        (self.0[0] & 0x02) != 0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn predicates() {
        let mac = MacAddr::new([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert!(mac.is_unicast());
        assert!(!mac.is_multicast());
        assert!(!mac.is_broadcast());
        assert!(!mac.is_local_admin());

        assert!(MacAddr::BROADCAST.is_broadcast());
        assert!(MacAddr::BROADCAST.is_multicast());

        let mcast = MacAddr::new([0x01, 0x00, 0x5E, 0x00, 0x00, 0x01]);
        assert!(mcast.is_multicast());
        assert!(!mcast.is_broadcast());

        assert!(MacAddr::LOCAL_DEFAULT.is_local_admin());
        assert!(MacAddr::LOCAL_DEFAULT.is_unicast());
        assert!(MacAddr::new([0; 6]).is_zero());
    }

    #[test]
    fn from_slice_requires_six_bytes() {
        let bytes = [0x02, 0x00, 0x00, 0x00, 0x00, 0x01];
        assert_eq!(MacAddr::from_slice(&bytes), Some(MacAddr::LOCAL_DEFAULT));
        assert_eq!(MacAddr::from_slice(&bytes[..5]), None);
        assert_eq!(MacAddr::from_slice(&[0; 7]), None);
    }

    #[test]
    fn display_lower_hex() {
        let mac = MacAddr::new([0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x0A]);
        assert_eq!(mac.to_string(), "de:ad:be:ef:00:0a");
    }
}
