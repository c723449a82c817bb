/// Entropy source for upper protocol layers (nonces, ephemeral ports).
///
/// One `u32` per call. The backend is chosen at build time: with the
/// `entropy-rdrand` feature on x86_64 the hardware RDRAND instruction is
/// used, falling back to a non-cryptographic splitmix64 generator when
/// the instruction does not return a value (or on other targets). The
/// global device is initialized lazily at first use.
///
/// Not part of the driver contract, and deliberately not a CSPRNG in its
/// fallback configuration.
use spin::{Mutex, Once};

/// splitmix64 increment (golden-ratio constant); doubles as the default
/// seed of the fallback generator.
const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Pseudo-random device producing one unsigned integer per invocation.
pub struct RandomDevice {
    state: u64,
}

impl RandomDevice {
    pub const fn with_seed(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Restart the fallback sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.state = seed;
    }

    /// Produce the next random value.
    pub fn next(&mut self) -> u32 {
        #[cfg(all(feature = "entropy-rdrand", target_arch = "x86_64"))]
        if let Some(val) = rdrand64() {
            return val as u32;
        }
        self.next_u64_fallback() as u32
    }

    /// splitmix64 step — the non-cryptographic default generator.
    fn next_u64_fallback(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_u64_any(&mut self) -> u64 {
        #[cfg(all(feature = "entropy-rdrand", target_arch = "x86_64"))]
        if let Some(val) = rdrand64() {
            return val;
        }
        self.next_u64_fallback()
    }
}

impl rand_core::RngCore for RandomDevice {
    fn next_u32(&mut self) -> u32 {
        self.next()
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_any()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let bytes = self.next_u64_any().to_le_bytes();
            let copy_len = (dest.len() - offset).min(8);
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Read a 64-bit random value via RDRAND.
/// Retries up to 32 times (Intel recommends 10).
#[cfg(all(feature = "entropy-rdrand", target_arch = "x86_64"))]
fn rdrand64() -> Option<u64> {
    for _ in 0..32 {
        let val: u64;
        let ok: u8;
        unsafe {
            core::arch::asm!(
                "rdrand {val}",
                "setc {ok}",
                val = out(reg) val,
                ok = out(reg_byte) ok,
                options(nostack, nomem),
            );
        }
        if ok != 0 {
            return Some(val);
        }
    }
    None
}

static RANDOM_DEVICE: Once<Mutex<RandomDevice>> = Once::new();

/// The process-wide random device, created on first use.
pub fn random_device() -> &'static Mutex<RandomDevice> {
    RANDOM_DEVICE.call_once(|| Mutex::new(RandomDevice::with_seed(SPLITMIX_GAMMA)))
}
