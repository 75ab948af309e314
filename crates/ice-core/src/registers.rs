//! Capability register access.
//!
//! Offsets belong to the device driver; this crate only sees the decoded
//! values through [`CapabilityRegisters`]. [`RegisterSnapshot`] decodes raw
//! words captured in the host controller interface layout.

use crate::capability::{CryptoAlgorithm, CryptoCapability, DataUnitSizes, KeySize};

/// Host controller interface versions with a known crypto register layout.
pub const SUPPORTED_VERSIONS: [u32; 5] = [0x0210, 0x0300, 0x0310, 0x0400, 0x0410];

const CCAP_CC_MASK: u32 = 0xff;
const CCAP_CFGC_SHIFT: u32 = 8;
const CCAP_CFGPTR_SHIFT: u32 = 24;

const CAP_ALG_MASK: u32 = 0xff;
const CAP_SDUS_SHIFT: u32 = 8;
const CAP_KEY_SIZE_SHIFT: u32 = 16;

/// Read-only query interface over the controller's crypto capability registers.
pub trait CapabilityRegisters {
    /// Interface version, `major << 8 | minor << 4 | suffix`.
    fn version(&self) -> u32;
    fn key_slot_count(&self) -> u32;
    fn capability_count(&self) -> u8;
    /// Raw capability word for entry `index`.
    fn capability(&self, index: u8) -> u32;
}

/// Version check ignoring the suffix nibble.
pub fn is_supported_version(version: u32) -> bool {
    SUPPORTED_VERSIONS.contains(&(version & 0xfff0))
}

/// Decodes one capability word. Unknown algorithms or key sizes yield `None`.
pub fn decode_capability(word: u32) -> Option<CryptoCapability> {
    let algorithm = CryptoAlgorithm::from_id((word & CAP_ALG_MASK) as u8)?;
    let key_size = KeySize::from_code(((word >> CAP_KEY_SIZE_SHIFT) & 0xff) as u8)?;
    let data_unit_sizes = DataUnitSizes::from_bits_retain(((word >> CAP_SDUS_SHIFT) & 0xff) as u8);
    Some(CryptoCapability {
        algorithm,
        key_size,
        data_unit_sizes,
    })
}

/// Encodes a capability word; the inverse of [`decode_capability`].
pub fn encode_capability(cap: &CryptoCapability) -> u32 {
    u32::from(cap.algorithm.id())
        | (u32::from(cap.data_unit_sizes.bits()) << CAP_SDUS_SHIFT)
        | (u32::from(cap.key_size.code()) << CAP_KEY_SIZE_SHIFT)
}

/// Raw register words captured from a controller.
#[derive(Debug, Clone, Default)]
pub struct RegisterSnapshot {
    pub version: u32,
    pub ccap: u32,
    pub capabilities: Vec<u32>,
}

impl RegisterSnapshot {
    /// Offset of the key-slot configuration array, in 0x100-byte units.
    pub fn config_array_pointer(&self) -> u8 {
        (self.ccap >> CCAP_CFGPTR_SHIFT) as u8
    }
}

impl CapabilityRegisters for RegisterSnapshot {
    fn version(&self) -> u32 {
        self.version
    }

    /// CFGC is zero-based.
    fn key_slot_count(&self) -> u32 {
        ((self.ccap >> CCAP_CFGC_SHIFT) & 0xff) + 1
    }

    fn capability_count(&self) -> u8 {
        (self.ccap & CCAP_CC_MASK) as u8
    }

    fn capability(&self, index: u8) -> u32 {
        self.capabilities.get(usize::from(index)).copied().unwrap_or(0)
    }
}
