//! # ice-core: Crypto Capability Table
//!
//! What the controller can encrypt: one entry per supported
//! (algorithm, key size) pair with its data-unit-size granularity, plus the
//! number of key slots. Built once at attach and shared read-only.

use bitflags::bitflags;

/// Bytes of DUN the controller consumes (`dunl` + `dunu`).
pub const MAX_DUN_BYTES: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptoAlgorithm {
    AesXts,
    BitlockerAesCbc,
    AesEcb,
    EssivAesCbc,
}

impl CryptoAlgorithm {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::AesXts),
            1 => Some(Self::BitlockerAesCbc),
            2 => Some(Self::AesEcb),
            3 => Some(Self::EssivAesCbc),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Self::AesXts => 0,
            Self::BitlockerAesCbc => 1,
            Self::AesEcb => 2,
            Self::EssivAesCbc => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySize {
    Bits128,
    Bits192,
    Bits256,
}

impl KeySize {
    /// Register encoding: 1 = 128, 2 = 192, 3 = 256. 0 is "invalid".
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Bits128),
            2 => Some(Self::Bits192),
            3 => Some(Self::Bits256),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Bits128 => 1,
            Self::Bits192 => 2,
            Self::Bits256 => 3,
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::Bits128 => 16,
            Self::Bits192 => 24,
            Self::Bits256 => 32,
        }
    }
}

bitflags! {
    /// Supported data unit sizes. Bit `i` stands for `512 << i` bytes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DataUnitSizes: u8 {
        const B512 = 1 << 0;
        const K1 = 1 << 1;
        const K2 = 1 << 2;
        const K4 = 1 << 3;
        const K8 = 1 << 4;
        const K16 = 1 << 5;
        const K32 = 1 << 6;
        const K64 = 1 << 7;
    }
}

impl DataUnitSizes {
    /// Flag for a size in bytes, if it is one the register can express.
    pub fn from_bytes(bytes: u32) -> Option<Self> {
        if !bytes.is_power_of_two() || !(512..=65536).contains(&bytes) {
            return None;
        }
        Self::from_bits((bytes / 512) as u8)
    }

    /// The same set as a mask of byte sizes (bit `n` set means `1 << n` bytes).
    pub fn byte_mask(self) -> u32 {
        u32::from(self.bits()) * 512
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoCapability {
    pub algorithm: CryptoAlgorithm,
    pub key_size: KeySize,
    pub data_unit_sizes: DataUnitSizes,
}

/// A capability together with its index in the controller's capability array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityEntry {
    pub index: u8,
    pub capability: CryptoCapability,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    version: u32,
    num_keyslots: u32,
    entries: Vec<CapabilityEntry>,
}

impl CapabilityTable {
    pub fn new(version: u32, num_keyslots: u32, entries: Vec<CapabilityEntry>) -> Self {
        Self {
            version,
            num_keyslots,
            entries,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn num_keyslots(&self) -> u32 {
        self.num_keyslots
    }

    pub fn entries(&self) -> &[CapabilityEntry] {
        &self.entries
    }

    /// True when no recognised algorithm survived discovery.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capability index matching a requested mode, as a key-slot programmer
    /// would write it into the slot's configuration.
    pub fn find(&self, algorithm: CryptoAlgorithm, key_size: KeySize, data_unit_size: u32) -> Option<u8> {
        let wanted = DataUnitSizes::from_bytes(data_unit_size)?;
        self.entries
            .iter()
            .find(|e| {
                e.capability.algorithm == algorithm
                    && e.capability.key_size == key_size
                    && e.capability.data_unit_sizes.contains(wanted)
            })
            .map(|e| e.index)
    }

    /// Summary handed to the block layer when crypto is registered.
    pub fn profile(&self) -> CryptoProfile {
        let mut modes: Vec<ModeSupport> = Vec::new();
        for entry in &self.entries {
            let cap = entry.capability;
            let mask = cap.data_unit_sizes.byte_mask();
            match modes
                .iter_mut()
                .find(|m| m.algorithm == cap.algorithm && m.key_size == cap.key_size)
            {
                Some(m) => m.data_unit_size_mask |= mask,
                None => modes.push(ModeSupport {
                    algorithm: cap.algorithm,
                    key_size: cap.key_size,
                    data_unit_size_mask: mask,
                }),
            }
        }
        CryptoProfile {
            num_slots: self.num_keyslots,
            max_dun_bytes_supported: MAX_DUN_BYTES,
            modes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSupport {
    pub algorithm: CryptoAlgorithm,
    pub key_size: KeySize,
    /// Bit `n` set means data units of `1 << n` bytes are supported.
    pub data_unit_size_mask: u32,
}

/// What the block layer learns about this controller's inline crypto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoProfile {
    pub num_slots: u32,
    pub max_dun_bytes_supported: u32,
    pub modes: Vec<ModeSupport>,
}

impl CryptoProfile {
    pub fn modes_supported(&self, algorithm: CryptoAlgorithm, key_size: KeySize) -> u32 {
        self.modes
            .iter()
            .find(|m| m.algorithm == algorithm && m.key_size == key_size)
            .map_or(0, |m| m.data_unit_size_mask)
    }
}
