//! Per-command crypto binding and the upstream crypt context it comes from.

use core::fmt;

use zeroize::Zeroizing;

use crate::capability::{CryptoAlgorithm, KeySize};

/// Index of a key slot already programmed by the upstream allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeySlot(pub u32);

impl KeySlot {
    #[inline(always)]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Whether, and how, one command is encrypted.
///
/// Exactly one binding exists per in-flight command and it is owned by that
/// command's working state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CryptoBinding {
    #[default]
    Plaintext,
    Inline { slot: KeySlot, data_unit_number: u64 },
}

impl CryptoBinding {
    #[inline(always)]
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    #[inline(always)]
    pub fn key_slot(&self) -> Option<KeySlot> {
        match self {
            Self::Inline { slot, .. } => Some(*slot),
            Self::Plaintext => None,
        }
    }

    /// Zero for plaintext commands.
    #[inline(always)]
    pub fn data_unit_number(&self) -> u64 {
        match self {
            Self::Inline { data_unit_number, .. } => *data_unit_number,
            Self::Plaintext => 0,
        }
    }
}

/// Raw key bytes, wiped when dropped.
pub struct CryptoKey {
    pub algorithm: CryptoAlgorithm,
    pub key_size: KeySize,
    pub data_unit_size: u32,
    raw: Zeroizing<Vec<u8>>,
}

impl CryptoKey {
    pub fn new(algorithm: CryptoAlgorithm, key_size: KeySize, data_unit_size: u32, raw: Vec<u8>) -> Self {
        Self {
            algorithm,
            key_size,
            data_unit_size,
            raw: Zeroizing::new(raw),
        }
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

impl fmt::Debug for CryptoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoKey")
            .field("algorithm", &self.algorithm)
            .field("key_size", &self.key_size)
            .field("data_unit_size", &self.data_unit_size)
            .field("raw", &"<redacted>")
            .finish()
    }
}

/// Number of 64-bit words in a request's DUN.
pub const DUN_WORDS: usize = 4;

/// Encryption context a block request carries alongside its key slot.
#[derive(Debug)]
pub struct CryptContext {
    pub key: CryptoKey,
    pub dun: [u64; DUN_WORDS],
}

impl CryptContext {
    pub fn new(key: CryptoKey, dun: u64) -> Self {
        Self {
            key,
            dun: [dun, 0, 0, 0],
        }
    }
}
