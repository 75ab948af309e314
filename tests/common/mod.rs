//! Test doubles for the collaborators around the crypto core:
//! capability registers, the vendor PRDT hook, and the doorbell.
#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ufs_ice::ice_core::capability::{
    CapabilityEntry, CapabilityTable, CryptoAlgorithm, CryptoCapability, DataUnitSizes, KeySize,
};
use ufs_ice::ice_core::registers::{encode_capability, CapabilityRegisters};
use ufs_ice::ice_core::{CryptContext, CryptoBinding, CryptoKey, VendorCryptoOps, VendorFillError};
use ufs_ice::ice_desc::ScatterGatherTable;
use ufs_ice::Doorbell;

pub const AES_XTS_256_4K: CryptoCapability = CryptoCapability {
    algorithm: CryptoAlgorithm::AesXts,
    key_size: KeySize::Bits256,
    data_unit_sizes: DataUnitSizes::K4,
};

/// Capability registers with fixed values and a read counter.
pub struct FakeRegisters {
    pub version: u32,
    pub key_slots: u32,
    pub capabilities: Vec<u32>,
    pub reads: AtomicUsize,
}

impl FakeRegisters {
    pub fn new(key_slots: u32, capabilities: &[CryptoCapability]) -> Self {
        Self {
            version: 0x0310,
            key_slots,
            capabilities: capabilities.iter().map(encode_capability).collect(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn standard() -> Self {
        Self::new(32, &[AES_XTS_256_4K])
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl CapabilityRegisters for FakeRegisters {
    fn version(&self) -> u32 {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.version
    }

    fn key_slot_count(&self) -> u32 {
        self.key_slots
    }

    fn capability_count(&self) -> u8 {
        self.capabilities.len() as u8
    }

    fn capability(&self, index: u8) -> u32 {
        self.capabilities[usize::from(index)]
    }
}

pub fn standard_table() -> Arc<CapabilityTable> {
    Arc::new(CapabilityTable::new(
        0x0310,
        32,
        vec![CapabilityEntry {
            index: 0,
            capability: AES_XTS_256_4K,
        }],
    ))
}

pub fn crypt_ctx(dun: u64) -> Arc<CryptContext> {
    let key = CryptoKey::new(CryptoAlgorithm::AesXts, KeySize::Bits256, 4096, vec![0xA5; 32]);
    Arc::new(CryptContext::new(key, dun))
}

/// Vendor hook that copies the raw key into each entry's extension area.
///
/// `fail_after` makes it stop with `ResourceExhausted` after writing that
/// many entries, leaving a partially filled table behind.
#[derive(Default)]
pub struct FakeVendor {
    pub fail_after: Option<usize>,
    pub calls: AtomicUsize,
}

impl FakeVendor {
    pub fn failing_after(entries: usize) -> Self {
        Self {
            fail_after: Some(entries),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VendorCryptoOps for FakeVendor {
    fn fill_crypto_prdt(
        &self,
        ctx: &CryptContext,
        _binding: &CryptoBinding,
        table: &mut ScatterGatherTable,
        sg_count: usize,
    ) -> Result<(), VendorFillError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = ctx.key.raw();
        if key.len() > table.extension_size() {
            return Err(VendorFillError::KeyDoesNotFit {
                key_len: key.len(),
                extension: table.extension_size(),
            });
        }
        for idx in 0..sg_count {
            if self.fail_after == Some(idx) {
                return Err(VendorFillError::ResourceExhausted);
            }
            table.extension_mut(idx)[..key.len()].copy_from_slice(key);
        }
        Ok(())
    }
}

/// Records every tag it is rung for.
#[derive(Default)]
pub struct RecordingDoorbell {
    pub rung: RefCell<Vec<u32>>,
}

impl Doorbell for RecordingDoorbell {
    fn ring(&self, tag: u32) {
        self.rung.borrow_mut().push(tag);
    }
}
