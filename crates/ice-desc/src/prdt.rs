//! # ice-desc: Physical Region Description Table
//!
//! Per-command scatter/gather table. Each entry starts with the standard
//! 16-byte PRDT entry; controllers that take keys in-band widen the stride
//! and use the bytes past offset 16 as a vendor extension area.

use alloc::vec;
use alloc::vec::Vec;

use static_assertions::const_assert_eq;
use zerocopy::byteorder::little_endian::{U32, U64};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};
use zeroize::Zeroize;

/// Size of the standard (non-extended) PRDT entry.
pub const PRDT_ENTRY_SIZE: usize = 16;

/// Standard PRDT entry: data buffer address and byte count.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
pub struct PrdtEntry {
    addr: U64,
    reserved: U32,
    /// Byte count minus one.
    size: U32,
}

const_assert_eq!(core::mem::size_of::<PrdtEntry>(), PRDT_ENTRY_SIZE);

impl PrdtEntry {
    pub fn new(addr: u64, len: u32) -> Self {
        assert!(len > 0, "PrdtEntry: zero-length segment");
        Self {
            addr: U64::new(addr),
            reserved: U32::new(0),
            size: U32::new(len - 1),
        }
    }

    pub fn addr(&self) -> u64 {
        self.addr.get()
    }

    pub fn byte_count(&self) -> u32 {
        self.size.get() + 1
    }
}

/// A command's scatter/gather table.
///
/// ## Key Hygiene
/// When keys are staged in the extension area, [`ScatterGatherTable::scrub`]
/// must run before the table backs another command. It goes through
/// `zeroize`, whose volatile writes survive dead-store elimination.
pub struct ScatterGatherTable {
    buf: Vec<u8>,
    entry_size: usize,
    capacity: usize,
}

impl ScatterGatherTable {
    /// Allocates a zeroed table of `capacity` entries, each `entry_size` bytes.
    pub fn new(entry_size: usize, capacity: usize) -> Self {
        assert!(
            entry_size >= PRDT_ENTRY_SIZE,
            "ScatterGatherTable: entry size {} is below the {}-byte PRDT entry",
            entry_size,
            PRDT_ENTRY_SIZE
        );
        assert!(capacity > 0, "ScatterGatherTable: zero capacity");
        Self {
            buf: vec![0u8; entry_size * capacity],
            entry_size,
            capacity,
        }
    }

    #[inline(always)]
    pub fn entry_size(&self) -> usize {
        self.entry_size
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes available per entry for vendor key material.
    pub fn extension_size(&self) -> usize {
        self.entry_size - PRDT_ENTRY_SIZE
    }

    fn offset(&self, idx: usize) -> usize {
        assert!(idx < self.capacity, "ScatterGatherTable: entry {} out of {}", idx, self.capacity);
        idx * self.entry_size
    }

    /// Writes the standard part of entry `idx`. The extension area is untouched.
    pub fn set_entry(&mut self, idx: usize, addr: u64, len: u32) {
        let off = self.offset(idx);
        let entry = PrdtEntry::new(addr, len);
        self.buf[off..off + PRDT_ENTRY_SIZE].copy_from_slice(entry.as_bytes());
    }

    pub fn entry(&self, idx: usize) -> Option<PrdtEntry> {
        if idx >= self.capacity {
            return None;
        }
        let off = idx * self.entry_size;
        PrdtEntry::read_from_bytes(&self.buf[off..off + PRDT_ENTRY_SIZE]).ok()
    }

    /// Vendor extension area of entry `idx`. Empty for 16-byte strides.
    pub fn extension(&self, idx: usize) -> &[u8] {
        let off = self.offset(idx);
        &self.buf[off + PRDT_ENTRY_SIZE..off + self.entry_size]
    }

    pub fn extension_mut(&mut self, idx: usize) -> &mut [u8] {
        let off = self.offset(idx);
        &mut self.buf[off + PRDT_ENTRY_SIZE..off + self.entry_size]
    }

    /// Length of the region that may hold key material for `sg_count` entries.
    /// Clamped to the table size.
    pub fn crypto_region_len(&self, sg_count: usize) -> usize {
        self.entry_size * sg_count.min(self.capacity)
    }

    pub fn crypto_region(&self, sg_count: usize) -> &[u8] {
        &self.buf[..self.crypto_region_len(sg_count)]
    }

    /// Zeroizes the first `sg_count` entries. Returns the number of bytes cleared.
    pub fn scrub(&mut self, sg_count: usize) -> usize {
        let len = self.crypto_region_len(sg_count);
        self.buf[..len].zeroize();
        len
    }

    pub fn is_scrubbed(&self, sg_count: usize) -> bool {
        self.crypto_region(sg_count).iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

