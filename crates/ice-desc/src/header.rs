//! # ice-desc: Request Descriptor Header
//!
//! The 16-byte header that opens every UTP transfer request descriptor.
//! Layout is fixed by the host controller interface and must stay bit-exact:
//!
//! ```text
//! byte 0      cci            crypto configuration index (key slot)
//! byte 1      ehs_length
//! byte 2      bit 7          enable_crypto
//! byte 3      bit 0          interrupt
//!             bits 1..3      data_direction
//!             bits 4..8      command_type
//! bytes 4..8  dunl           DUN[31:0],  little-endian
//! byte 8      ocs
//! byte 9      cds
//! bytes 10..12 ldbc          little-endian
//! bytes 12..16 dunu          DUN[63:32], little-endian
//! ```

use static_assertions::const_assert_eq;
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

const ENABLE_CRYPTO: u8 = 1 << 7;
const INTERRUPT: u8 = 1 << 0;
const DATA_DIRECTION_SHIFT: u8 = 1;
const DATA_DIRECTION_MASK: u8 = 0b11 << DATA_DIRECTION_SHIFT;
const COMMAND_TYPE_SHIFT: u8 = 4;

/// Width of the `cci` field. Key slots at or above this cannot be encoded.
pub const CCI_LIMIT: u32 = 1 << 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Scsi = 0x0,
    UfsStorage = 0x1,
    DevManage = 0x2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataDirection {
    None = 0x0,
    HostToDevice = 0x1,
    DeviceToHost = 0x2,
}

/// Fixed-layout request descriptor header.
///
/// A default header has every crypto field at zero, which the controller
/// reads as "no inline encryption" for this command.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
pub struct RequestDescriptorHeader {
    cci: u8,
    ehs_length: u8,
    crypto_flags: u8,
    dword0_flags: u8,
    dunl: U32,
    ocs: u8,
    cds: u8,
    ldbc: U16,
    dunu: U32,
}

const_assert_eq!(core::mem::size_of::<RequestDescriptorHeader>(), 16);

impl RequestDescriptorHeader {
    /// Builds the non-crypto half of the header. Crypto fields start zeroed.
    pub fn new(command_type: CommandType, direction: DataDirection, ehs_length: u8, interrupt: bool) -> Self {
        let mut dword0_flags = ((command_type as u8) << COMMAND_TYPE_SHIFT)
            | ((direction as u8) << DATA_DIRECTION_SHIFT);
        if interrupt {
            dword0_flags |= INTERRUPT;
        }
        Self {
            ehs_length,
            dword0_flags,
            ..Self::default()
        }
    }

    /// Writes the crypto half of the header: enable bit, key slot, and the
    /// data unit number split into two little-endian words.
    #[inline]
    pub fn set_crypto(&mut self, cci: u8, data_unit_number: u64) {
        self.crypto_flags |= ENABLE_CRYPTO;
        self.cci = cci;
        self.dunl = U32::new(data_unit_number as u32);
        self.dunu = U32::new((data_unit_number >> 32) as u32);
    }

    #[inline]
    pub fn crypto_enabled(&self) -> bool {
        self.crypto_flags & ENABLE_CRYPTO != 0
    }

    #[inline]
    pub fn cci(&self) -> u8 {
        self.cci
    }

    #[inline]
    pub fn dunl(&self) -> u32 {
        self.dunl.get()
    }

    #[inline]
    pub fn dunu(&self) -> u32 {
        self.dunu.get()
    }

    /// Recombines `dunl` and `dunu` into the 64-bit data unit number.
    pub fn data_unit_number(&self) -> u64 {
        (u64::from(self.dunu()) << 32) | u64::from(self.dunl())
    }

    /// True when enable, cci, dunl and dunu are all zero.
    pub fn crypto_fields_clear(&self) -> bool {
        !self.crypto_enabled() && self.cci == 0 && self.dunl() == 0 && self.dunu() == 0
    }

    pub fn command_type(&self) -> u8 {
        self.dword0_flags >> COMMAND_TYPE_SHIFT
    }

    pub fn data_direction(&self) -> u8 {
        (self.dword0_flags & DATA_DIRECTION_MASK) >> DATA_DIRECTION_SHIFT
    }

    pub fn interrupt(&self) -> bool {
        self.dword0_flags & INTERRUPT != 0
    }

    pub fn ehs_length(&self) -> u8 {
        self.ehs_length
    }

    /// Overall command status, written back by the controller.
    pub fn ocs(&self) -> u8 {
        self.ocs
    }

    pub fn set_ocs(&mut self, ocs: u8) {
        self.ocs = ocs;
    }

    /// Wire image of the header.
    pub fn to_bytes(&self) -> [u8; 16] {
        zerocopy::transmute!(*self)
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        zerocopy::transmute!(bytes)
    }
}
