use std::sync::Arc;

use ice_core::{CryptContext, CryptoBinding, KeySlot};
use ice_desc::{CommandType, DataDirection, RequestDescriptorHeader, ScatterGatherTable};

use crate::key_handler::ClearOutcome;
use crate::lifecycle::CryptoPhase;

/// One physically contiguous data segment of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub addr: u64,
    pub len: u32,
}

/// What the block-submission layer hands over for one command.
#[derive(Debug)]
pub struct IoRequest {
    pub direction: DataDirection,
    pub segments: Vec<Segment>,
    pub crypt_keyslot: Option<KeySlot>,
    pub crypt_ctx: Option<Arc<CryptContext>>,
}

impl IoRequest {
    pub fn plaintext(direction: DataDirection, segments: Vec<Segment>) -> Self {
        Self {
            direction,
            segments,
            crypt_keyslot: None,
            crypt_ctx: None,
        }
    }

    pub fn encrypted(
        direction: DataDirection,
        segments: Vec<Segment>,
        slot: KeySlot,
        ctx: Arc<CryptContext>,
    ) -> Self {
        Self {
            direction,
            segments,
            crypt_keyslot: Some(slot),
            crypt_ctx: Some(ctx),
        }
    }
}

/// Working state of one command tag: its descriptor header, its PRDT, and
/// the crypto binding recorded for the request currently using the tag.
///
/// Exclusively owned by whoever drives the command; never shared.
pub struct CommandState {
    tag: u32,
    pub(crate) header: RequestDescriptorHeader,
    pub(crate) prdt: ScatterGatherTable,
    pub(crate) sg_count: usize,
    pub(crate) binding: CryptoBinding,
    pub(crate) crypt_ctx: Option<Arc<CryptContext>>,
    pub(crate) phase: CryptoPhase,
    pub(crate) last_clear: Option<ClearOutcome>,
}

impl CommandState {
    pub fn new(tag: u32, sg_entry_size: usize, max_sg_entries: usize) -> Self {
        Self {
            tag,
            header: RequestDescriptorHeader::default(),
            prdt: ScatterGatherTable::new(sg_entry_size, max_sg_entries),
            sg_count: 0,
            binding: CryptoBinding::Plaintext,
            crypt_ctx: None,
            phase: CryptoPhase::Unbound,
            last_clear: None,
        }
    }

    /// Readies the tag for `request`: fresh header, mapped segments, no binding.
    pub fn reset_for(&mut self, request: &IoRequest) {
        let count = request.segments.len();
        assert!(
            count <= self.prdt.capacity(),
            "CommandState: {} segments exceed the {}-entry PRDT",
            count,
            self.prdt.capacity()
        );
        self.header = RequestDescriptorHeader::new(CommandType::UfsStorage, request.direction, 0, true);
        for (idx, seg) in request.segments.iter().enumerate() {
            self.prdt.set_entry(idx, seg.addr, seg.len);
        }
        self.sg_count = count;
        self.binding = CryptoBinding::Plaintext;
        self.crypt_ctx = None;
        self.phase = CryptoPhase::Unbound;
        self.last_clear = None;
    }

    pub(crate) fn attach_binding(&mut self, binding: CryptoBinding, crypt_ctx: Option<Arc<CryptContext>>) {
        self.binding = binding;
        self.crypt_ctx = if binding.is_encrypted() { crypt_ctx } else { None };
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn header(&self) -> &RequestDescriptorHeader {
        &self.header
    }

    pub fn prdt(&self) -> &ScatterGatherTable {
        &self.prdt
    }

    pub fn sg_count(&self) -> usize {
        self.sg_count
    }

    pub fn binding(&self) -> CryptoBinding {
        self.binding
    }

    pub fn carries_crypt_ctx(&self) -> bool {
        self.crypt_ctx.is_some()
    }

    pub fn phase(&self) -> CryptoPhase {
        self.phase
    }

    /// Result of the PRDT clear run at the last completion, if any.
    pub fn last_clear(&self) -> Option<ClearOutcome> {
        self.last_clear
    }
}
