use ice_core::{ControllerContext, CryptoBinding, KeySlot};

use crate::command::{CommandState, IoRequest};

/// Records, per command, whether it is encrypted and with which slot and DUN.
pub struct CommandBinder;

impl CommandBinder {
    /// Binds `key_slot` and `data_unit_number` to `cmd`.
    ///
    /// Plaintext when no slot is supplied or crypto is unusable on this
    /// controller. The slot is taken verbatim; range and ownership belong to
    /// the upstream allocator.
    pub fn bind(
        ctx: &ControllerContext,
        cmd: &mut CommandState,
        key_slot: Option<KeySlot>,
        data_unit_number: u64,
    ) -> CryptoBinding {
        let binding = Self::resolve(ctx, key_slot, data_unit_number);
        cmd.attach_binding(binding, None);
        binding
    }

    /// Binds from a block request, taking `dun[0]` and attaching the
    /// request's crypt context when the command ends up encrypted.
    pub fn bind_request(ctx: &ControllerContext, cmd: &mut CommandState, request: &IoRequest) -> CryptoBinding {
        let dun = request.crypt_ctx.as_ref().map_or(0, |c| c.dun[0]);
        let binding = Self::resolve(ctx, request.crypt_keyslot, dun);
        cmd.attach_binding(binding, request.crypt_ctx.clone());
        binding
    }

    #[inline(always)]
    fn resolve(ctx: &ControllerContext, key_slot: Option<KeySlot>, data_unit_number: u64) -> CryptoBinding {
        match key_slot {
            Some(slot) if ctx.crypto_usable() => CryptoBinding::Inline { slot, data_unit_number },
            _ => CryptoBinding::Plaintext,
        }
    }
}
