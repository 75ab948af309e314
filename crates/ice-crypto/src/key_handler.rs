use ice_core::{ControllerContext, CryptContext, CryptoBinding, VendorFillError};
use ice_desc::ScatterGatherTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// Nothing to stage: plaintext, no crypt context, or no vendor fill hook.
    Skipped,
    Filled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Skipped,
    /// Number of bytes zeroized.
    Scrubbed(usize),
}

/// Stages key material in the PRDT before submission and wipes it after completion.
pub struct PrdtKeyHandler;

impl PrdtKeyHandler {
    /// Delegates to the vendor hook when the command carries a crypt context.
    ///
    /// A vendor error is fatal to the command: it must not reach the doorbell.
    ///
    /// # Panics
    /// If `sg_count` exceeds the table.
    pub fn fill(
        ctx: &ControllerContext,
        binding: &CryptoBinding,
        crypt_ctx: Option<&CryptContext>,
        table: &mut ScatterGatherTable,
        sg_count: usize,
    ) -> Result<FillOutcome, VendorFillError> {
        if !ctx.crypto_usable() || !binding.is_encrypted() {
            return Ok(FillOutcome::Skipped);
        }
        let (Some(crypt_ctx), Some(vendor)) = (crypt_ctx, ctx.vendor()) else {
            return Ok(FillOutcome::Skipped);
        };
        assert!(
            sg_count <= table.capacity(),
            "PrdtKeyHandler: sg_count {} exceeds the {}-entry table",
            sg_count,
            table.capacity()
        );

        vendor
            .fill_crypto_prdt(crypt_ctx, binding, table, sg_count)
            .inspect_err(|e| tracing::warn!("vendor PRDT fill failed for slot {:?}: {}", binding.key_slot(), e))?;
        Ok(FillOutcome::Filled)
    }

    /// Zeroizes the crypto region of the table when keys may have been staged in it.
    ///
    /// Safe to run on a partially filled or already-zeroed table.
    pub fn clear(
        ctx: &ControllerContext,
        carried_crypt_ctx: bool,
        table: &mut ScatterGatherTable,
        sg_count: usize,
    ) -> ClearOutcome {
        if !ctx.must_scrub_prdt() || !carried_crypt_ctx {
            return ClearOutcome::Skipped;
        }
        ClearOutcome::Scrubbed(table.scrub(sg_count))
    }
}
