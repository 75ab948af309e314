use ice_desc::ScatterGatherTable;

use crate::binding::{CryptContext, CryptoBinding};
use crate::error::VendorFillError;

/// Vendor hooks for controllers that take key material in the PRDT.
///
/// Registering an implementation on the controller is what enables the
/// fill path; controllers without one never have keys written in-band.
pub trait VendorCryptoOps: Send + Sync {
    /// Writes key material for `binding` into the first `sg_count` entries.
    ///
    /// On error the table may be partially written; the caller still scrubs it.
    fn fill_crypto_prdt(
        &self,
        ctx: &CryptContext,
        binding: &CryptoBinding,
        table: &mut ScatterGatherTable,
        sg_count: usize,
    ) -> Result<(), VendorFillError>;
}
