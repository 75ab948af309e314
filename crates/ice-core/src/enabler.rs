use crate::capability::CapabilityTable;
use crate::quirks::ControllerQuirks;

/// The single gate in front of the per-command crypto path.
pub struct CryptoEnabler;

impl CryptoEnabler {
    /// Pure decision. `false` means every downstream crypto operation is a no-op.
    pub fn is_usable(table: &CapabilityTable, quirks: ControllerQuirks) -> bool {
        table.num_keyslots() > 0 && !table.is_empty() && !quirks.contains(ControllerQuirks::CRYPTO_DISABLED)
    }
}
