use std::sync::{Arc, OnceLock};

use crate::capability::{CapabilityEntry, CapabilityTable};
use crate::error::HardwareCapabilityError;
use crate::registers::{decode_capability, is_supported_version, CapabilityRegisters};

/// Discovers the controller's crypto capabilities once per controller.
///
/// ## Idempotence
/// The first successful discovery is published; later calls (e.g. from a
/// re-init after reset) return it without touching the registers. Failures
/// are not cached, so a reset that repairs the hardware gets a fresh read.
#[derive(Debug, Default)]
pub struct CapabilityNegotiator {
    table: OnceLock<Arc<CapabilityTable>>,
}

impl CapabilityNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discover<R>(&self, regs: &R) -> Result<Arc<CapabilityTable>, HardwareCapabilityError>
    where
        R: CapabilityRegisters + ?Sized,
    {
        if let Some(table) = self.table.get() {
            tracing::trace!("crypto capabilities already discovered");
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(read_table(regs)?);
        // Racing first callers both read; exactly one table is published.
        Ok(Arc::clone(self.table.get_or_init(|| table)))
    }

    pub fn table(&self) -> Option<Arc<CapabilityTable>> {
        self.table.get().cloned()
    }
}

fn read_table<R>(regs: &R) -> Result<CapabilityTable, HardwareCapabilityError>
where
    R: CapabilityRegisters + ?Sized,
{
    let version = regs.version();
    if !is_supported_version(version) {
        return Err(HardwareCapabilityError::UnsupportedVersion(version));
    }

    let num_keyslots = regs.key_slot_count();
    if num_keyslots == 0 {
        return Err(HardwareCapabilityError::NoKeySlots);
    }

    let mut entries = Vec::new();
    for index in 0..regs.capability_count() {
        let word = regs.capability(index);
        match decode_capability(word) {
            Some(capability) => entries.push(CapabilityEntry { index, capability }),
            None => tracing::debug!("skipping unrecognised crypto capability {}: {:#010x}", index, word),
        }
    }

    tracing::info!(
        "crypto capabilities: version {:#06x}, {} key slots, {} usable modes",
        version,
        num_keyslots,
        entries.len()
    );
    Ok(CapabilityTable::new(version, num_keyslots, entries))
}
