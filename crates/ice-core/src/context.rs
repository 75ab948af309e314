use std::fmt;
use std::sync::Arc;

use crate::capability::CapabilityTable;
use crate::enabler::CryptoEnabler;
use crate::quirks::ControllerQuirks;
use crate::vendor::VendorCryptoOps;

/// Controller-wide crypto state, passed explicitly to every crypto operation.
///
/// Built once at attach and shared read-only (`Arc`) across all queues.
pub struct ControllerContext {
    capabilities: Option<Arc<CapabilityTable>>,
    quirks: ControllerQuirks,
    host_crypto: bool,
    usable: bool,
    vendor: Option<Arc<dyn VendorCryptoOps>>,
    scrub_without_quirk: bool,
}

impl ControllerContext {
    /// `capabilities` is `None` when discovery failed or was skipped.
    pub fn new(capabilities: Option<Arc<CapabilityTable>>, quirks: ControllerQuirks) -> Self {
        let mut ctx = Self {
            capabilities,
            quirks,
            host_crypto: true,
            usable: false,
            vendor: None,
            scrub_without_quirk: false,
        };
        ctx.usable = ctx.evaluate();
        ctx
    }

    /// Host-side switch; `false` forces the crypto path inert.
    pub fn with_host_crypto(mut self, enabled: bool) -> Self {
        self.host_crypto = enabled;
        self.usable = self.evaluate();
        self
    }

    pub fn with_vendor(mut self, vendor: Arc<dyn VendorCryptoOps>) -> Self {
        self.vendor = Some(vendor);
        self
    }

    pub fn with_scrub_without_quirk(mut self, enabled: bool) -> Self {
        self.scrub_without_quirk = enabled;
        self
    }

    fn evaluate(&self) -> bool {
        self.host_crypto
            && self
                .capabilities
                .as_deref()
                .is_some_and(|table| CryptoEnabler::is_usable(table, self.quirks))
    }

    #[inline(always)]
    pub fn crypto_usable(&self) -> bool {
        self.usable
    }

    pub fn capabilities(&self) -> Option<&CapabilityTable> {
        self.capabilities.as_deref()
    }

    #[inline(always)]
    pub fn quirks(&self) -> ControllerQuirks {
        self.quirks
    }

    pub fn vendor(&self) -> Option<&dyn VendorCryptoOps> {
        self.vendor.as_deref()
    }

    /// Whether a completed encrypted command must have its PRDT zeroized.
    #[inline(always)]
    pub fn must_scrub_prdt(&self) -> bool {
        self.quirks.keys_in_prdt() || self.scrub_without_quirk
    }
}

impl fmt::Debug for ControllerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerContext")
            .field("capabilities", &self.capabilities)
            .field("quirks", &self.quirks)
            .field("usable", &self.usable)
            .field("vendor", &self.vendor.is_some())
            .field("scrub_without_quirk", &self.scrub_without_quirk)
            .finish()
    }
}
