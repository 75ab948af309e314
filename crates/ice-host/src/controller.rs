use std::sync::Arc;

use ice_core::{
    CapabilityNegotiator, CapabilityRegisters, CapabilityTable, ControllerContext, ControllerQuirks, CryptoProfile,
    HostConfig, IceError, VendorCryptoOps,
};
use ice_crypto::{select_strategy, CommandState, InFlightCommand, InertCrypto, InlineCrypto, IoRequest};

use crate::pipeline::{CommandPool, Doorbell};

/// Attach-time builder for a host controller's inline crypto.
pub struct HostControllerBuilder {
    config: HostConfig,
    vendor: Option<Arc<dyn VendorCryptoOps>>,
}

impl HostControllerBuilder {
    pub fn with_vendor(mut self, vendor: Arc<dyn VendorCryptoOps>) -> Self {
        self.vendor = Some(vendor);
        self
    }

    /// Negotiates capabilities, decides the gate, and selects the crypto path.
    ///
    /// A capability failure is not an error here: the controller attaches
    /// with crypto inert. Only a bad config fails the attach.
    pub fn attach<R>(self, regs: &R) -> Result<HostController, IceError>
    where
        R: CapabilityRegisters + ?Sized,
    {
        self.config.validate()?;
        let quirks = self.config.controller_quirks()?;
        let negotiator = CapabilityNegotiator::new();
        let table = discover_or_fallback(&negotiator, regs);

        let mut controller = HostController {
            config: self.config,
            quirks,
            vendor: self.vendor,
            negotiator,
            ctx: Arc::new(ControllerContext::new(None, quirks)),
            engine: Arc::new(InertCrypto),
            profile: None,
        };
        controller.install(table);
        Ok(controller)
    }
}

/// One attached controller: its crypto context and the selected crypto path.
pub struct HostController {
    config: HostConfig,
    quirks: ControllerQuirks,
    vendor: Option<Arc<dyn VendorCryptoOps>>,
    negotiator: CapabilityNegotiator,
    ctx: Arc<ControllerContext>,
    engine: Arc<dyn InlineCrypto>,
    profile: Option<CryptoProfile>,
}

impl HostController {
    pub fn builder(config: HostConfig) -> HostControllerBuilder {
        HostControllerBuilder { config, vendor: None }
    }

    /// Re-init after a controller reset. Discovery is cached once it has
    /// succeeded; a controller that attached inert gets another try.
    pub fn reinit<R>(&mut self, regs: &R)
    where
        R: CapabilityRegisters + ?Sized,
    {
        let had_table = self.ctx.capabilities().is_some();
        let table = discover_or_fallback(&self.negotiator, regs);
        if !had_table && table.is_some() {
            tracing::info!("crypto capabilities recovered after reset");
            self.install(table);
        }
    }

    fn install(&mut self, table: Option<Arc<CapabilityTable>>) {
        let mut ctx = ControllerContext::new(table, self.quirks)
            .with_host_crypto(self.config.inline_crypto)
            .with_scrub_without_quirk(self.config.scrub_prdt_without_quirk);
        if let Some(vendor) = &self.vendor {
            ctx = ctx.with_vendor(Arc::clone(vendor));
        }
        let ctx = Arc::new(ctx);

        self.profile = if ctx.crypto_usable() {
            let profile = ctx.capabilities().map(CapabilityTable::profile);
            if let Some(p) = &profile {
                tracing::info!(
                    "registering inline crypto profile: {} slots, {} modes, {} DUN bytes",
                    p.num_slots,
                    p.modes.len(),
                    p.max_dun_bytes_supported
                );
            }
            if !self.quirks.writes_global_enable() {
                tracing::debug!("crypto enable bit left untouched (broken_crypto_enable)");
            }
            profile
        } else {
            None
        };
        self.engine = select_strategy(Arc::clone(&ctx));
        self.ctx = ctx;
    }

    pub fn crypto_enabled(&self) -> bool {
        self.ctx.crypto_usable()
    }

    /// Profile registered with the block layer; `None` while crypto is inert.
    pub fn crypto_profile(&self) -> Option<&CryptoProfile> {
        self.profile.as_ref()
    }

    pub fn context(&self) -> &Arc<ControllerContext> {
        &self.ctx
    }

    pub fn engine(&self) -> &dyn InlineCrypto {
        self.engine.as_ref()
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// A command pool sized for this controller's PRDT layout.
    pub fn command_pool(&self, depth: u32) -> CommandPool {
        CommandPool::new(depth, self.config.sg_entry_size, self.config.max_sg_entries)
    }

    /// Builds `cmd` for `request` and rings the doorbell.
    ///
    /// The doorbell is only rung once the header is encoded and the PRDT
    /// filled. A fill failure fails the command without submitting it.
    pub fn submit<'a>(
        &'a self,
        cmd: &'a mut CommandState,
        request: &IoRequest,
        doorbell: &dyn Doorbell,
    ) -> Result<InFlightCommand<'a>, IceError> {
        let mut inflight = InFlightCommand::build(self.engine.as_ref(), cmd, request)?;
        doorbell.ring(inflight.tag());
        inflight.mark_submitted();
        Ok(inflight)
    }
}

fn discover_or_fallback<R>(negotiator: &CapabilityNegotiator, regs: &R) -> Option<Arc<CapabilityTable>>
where
    R: CapabilityRegisters + ?Sized,
{
    match negotiator.discover(regs) {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::warn!("crypto capability discovery failed, continuing without inline crypto: {}", e);
            None
        }
    }
}
