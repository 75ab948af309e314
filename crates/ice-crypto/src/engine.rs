//! # ice-crypto: Crypto Path Strategy
//!
//! The per-command crypto path is chosen once, at attach: a live
//! [`HardwareCrypto`] when the controller can offload, an [`InertCrypto`]
//! otherwise. Both present the same interface, so the command pipeline never
//! branches on whether crypto is compiled in or usable.

use std::sync::Arc;

use ice_core::{ControllerContext, CryptoBinding, VendorFillError};

use crate::binder::CommandBinder;
use crate::command::{CommandState, IoRequest};
use crate::encoder::DescriptorEncoder;
use crate::key_handler::{ClearOutcome, FillOutcome, PrdtKeyHandler};

pub trait InlineCrypto: Send + Sync {
    fn is_active(&self) -> bool;

    /// Binds the request's slot and DUN to the command.
    fn prepare(&self, cmd: &mut CommandState, request: &IoRequest) -> CryptoBinding;

    /// Writes the binding into the command's descriptor header.
    fn encode(&self, cmd: &mut CommandState);

    /// Stages key material in the PRDT. Runs before the doorbell.
    fn fill_prdt(&self, cmd: &mut CommandState) -> Result<FillOutcome, VendorFillError>;

    /// Wipes staged key material. Runs after completion on every path.
    fn clear_prdt(&self, cmd: &mut CommandState) -> ClearOutcome;
}

/// Crypto path for controllers without usable offload.
#[derive(Debug, Default)]
pub struct InertCrypto;

impl InlineCrypto for InertCrypto {
    fn is_active(&self) -> bool {
        false
    }

    fn prepare(&self, cmd: &mut CommandState, _request: &IoRequest) -> CryptoBinding {
        cmd.attach_binding(CryptoBinding::Plaintext, None);
        CryptoBinding::Plaintext
    }

    fn encode(&self, _cmd: &mut CommandState) {}

    fn fill_prdt(&self, _cmd: &mut CommandState) -> Result<FillOutcome, VendorFillError> {
        Ok(FillOutcome::Skipped)
    }

    fn clear_prdt(&self, _cmd: &mut CommandState) -> ClearOutcome {
        ClearOutcome::Skipped
    }
}

/// Crypto path backed by the controller's inline engine.
#[derive(Debug)]
pub struct HardwareCrypto {
    ctx: Arc<ControllerContext>,
}

impl HardwareCrypto {
    pub fn new(ctx: Arc<ControllerContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ControllerContext {
        &self.ctx
    }
}

impl InlineCrypto for HardwareCrypto {
    fn is_active(&self) -> bool {
        true
    }

    fn prepare(&self, cmd: &mut CommandState, request: &IoRequest) -> CryptoBinding {
        CommandBinder::bind_request(&self.ctx, cmd, request)
    }

    #[inline]
    fn encode(&self, cmd: &mut CommandState) {
        DescriptorEncoder::encode(&cmd.binding, &mut cmd.header);
    }

    fn fill_prdt(&self, cmd: &mut CommandState) -> Result<FillOutcome, VendorFillError> {
        PrdtKeyHandler::fill(&self.ctx, &cmd.binding, cmd.crypt_ctx.as_deref(), &mut cmd.prdt, cmd.sg_count)
    }

    fn clear_prdt(&self, cmd: &mut CommandState) -> ClearOutcome {
        PrdtKeyHandler::clear(&self.ctx, cmd.crypt_ctx.is_some(), &mut cmd.prdt, cmd.sg_count)
    }
}

/// Picks the crypto path for a freshly attached controller.
pub fn select_strategy(ctx: Arc<ControllerContext>) -> Arc<dyn InlineCrypto> {
    if ctx.crypto_usable() {
        tracing::info!("inline crypto active (quirks: {:?})", ctx.quirks());
        Arc::new(HardwareCrypto::new(ctx))
    } else {
        tracing::info!("inline crypto inert");
        Arc::new(InertCrypto)
    }
}
