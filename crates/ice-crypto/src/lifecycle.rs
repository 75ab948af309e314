use ice_core::VendorFillError;

use crate::command::{CommandState, IoRequest};
use crate::engine::InlineCrypto;
use crate::key_handler::{ClearOutcome, FillOutcome};

/// Crypto sub-lifecycle of one command.
///
/// `TableFilled` and `TableCleared` are skipped for plaintext commands and
/// for controllers that never stage keys in the PRDT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoPhase {
    Unbound,
    Bound,
    Encoded,
    TableFilled,
    Submitted,
    Completed,
    TableCleared,
    Reclaimed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStatus {
    Success,
    DeviceError,
    Aborted,
}

/// A built command whose PRDT may hold key material.
///
/// The only way to reach the doorbell is through a value of this type, so
/// `encode` and `fill` have always run first. Completing it, or dropping it
/// on any abort path, runs the PRDT clear exactly once.
pub struct InFlightCommand<'a> {
    engine: &'a dyn InlineCrypto,
    cmd: &'a mut CommandState,
    finished: bool,
}

impl<'a> InFlightCommand<'a> {
    /// Bind, encode and fill `cmd` for `request`.
    ///
    /// On a fill error the command is torn down (and scrubbed) before the
    /// error is returned; it must not be submitted.
    pub fn build(
        engine: &'a dyn InlineCrypto,
        cmd: &'a mut CommandState,
        request: &IoRequest,
    ) -> Result<Self, VendorFillError> {
        cmd.reset_for(request);
        engine.prepare(cmd, request);
        cmd.phase = CryptoPhase::Bound;
        engine.encode(cmd);
        cmd.phase = CryptoPhase::Encoded;

        let mut inflight = Self {
            engine,
            cmd,
            finished: false,
        };
        match inflight.engine.fill_prdt(&mut *inflight.cmd) {
            Ok(FillOutcome::Filled) => inflight.cmd.phase = CryptoPhase::TableFilled,
            Ok(FillOutcome::Skipped) => {}
            Err(e) => {
                tracing::warn!("command {}: PRDT fill failed, not submitting: {}", inflight.cmd.tag(), e);
                return Err(e);
            }
        }
        Ok(inflight)
    }

    pub fn tag(&self) -> u32 {
        self.cmd.tag()
    }

    pub fn command(&self) -> &CommandState {
        &*self.cmd
    }

    pub fn mark_submitted(&mut self) {
        self.cmd.phase = CryptoPhase::Submitted;
    }

    /// Completion teardown. Returns what the PRDT clear did.
    pub fn complete(mut self, status: CompletionStatus) -> ClearOutcome {
        tracing::trace!("command {} completed: {:?}", self.cmd.tag(), status);
        self.finish()
    }

    fn finish(&mut self) -> ClearOutcome {
        if self.finished {
            return self.cmd.last_clear.unwrap_or(ClearOutcome::Skipped);
        }
        self.finished = true;
        self.cmd.phase = CryptoPhase::Completed;

        let outcome = self.engine.clear_prdt(self.cmd);
        if let ClearOutcome::Scrubbed(bytes) = outcome {
            self.cmd.phase = CryptoPhase::TableCleared;
            tracing::trace!("command {}: scrubbed {} PRDT bytes", self.cmd.tag(), bytes);
        }
        self.cmd.last_clear = Some(outcome);
        self.cmd.phase = CryptoPhase::Reclaimed;
        outcome
    }
}

impl Drop for InFlightCommand<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("command {} dropped before completion, clearing PRDT", self.cmd.tag());
            self.finish();
        }
    }
}
