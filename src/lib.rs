//! # ufs-ice: Inline Encryption for UFS-Style Host Controllers
//!
//! Binds programmed key slots to outgoing storage commands, encodes the
//! binding into the request descriptor header, delegates in-band key staging
//! to the vendor driver, and wipes staged keys once a command completes.
//!
//! - [`ice_desc`]: bit-exact descriptor header and PRDT layouts.
//! - [`ice_core`]: capability discovery, quirks, config, controller context.
//! - [`ice_crypto`]: per-command binding, encoding, PRDT key handling.
//! - [`ice_host`]: controller attach and command submission.

pub use ice_core;
pub use ice_crypto;
pub use ice_desc;
pub use ice_host;

pub use ice_core::{ControllerContext, ControllerQuirks, CryptoBinding, HostConfig, IceError, KeySlot};
pub use ice_crypto::{CompletionStatus, InFlightCommand, IoRequest, Segment};
pub use ice_host::{CommandPool, Doorbell, HostController};
