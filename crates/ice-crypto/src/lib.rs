//! # ice-crypto: Per-Command Inline Encryption
//!
//! Binding, header encoding, and PRDT key staging/wiping for one command,
//! plus the lifecycle guard that orders them.

pub mod binder;
pub mod command;
pub mod encoder;
pub mod engine;
pub mod key_handler;
pub mod lifecycle;

pub use binder::CommandBinder;
pub use command::{CommandState, IoRequest, Segment};
pub use encoder::DescriptorEncoder;
pub use engine::{select_strategy, HardwareCrypto, InertCrypto, InlineCrypto};
pub use key_handler::{ClearOutcome, FillOutcome, PrdtKeyHandler};
pub use lifecycle::{CompletionStatus, CryptoPhase, InFlightCommand};
