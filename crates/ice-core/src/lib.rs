pub mod binding;
pub mod capability;
pub mod config;
pub mod context;
pub mod enabler;
pub mod error;
pub mod negotiator;
pub mod quirks;
pub mod registers;
pub mod vendor;

pub use binding::{CryptContext, CryptoBinding, CryptoKey, KeySlot};
pub use capability::{
    CapabilityEntry, CapabilityTable, CryptoAlgorithm, CryptoCapability, CryptoProfile, DataUnitSizes, KeySize,
};
pub use config::HostConfig;
pub use context::ControllerContext;
pub use enabler::CryptoEnabler;
pub use error::{ConfigError, HardwareCapabilityError, IceError, VendorFillError};
pub use negotiator::CapabilityNegotiator;
pub use quirks::ControllerQuirks;
pub use registers::{CapabilityRegisters, RegisterSnapshot};
pub use vendor::VendorCryptoOps;
