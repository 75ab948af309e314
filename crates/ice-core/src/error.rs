use thiserror::Error;

/// Capability discovery failed. Fatal to crypto offload, not to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareCapabilityError {
    #[error("controller reports zero crypto key slots")]
    NoKeySlots,
    #[error("unrecognized crypto capability version {0:#06x}")]
    UnsupportedVersion(u32),
}

/// The vendor collaborator could not stage key material. Fatal to the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VendorFillError {
    #[error("vendor PRDT fill: resources exhausted")]
    ResourceExhausted,
    #[error("vendor PRDT fill: {key_len}-byte key does not fit a {extension}-byte entry extension")]
    KeyDoesNotFit { key_len: usize, extension: usize },
    #[error("vendor PRDT fill: {0}")]
    Device(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("sg_entry_size {0} is below the 16-byte PRDT entry")]
    EntrySizeTooSmall(usize),
    #[error("max_sg_entries must be at least 1")]
    NoSgEntries,
    #[error("unknown controller quirk `{0}`")]
    UnknownQuirk(String),
}

#[derive(Debug, Error)]
pub enum IceError {
    #[error(transparent)]
    Capability(#[from] HardwareCapabilityError),
    #[error(transparent)]
    VendorFill(#[from] VendorFillError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
