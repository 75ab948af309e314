use serde::Deserialize;

use crate::error::ConfigError;
use crate::quirks::ControllerQuirks;
use ice_desc::PRDT_ENTRY_SIZE;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HostConfig {
    /// Host-side switch for inline crypto. `false` keeps the crypto path inert.
    pub inline_crypto: bool,
    /// Quirk names, see [`ControllerQuirks::from_name`].
    pub quirks: Vec<String>,
    /// PRDT stride in bytes. Controllers with in-band keys use wider entries.
    pub sg_entry_size: usize,
    pub max_sg_entries: usize,
    /// Zeroize the PRDT of every encrypted command on completion, even when
    /// the controller does not declare `keys_in_prdt`.
    pub scrub_prdt_without_quirk: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            inline_crypto: true,
            quirks: Vec::new(),
            sg_entry_size: PRDT_ENTRY_SIZE,
            max_sg_entries: 128,
            scrub_prdt_without_quirk: false,
        }
    }
}

impl HostConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sg_entry_size < PRDT_ENTRY_SIZE {
            return Err(ConfigError::EntrySizeTooSmall(self.sg_entry_size));
        }
        if self.max_sg_entries == 0 {
            return Err(ConfigError::NoSgEntries);
        }
        self.controller_quirks().map(|_| ())
    }

    pub fn controller_quirks(&self) -> Result<ControllerQuirks, ConfigError> {
        self.quirks.iter().try_fold(ControllerQuirks::empty(), |acc, name| {
            ControllerQuirks::from_name(name)
                .map(|q| acc | q)
                .ok_or_else(|| ConfigError::UnknownQuirk(name.clone()))
        })
    }
}
