use bitflags::bitflags;

bitflags! {
    /// Deviations of a controller revision from the nominal crypto protocol.
    ///
    /// Fixed at attach time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ControllerQuirks: u32 {
        /// Keys are re-supplied per command through the PRDT extension area
        /// instead of living in a hardware key slot.
        const KEYS_IN_PRDT = 1 << 0;
        /// The controller-wide crypto enable bit must be left alone.
        const BROKEN_CRYPTO_ENABLE = 1 << 1;
        /// Crypto support on this hardware revision is untrusted.
        const CRYPTO_DISABLED = 1 << 2;
    }
}

impl ControllerQuirks {
    #[inline(always)]
    pub fn keys_in_prdt(self) -> bool {
        self.contains(Self::KEYS_IN_PRDT)
    }

    /// Whether the driver may set the controller-wide crypto enable bit.
    pub fn writes_global_enable(self) -> bool {
        !self.contains(Self::BROKEN_CRYPTO_ENABLE)
    }

    /// Maps a config-file quirk name (`keys_in_prdt`, ...) to its flag.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "keys_in_prdt" => Some(Self::KEYS_IN_PRDT),
            "broken_crypto_enable" => Some(Self::BROKEN_CRYPTO_ENABLE),
            "crypto_disabled" => Some(Self::CRYPTO_DISABLED),
            _ => None,
        }
    }
}
