use ice_core::CryptoBinding;
use ice_desc::{RequestDescriptorHeader, CCI_LIMIT};

/// Serializes a binding into the request descriptor header.
pub struct DescriptorEncoder;

impl DescriptorEncoder {
    /// Plaintext bindings leave the header's crypto fields untouched (zero).
    ///
    /// # Panics
    /// If the key slot does not fit the 8-bit `cci` field. The slot
    /// allocator guarantees it does; a wider index is a caller bug.
    #[inline]
    pub fn encode(binding: &CryptoBinding, header: &mut RequestDescriptorHeader) {
        let CryptoBinding::Inline { slot, data_unit_number } = *binding else {
            return;
        };
        assert!(
            slot.index() < CCI_LIMIT,
            "DescriptorEncoder: key slot {} does not fit the cci field",
            slot.index()
        );
        header.set_crypto(slot.index() as u8, data_unit_number);
    }
}
