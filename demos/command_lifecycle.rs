use std::sync::Arc;

use ufs_ice::ice_core::registers::encode_capability;
use ufs_ice::ice_core::{
    CryptContext, CryptoAlgorithm, CryptoBinding, CryptoCapability, CryptoKey, DataUnitSizes, KeySize,
    RegisterSnapshot, VendorCryptoOps, VendorFillError,
};
use ufs_ice::ice_desc::{DataDirection, ScatterGatherTable};
use ufs_ice::{CompletionStatus, Doorbell, HostConfig, HostController, IoRequest, KeySlot, Segment};

/// Stages the raw key in every entry's extension area.
struct KeyInPrdtVendor;

impl VendorCryptoOps for KeyInPrdtVendor {
    fn fill_crypto_prdt(
        &self,
        ctx: &CryptContext,
        _binding: &CryptoBinding,
        table: &mut ScatterGatherTable,
        sg_count: usize,
    ) -> Result<(), VendorFillError> {
        let key = ctx.key.raw();
        if key.len() > table.extension_size() {
            return Err(VendorFillError::KeyDoesNotFit {
                key_len: key.len(),
                extension: table.extension_size(),
            });
        }
        for idx in 0..sg_count {
            table.extension_mut(idx)[..key.len()].copy_from_slice(key);
        }
        Ok(())
    }
}

struct LogDoorbell;

impl Doorbell for LogDoorbell {
    fn ring(&self, tag: u32) {
        tracing::info!("doorbell rung for tag {}", tag);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = HostConfig::from_toml_str(
        r#"
        quirks = ["keys_in_prdt"]
        sg_entry_size = 64
        max_sg_entries = 16
        "#,
    )?;

    let aes_xts = CryptoCapability {
        algorithm: CryptoAlgorithm::AesXts,
        key_size: KeySize::Bits256,
        data_unit_sizes: DataUnitSizes::K4,
    };
    let regs = RegisterSnapshot {
        version: 0x0310,
        ccap: (31 << 8) | 1,
        capabilities: vec![encode_capability(&aes_xts)],
    };

    let controller = HostController::builder(config)
        .with_vendor(Arc::new(KeyInPrdtVendor))
        .attach(&regs)?;
    let mut pool = controller.command_pool(2);
    let doorbell = LogDoorbell;

    let key = CryptoKey::new(CryptoAlgorithm::AesXts, KeySize::Bits256, 4096, vec![0x3C; 32]);
    let encrypted = IoRequest::encrypted(
        DataDirection::HostToDevice,
        vec![Segment { addr: 0x8000_0000, len: 4096 }, Segment { addr: 0x8000_2000, len: 4096 }],
        KeySlot(3),
        Arc::new(CryptContext::new(key, 0x1_0000_0005)),
    );
    let inflight = controller.submit(pool.slot_mut(0), &encrypted, &doorbell)?;
    let header = inflight.command().header();
    println!(
        "encrypted: enable={} cci={} dunl={:#010x} dunu={:#010x}",
        header.crypto_enabled(),
        header.cci(),
        header.dunl(),
        header.dunu()
    );
    println!("  clear: {:?}", inflight.complete(CompletionStatus::Success));

    let plaintext = IoRequest::plaintext(DataDirection::DeviceToHost, vec![Segment { addr: 0x9000_0000, len: 512 }]);
    let inflight = controller.submit(pool.slot_mut(1), &plaintext, &doorbell)?;
    println!("plaintext: crypto fields clear={}", inflight.command().header().crypto_fields_clear());
    println!("  clear: {:?}", inflight.complete(CompletionStatus::Success));

    Ok(())
}
