//! # PRDT Key Handler Tests
//!
//! When key material is staged in the PRDT, when it is wiped, and how
//! vendor failures surface.

mod common;

use std::sync::Arc;

use common::{crypt_ctx, standard_table, FakeVendor};
use ufs_ice::ice_core::VendorFillError;
use ufs_ice::ice_crypto::{ClearOutcome, FillOutcome, PrdtKeyHandler};
use ufs_ice::ice_desc::ScatterGatherTable;
use ufs_ice::{ControllerContext, ControllerQuirks, CryptoBinding, KeySlot};

const ENTRY_SIZE: usize = 64;

fn encrypted() -> CryptoBinding {
    CryptoBinding::Inline {
        slot: KeySlot(3),
        data_unit_number: 0x1_0000_0005,
    }
}

fn keys_in_prdt_ctx(vendor: Arc<FakeVendor>) -> ControllerContext {
    ControllerContext::new(Some(standard_table()), ControllerQuirks::KEYS_IN_PRDT).with_vendor(vendor)
}

#[test]
fn test_fill_delegates_to_vendor() {
    let vendor = Arc::new(FakeVendor::default());
    let ctx = keys_in_prdt_ctx(vendor.clone());
    let crypt = crypt_ctx(5);
    let mut table = ScatterGatherTable::new(ENTRY_SIZE, 8);

    let outcome = PrdtKeyHandler::fill(&ctx, &encrypted(), Some(&*crypt), &mut table, 3).unwrap();
    assert_eq!(outcome, FillOutcome::Filled);
    assert_eq!(vendor.calls(), 1);
    assert_eq!(&table.extension(2)[..32], &[0xA5; 32]);
    assert!(table.extension(3).iter().all(|b| *b == 0), "entries past sg_count untouched");
}

#[test]
fn test_fill_skips_without_crypt_context_or_vendor() {
    let vendor = Arc::new(FakeVendor::default());
    let ctx = keys_in_prdt_ctx(vendor.clone());
    let mut table = ScatterGatherTable::new(ENTRY_SIZE, 8);

    assert_eq!(
        PrdtKeyHandler::fill(&ctx, &encrypted(), None, &mut table, 3),
        Ok(FillOutcome::Skipped)
    );

    let no_vendor = ControllerContext::new(Some(standard_table()), ControllerQuirks::KEYS_IN_PRDT);
    let crypt = crypt_ctx(5);
    assert_eq!(
        PrdtKeyHandler::fill(&no_vendor, &encrypted(), Some(&*crypt), &mut table, 3),
        Ok(FillOutcome::Skipped)
    );
    assert_eq!(vendor.calls(), 0);
    assert!(table.is_scrubbed(8));
}

/// Plaintext commands and inert controllers never reach the vendor.
#[test]
fn test_fill_skips_plaintext_and_inert_controller() {
    let vendor = Arc::new(FakeVendor::default());
    let crypt = crypt_ctx(5);
    let mut table = ScatterGatherTable::new(ENTRY_SIZE, 8);

    let ctx = keys_in_prdt_ctx(vendor.clone());
    assert_eq!(
        PrdtKeyHandler::fill(&ctx, &CryptoBinding::Plaintext, Some(&*crypt), &mut table, 3),
        Ok(FillOutcome::Skipped)
    );

    let inert = ControllerContext::new(
        Some(standard_table()),
        ControllerQuirks::KEYS_IN_PRDT | ControllerQuirks::CRYPTO_DISABLED,
    )
    .with_vendor(vendor.clone());
    assert_eq!(
        PrdtKeyHandler::fill(&inert, &encrypted(), Some(&*crypt), &mut table, 3),
        Ok(FillOutcome::Skipped)
    );
    assert_eq!(vendor.calls(), 0);
}

#[test]
fn test_fill_propagates_vendor_error() {
    let vendor = Arc::new(FakeVendor::failing_after(1));
    let ctx = keys_in_prdt_ctx(vendor);
    let crypt = crypt_ctx(5);
    let mut table = ScatterGatherTable::new(ENTRY_SIZE, 8);

    let result = PrdtKeyHandler::fill(&ctx, &encrypted(), Some(&*crypt), &mut table, 3);
    assert_eq!(result, Err(VendorFillError::ResourceExhausted));
    // Partial state: entry 0 got key bytes before the failure.
    assert!(!table.is_scrubbed(3));

    assert_eq!(PrdtKeyHandler::clear(&ctx, true, &mut table, 3), ClearOutcome::Scrubbed(3 * ENTRY_SIZE));
    assert!(table.is_scrubbed(3));
}

#[test]
fn test_fill_rejects_key_wider_than_extension() {
    let vendor = Arc::new(FakeVendor::default());
    let ctx = keys_in_prdt_ctx(vendor);
    let crypt = crypt_ctx(5);
    let mut table = ScatterGatherTable::new(32, 8);

    let result = PrdtKeyHandler::fill(&ctx, &encrypted(), Some(&*crypt), &mut table, 1);
    assert_eq!(
        result,
        Err(VendorFillError::KeyDoesNotFit {
            key_len: 32,
            extension: 16
        })
    );
}

#[test]
#[should_panic(expected = "exceeds the 2-entry table")]
fn test_fill_sg_count_beyond_table_panics() {
    let ctx = keys_in_prdt_ctx(Arc::new(FakeVendor::default()));
    let crypt = crypt_ctx(5);
    let mut table = ScatterGatherTable::new(ENTRY_SIZE, 2);
    let _ = PrdtKeyHandler::fill(&ctx, &encrypted(), Some(&*crypt), &mut table, 3);
}

#[test]
fn test_clear_requires_quirk_and_crypt_context() {
    let mut table = ScatterGatherTable::new(ENTRY_SIZE, 4);
    table.extension_mut(0).fill(0x5a);

    let no_quirk = ControllerContext::new(Some(standard_table()), ControllerQuirks::empty());
    assert_eq!(PrdtKeyHandler::clear(&no_quirk, true, &mut table, 1), ClearOutcome::Skipped);
    assert!(!table.is_scrubbed(1));

    let quirk = ControllerContext::new(Some(standard_table()), ControllerQuirks::KEYS_IN_PRDT);
    assert_eq!(PrdtKeyHandler::clear(&quirk, false, &mut table, 1), ClearOutcome::Skipped);
    assert!(!table.is_scrubbed(1));

    assert_eq!(PrdtKeyHandler::clear(&quirk, true, &mut table, 1), ClearOutcome::Scrubbed(ENTRY_SIZE));
    assert!(table.is_scrubbed(1));
}

/// Scrubbing an already-zeroed region is harmless.
#[test]
fn test_clear_is_idempotent() {
    let ctx = ControllerContext::new(Some(standard_table()), ControllerQuirks::KEYS_IN_PRDT);
    let mut table = ScatterGatherTable::new(ENTRY_SIZE, 4);
    table.extension_mut(1).fill(0x11);

    assert_eq!(PrdtKeyHandler::clear(&ctx, true, &mut table, 2), ClearOutcome::Scrubbed(128));
    assert_eq!(PrdtKeyHandler::clear(&ctx, true, &mut table, 2), ClearOutcome::Scrubbed(128));
    assert!(table.is_scrubbed(4));
}

#[test]
fn test_scrub_policy_without_quirk() {
    let ctx = ControllerContext::new(Some(standard_table()), ControllerQuirks::empty()).with_scrub_without_quirk(true);
    let mut table = ScatterGatherTable::new(ENTRY_SIZE, 4);
    table.extension_mut(0).fill(0x77);

    assert_eq!(PrdtKeyHandler::clear(&ctx, true, &mut table, 1), ClearOutcome::Scrubbed(ENTRY_SIZE));
    assert!(table.is_scrubbed(1));
    assert_eq!(PrdtKeyHandler::clear(&ctx, false, &mut table, 1), ClearOutcome::Skipped);
}
