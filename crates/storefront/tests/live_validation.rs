//! Checkout form validation against the live storefront.

#![cfg(feature = "browser")]

mod common;

use storefront::Marker;

#[tokio::test]
#[ignore = "requires Chromium and network access"]
async fn test_checkout_with_missing_info() {
    let harness = common::live_harness();
    harness
        .run(
            "test_checkout_with_missing_info",
            Marker::Validation,
            common::checkout_with_missing_info,
        )
        .await
        .assert_passed();
}
