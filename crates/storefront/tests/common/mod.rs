//! Scenario bodies shared by the simulated and live suites.
//!
//! Each scenario takes the [`PageContext`] the harness hands it and asserts
//! with the standard macros; a failed assertion panics, which the harness
//! turns into a screenshot plus teardown before re-raising it.

#![allow(dead_code)]

use std::sync::Arc;
use storefront::catalog::{BACKPACK, BIKE_LIGHT};
use storefront::{
    CheckoutInfo, Harness, InventoryPage, LoginPage, PageContext, PageObject, SessionProvider,
    SimulatedOptions, SimulatedProvider, StorefrontResult, SuiteConfig,
};
use tempfile::TempDir;

pub const VALID_USER: &str = "standard_user";
pub const VALID_PASSWORD: &str = "secret_sauce";
pub const INVALID_PASSWORD: &str = "wrong_password";
pub const LOCKED_OUT_USER: &str = "locked_out_user";

pub const CREDENTIALS_MISMATCH: &str =
    "Epic sadface: Username and password do not match any user in this service";
pub const LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out.";
pub const FIRST_NAME_REQUIRED: &str = "Error: First Name is required";

// =============================================================================
// Harness construction
// =============================================================================

/// Simulated-store harness with short waits and a private artifacts dir
pub fn simulated_harness(options: SimulatedOptions) -> (Harness, Arc<SimulatedProvider>, TempDir) {
    simulated_harness_with(options, SuiteConfig::default())
}

/// Like [`simulated_harness`], starting from `config`
pub fn simulated_harness_with(
    options: SimulatedOptions,
    config: SuiteConfig,
) -> (Harness, Arc<SimulatedProvider>, TempDir) {
    storefront::init_logging(false);
    let artifacts = tempfile::tempdir().expect("artifacts dir");
    let provider = Arc::new(SimulatedProvider::new(options));
    let config = SuiteConfig {
        timeout_ms: 2_000,
        poll_interval_ms: 100,
        artifacts_dir: artifacts.path().to_path_buf(),
        ..config
    };
    let sessions: Arc<dyn SessionProvider> = provider.clone();
    (Harness::new(sessions, config), provider, artifacts)
}

/// Harness launching Chromium per the environment's configuration
#[cfg(feature = "browser")]
pub fn live_harness() -> Harness {
    let config = SuiteConfig::resolve().expect("suite configuration");
    storefront::init_logging(config.json_logs);
    let provider = Arc::new(storefront::ChromiumProvider::new(config.clone()));
    Harness::new(provider, config)
}

// =============================================================================
// Scenario bodies
// =============================================================================

async fn logged_in(ctx: PageContext) -> StorefrontResult<InventoryPage> {
    LoginPage::open(ctx)
        .await?
        .login(VALID_USER, VALID_PASSWORD)
        .await
}

pub async fn successful_login(ctx: PageContext) -> StorefrontResult<()> {
    let inventory = logged_in(ctx).await?;
    assert_eq!(inventory.title().await?, "Products", "Failed to log in successfully.");
    assert!(inventory.is_current().await);
    Ok(())
}

pub async fn add_single_item_to_cart(ctx: PageContext) -> StorefrontResult<()> {
    let inventory = logged_in(ctx).await?;
    inventory.add_item(BACKPACK).await?;
    assert_eq!(inventory.cart_badge_count().await?, 1, "Cart badge count is not 1.");

    let cart = inventory.go_to_cart().await?;
    assert_eq!(cart.item_count().await?, 1, "Item was not added to the cart.");
    assert_eq!(cart.item_names().await?, vec![BACKPACK.to_string()]);
    Ok(())
}

pub async fn add_multiple_items_to_cart(ctx: PageContext) -> StorefrontResult<()> {
    let inventory = logged_in(ctx).await?;
    inventory.add_item(BACKPACK).await?.add_item(BIKE_LIGHT).await?;
    assert_eq!(inventory.cart_badge_count().await?, 2, "Cart badge count is not 2.");

    let cart = inventory.go_to_cart().await?;
    assert_eq!(cart.item_count().await?, 2, "Not all items were added to the cart.");
    Ok(())
}

pub async fn add_then_remove_on_inventory(ctx: PageContext) -> StorefrontResult<()> {
    let inventory = logged_in(ctx).await?;
    assert_eq!(inventory.cart_badge_count().await?, 0);
    inventory.add_item(BIKE_LIGHT).await?;
    assert_eq!(inventory.cart_badge_count().await?, 1);
    inventory.remove_item(BIKE_LIGHT).await?;
    assert_eq!(inventory.cart_badge_count().await?, 0, "Badge still shown after removal.");
    Ok(())
}

pub async fn remove_item_from_cart(ctx: PageContext) -> StorefrontResult<()> {
    let inventory = logged_in(ctx).await?;
    inventory.add_item(BACKPACK).await?;
    assert_eq!(
        inventory.cart_badge_count().await?,
        1,
        "Precondition failed: Item not added."
    );

    let cart = inventory.go_to_cart().await?;
    cart.remove_item(BACKPACK).await?;
    assert_eq!(cart.item_count().await?, 0, "Item was not removed from the cart.");
    Ok(())
}

pub async fn successful_checkout(ctx: PageContext) -> StorefrontResult<()> {
    let inventory = logged_in(ctx).await?;
    inventory.add_item(BACKPACK).await?;

    let checkout = inventory.go_to_cart().await?.go_to_checkout().await?;
    checkout.fill(&CheckoutInfo::default()).await?;
    let overview = checkout.continue_valid().await?;
    assert_eq!(
        overview.title().await?,
        "Checkout: Overview",
        "Failed to proceed to checkout overview."
    );

    let complete = overview.finish().await?;
    assert_eq!(
        complete.title().await?,
        "Checkout: Complete!",
        "Checkout was not completed."
    );
    assert_eq!(
        complete.complete_header().await?,
        "Thank you for your order!",
        "Final confirmation message is incorrect."
    );
    Ok(())
}

pub async fn login_with_invalid_password(ctx: PageContext) -> StorefrontResult<()> {
    let login = LoginPage::open(ctx).await?;
    let landed = login.clone().login(VALID_USER, INVALID_PASSWORD).await?;
    assert!(
        !landed.current_url().await.contains("inventory.html"),
        "User was logged in with an invalid password."
    );
    assert_eq!(login.error_message().await?, CREDENTIALS_MISMATCH);
    Ok(())
}

pub async fn locked_out_user(ctx: PageContext) -> StorefrontResult<()> {
    let attempt = LoginPage::open(ctx)
        .await?
        .login_checked(LOCKED_OUT_USER, VALID_PASSWORD)
        .await?;
    match attempt {
        storefront::LoginAttempt::Rejected { error, .. } => {
            assert_eq!(error.as_deref(), Some(LOCKED_OUT));
        }
        storefront::LoginAttempt::Accepted(_) => panic!("locked-out user reached the inventory"),
    }
    Ok(())
}

pub async fn checkout_with_missing_info(ctx: PageContext) -> StorefrontResult<()> {
    let inventory = logged_in(ctx).await?;
    inventory.add_item(BACKPACK).await?;

    let checkout = inventory.go_to_cart().await?.go_to_checkout().await?;
    checkout.continue_expect_error().await?;

    assert_eq!(
        checkout.error_message().await?,
        FIRST_NAME_REQUIRED,
        "The error message for missing first name is incorrect."
    );
    assert!(
        !checkout.current_url().await.contains("checkout-step-two.html"),
        "User was incorrectly advanced to the next checkout step."
    );
    Ok(())
}
