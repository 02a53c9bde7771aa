//! Cart screen.

use super::{BasePage, CheckoutInfoPage, InventoryPage, PageContext, PageObject, Screen};
use crate::catalog::slugify;
use crate::locator::Locator;
use crate::result::StorefrontResult;
use async_trait::async_trait;
use tracing::info;

/// Cart page object
#[derive(Debug, Clone)]
pub struct CartPage {
    base: BasePage,
}

impl CartPage {
    /// Wrap a session already showing the cart
    #[must_use]
    pub const fn new(ctx: PageContext) -> Self {
        Self {
            base: BasePage::new(ctx),
        }
    }

    /// Secondary header text, `"Your Cart"`
    pub async fn title(&self) -> StorefrontResult<String> {
        self.base.read_text(&Locator::class_name("title")).await
    }

    /// Number of cart rows; zero for an empty cart.
    pub async fn item_count(&self) -> StorefrontResult<usize> {
        self.base.count(&Locator::class_name("cart_item")).await
    }

    /// Product names of the cart rows
    pub async fn item_names(&self) -> StorefrontResult<Vec<String>> {
        self.base
            .read_all_text(&Locator::css(".cart_item .inventory_item_name"))
            .await
    }

    /// Remove `product` from the cart
    pub async fn remove_item(&self, product: &str) -> StorefrontResult<&Self> {
        info!(product, "removing from cart");
        let remove = Locator::data_test(&format!("remove-{}", slugify(product)));
        self.base.scripted_click(&remove).await?;
        Ok(self)
    }

    /// Start checkout
    pub async fn go_to_checkout(self) -> StorefrontResult<CheckoutInfoPage> {
        self.base.scripted_click(&Locator::id("checkout")).await?;
        Ok(CheckoutInfoPage::new(self.base.context().clone()))
    }

    /// Back to the product list
    pub async fn continue_shopping(self) -> StorefrontResult<InventoryPage> {
        self.base.click(&Locator::id("continue-shopping")).await?;
        Ok(InventoryPage::new(self.base.context().clone()))
    }
}

#[async_trait]
impl PageObject for CartPage {
    const SCREEN: Screen = Screen::Cart;

    fn base(&self) -> &BasePage {
        &self.base
    }
}
