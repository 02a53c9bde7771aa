//! Inventory screen.

use super::{BasePage, CartPage, PageContext, PageObject, Screen};
use crate::catalog::slugify;
use crate::locator::Locator;
use crate::result::StorefrontResult;
use async_trait::async_trait;
use tracing::{debug, info};

fn title() -> Locator {
    Locator::css(".header_container .title")
}

fn inventory_items() -> Locator {
    Locator::class_name("inventory_item")
}

fn item_names() -> Locator {
    Locator::class_name("inventory_item_name")
}

fn cart_link() -> Locator {
    Locator::class_name("shopping_cart_link")
}

fn cart_badge() -> Locator {
    Locator::class_name("shopping_cart_badge")
}

fn add_button(product: &str) -> Locator {
    Locator::data_test(&format!("add-to-cart-{}", slugify(product)))
}

fn remove_button(product: &str) -> Locator {
    Locator::data_test(&format!("remove-{}", slugify(product)))
}

/// Product list page object
#[derive(Debug, Clone)]
pub struct InventoryPage {
    base: BasePage,
}

impl InventoryPage {
    /// Wrap a session already showing the inventory
    #[must_use]
    pub const fn new(ctx: PageContext) -> Self {
        Self {
            base: BasePage::new(ctx),
        }
    }

    /// Secondary header text, `"Products"`
    pub async fn title(&self) -> StorefrontResult<String> {
        self.base.read_text(&title()).await
    }

    /// Number of product cards shown
    pub async fn item_count(&self) -> StorefrontResult<usize> {
        self.base.count(&inventory_items()).await
    }

    /// Product names in display order
    pub async fn item_names(&self) -> StorefrontResult<Vec<String>> {
        self.base.read_all_text(&item_names()).await
    }

    /// Add `product` to the cart and wait for its control to flip to remove.
    pub async fn add_item(&self, product: &str) -> StorefrontResult<&Self> {
        info!(product, "adding to cart");
        self.base.scripted_click(&add_button(product)).await?;
        self.base.wait_visible(&remove_button(product)).await?;
        Ok(self)
    }

    /// Take `product` back out of the cart
    pub async fn remove_item(&self, product: &str) -> StorefrontResult<&Self> {
        info!(product, "removing from cart");
        self.base.click(&remove_button(product)).await?;
        Ok(self)
    }

    /// Number on the cart badge; zero when no badge is shown.
    pub async fn cart_badge_count(&self) -> StorefrontResult<u32> {
        let badge = self.base.read_all_text(&cart_badge()).await?;
        let Some(text) = badge.first() else {
            return Ok(0);
        };
        let count = text.trim().parse().unwrap_or_else(|_| {
            debug!(text = %text, "cart badge is not a number");
            0
        });
        Ok(count)
    }

    /// Open the cart.
    pub async fn go_to_cart(self) -> StorefrontResult<CartPage> {
        self.base.scripted_click(&cart_link()).await?;
        let cart_url = self.base.context().url_of(Screen::Cart);
        self.base.wait_url(&cart_url).await?;
        Ok(CartPage::new(self.base.context().clone()))
    }
}

#[async_trait]
impl PageObject for InventoryPage {
    const SCREEN: Screen = Screen::Inventory;

    fn base(&self) -> &BasePage {
        &self.base
    }
}
