//! Checkout step two: order overview.

use super::{BasePage, CheckoutCompletePage, PageContext, PageObject, Screen};
use crate::locator::Locator;
use crate::result::StorefrontResult;
use async_trait::async_trait;

/// Order overview page object
#[derive(Debug, Clone)]
pub struct CheckoutOverviewPage {
    base: BasePage,
}

impl CheckoutOverviewPage {
    /// Wrap a session already showing checkout step two
    #[must_use]
    pub const fn new(ctx: PageContext) -> Self {
        Self {
            base: BasePage::new(ctx),
        }
    }

    /// Secondary header text, `"Checkout: Overview"`
    pub async fn title(&self) -> StorefrontResult<String> {
        self.base.read_text(&Locator::class_name("title")).await
    }

    /// Product names in the order summary
    pub async fn item_names(&self) -> StorefrontResult<Vec<String>> {
        self.base
            .read_all_text(&Locator::css(".cart_item .inventory_item_name"))
            .await
    }

    /// Total line, e.g. `"Total: $32.39"`
    pub async fn total_label(&self) -> StorefrontResult<String> {
        self.base
            .read_text(&Locator::class_name("summary_total_label"))
            .await
    }

    /// Place the order
    pub async fn finish(self) -> StorefrontResult<CheckoutCompletePage> {
        self.base.scripted_click(&Locator::id("finish")).await?;
        Ok(CheckoutCompletePage::new(self.base.context().clone()))
    }
}

#[async_trait]
impl PageObject for CheckoutOverviewPage {
    const SCREEN: Screen = Screen::CheckoutOverview;

    fn base(&self) -> &BasePage {
        &self.base
    }
}
