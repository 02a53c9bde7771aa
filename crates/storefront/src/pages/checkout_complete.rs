//! Order confirmation screen.

use super::{BasePage, InventoryPage, PageContext, PageObject, Screen};
use crate::locator::Locator;
use crate::result::StorefrontResult;
use async_trait::async_trait;

/// Order confirmation page object
#[derive(Debug, Clone)]
pub struct CheckoutCompletePage {
    base: BasePage,
}

impl CheckoutCompletePage {
    /// Wrap a session already showing the confirmation
    #[must_use]
    pub const fn new(ctx: PageContext) -> Self {
        Self {
            base: BasePage::new(ctx),
        }
    }

    /// Secondary header text, `"Checkout: Complete!"`
    pub async fn title(&self) -> StorefrontResult<String> {
        self.base.read_text(&Locator::class_name("title")).await
    }

    /// Confirmation headline, `"Thank you for your order!"`
    pub async fn complete_header(&self) -> StorefrontResult<String> {
        self.base
            .read_text(&Locator::class_name("complete-header"))
            .await
    }

    /// Return to the product list
    pub async fn back_home(self) -> StorefrontResult<InventoryPage> {
        self.base.click(&Locator::id("back-to-products")).await?;
        Ok(InventoryPage::new(self.base.context().clone()))
    }
}

#[async_trait]
impl PageObject for CheckoutCompletePage {
    const SCREEN: Screen = Screen::CheckoutComplete;

    fn base(&self) -> &BasePage {
        &self.base
    }
}
