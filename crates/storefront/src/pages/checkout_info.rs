//! Checkout step one: shopper information.

use super::{BasePage, CartPage, CheckoutOverviewPage, PageContext, PageObject, Screen};
use crate::catalog::CheckoutInfo;
use crate::locator::Locator;
use crate::result::StorefrontResult;
use async_trait::async_trait;
use tracing::info;

fn continue_button() -> Locator {
    Locator::id("continue")
}

/// Checkout information form page object
#[derive(Debug, Clone)]
pub struct CheckoutInfoPage {
    base: BasePage,
}

impl CheckoutInfoPage {
    /// Wrap a session already showing checkout step one
    #[must_use]
    pub const fn new(ctx: PageContext) -> Self {
        Self {
            base: BasePage::new(ctx),
        }
    }

    /// Secondary header text, `"Checkout: Your Information"`
    pub async fn title(&self) -> StorefrontResult<String> {
        self.base.read_text(&Locator::class_name("title")).await
    }

    /// Fill the three form fields. Empty strings leave a field blank.
    pub async fn fill_information(
        &self,
        first_name: &str,
        last_name: &str,
        postal_code: &str,
    ) -> StorefrontResult<&Self> {
        info!(first_name, last_name, postal_code, "filling checkout information");
        self.base.type_text(&Locator::id("first-name"), first_name).await?;
        self.base.type_text(&Locator::id("last-name"), last_name).await?;
        self.base.type_text(&Locator::id("postal-code"), postal_code).await?;
        Ok(self)
    }

    /// [`Self::fill_information`] from a [`CheckoutInfo`]
    pub async fn fill(&self, info: &CheckoutInfo) -> StorefrontResult<&Self> {
        self.fill_information(&info.first_name, &info.last_name, &info.postal_code)
            .await
    }

    /// Submit a valid form and move on to the overview.
    ///
    /// With forced navigation enabled the overview address is loaded directly
    /// after the click; otherwise the click must lead there within the wait.
    pub async fn continue_valid(self) -> StorefrontResult<CheckoutOverviewPage> {
        self.base.click(&continue_button()).await?;

        let ctx = self.base.context();
        let overview_url = ctx.url_of(Screen::CheckoutOverview);
        if ctx.force_overview_navigation() {
            self.base.navigate(&overview_url).await?;
        } else {
            self.base.wait_url(&overview_url).await?;
        }
        Ok(CheckoutOverviewPage::new(ctx.clone()))
    }

    /// Submit a form expected to fail validation; stays on this screen.
    pub async fn continue_expect_error(&self) -> StorefrontResult<&Self> {
        self.base.scripted_click(&continue_button()).await?;
        Ok(self)
    }

    /// Text of the validation error banner
    pub async fn error_message(&self) -> StorefrontResult<String> {
        self.base.read_text(&Locator::css("h3[data-test='error']")).await
    }

    /// Abandon checkout and return to the cart
    pub async fn cancel(self) -> StorefrontResult<CartPage> {
        self.base.click(&Locator::id("cancel")).await?;
        Ok(CartPage::new(self.base.context().clone()))
    }
}

#[async_trait]
impl PageObject for CheckoutInfoPage {
    const SCREEN: Screen = Screen::CheckoutInfo;

    fn base(&self) -> &BasePage {
        &self.base
    }
}
