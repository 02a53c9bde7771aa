//! Login screen.

use super::{BasePage, InventoryPage, PageContext, PageObject, Screen};
use crate::locator::Locator;
use crate::result::{StorefrontError, StorefrontResult};
use async_trait::async_trait;
use tracing::{info, warn};

fn username_field() -> Locator {
    Locator::id("user-name")
}

fn password_field() -> Locator {
    Locator::id("password")
}

fn login_button() -> Locator {
    Locator::id("login-button")
}

fn error_banner() -> Locator {
    Locator::css("h3[data-test='error']")
}

/// Outcome of [`LoginPage::login_checked`]
#[derive(Debug)]
pub enum LoginAttempt {
    /// The storefront accepted the credentials
    Accepted(InventoryPage),
    /// The login screen is still shown
    Rejected {
        /// Login page, still usable for another attempt
        page: LoginPage,
        /// Error banner text, when one was rendered
        error: Option<String>,
    },
}

/// Login screen page object
#[derive(Debug, Clone)]
pub struct LoginPage {
    base: BasePage,
}

impl LoginPage {
    /// Wrap a session already showing the login screen
    #[must_use]
    pub const fn new(ctx: PageContext) -> Self {
        Self {
            base: BasePage::new(ctx),
        }
    }

    /// Load the storefront's login screen.
    pub async fn open(ctx: PageContext) -> StorefrontResult<Self> {
        let page = Self::new(ctx);
        let url = page.base.context().url_of(Screen::Login);
        page.base.navigate(&url).await?;
        Ok(page)
    }

    async fn submit(&self, username: &str, password: &str) -> StorefrontResult<()> {
        info!(username, "logging in");
        self.base.type_text(&username_field(), username).await?;
        self.base.type_text(&password_field(), password).await?;
        self.base.click(&login_button()).await
    }

    /// Submit credentials and move on to the inventory.
    ///
    /// Rejected credentials are not an error here: the returned page simply
    /// does not correspond to the screen shown. Use [`Self::login_checked`]
    /// when the outcome matters.
    pub async fn login(self, username: &str, password: &str) -> StorefrontResult<InventoryPage> {
        self.submit(username, password).await?;
        Ok(InventoryPage::new(self.base.context().clone()))
    }

    /// Submit credentials and report whether the inventory was reached.
    pub async fn login_checked(
        self,
        username: &str,
        password: &str,
    ) -> StorefrontResult<LoginAttempt> {
        self.submit(username, password).await?;

        let inventory_url = self.base.context().url_of(Screen::Inventory);
        let reached = self.base.wait_url(&inventory_url).await;
        match reached {
            Ok(()) => Ok(LoginAttempt::Accepted(InventoryPage::new(
                self.base.context().clone(),
            ))),
            Err(StorefrontError::Timeout { .. }) => {
                let error = match self.error_message().await {
                    Ok(text) => Some(text),
                    Err(e) if e.is_timeout() => None,
                    Err(e) => return Err(e),
                };
                warn!(username, error = ?error, "login rejected");
                Ok(LoginAttempt::Rejected { page: self, error })
            }
            Err(e) => Err(e),
        }
    }

    /// Text of the error banner
    pub async fn error_message(&self) -> StorefrontResult<String> {
        self.base.read_text(&error_banner()).await
    }
}

#[async_trait]
impl PageObject for LoginPage {
    const SCREEN: Screen = Screen::Login;

    fn base(&self) -> &BasePage {
        &self.base
    }
}
