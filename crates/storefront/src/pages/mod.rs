//! Page Object Model for the storefront.
//!
//! One type per screen. Every action returns the page object of the screen
//! the browser ends up on, so a flow reads as a chain of typed transitions:
//!
//! ```text
//! LoginPage ──login──► InventoryPage ◄──continue_shopping── CartPage
//!                          │  ▲                               ▲  │
//!                          │  └──────────back_home──────┐     │  │
//!                          └──────────go_to_cart────────┼─────┘  │
//!                                                       │        go_to_checkout
//! CheckoutCompletePage ◄──finish── CheckoutOverviewPage │        ▼
//!                                        ▲              │  CheckoutInfoPage
//!                                        └──continue_valid──────┘
//! ```
//!
//! Page objects hold no element state; every query re-reads the browser.

mod base;
mod cart;
mod checkout_complete;
mod checkout_info;
mod checkout_overview;
mod inventory;
mod login;
#[cfg(test)]
mod test_support;

pub use base::BasePage;
pub use cart::CartPage;
pub use checkout_complete::CheckoutCompletePage;
pub use checkout_info::CheckoutInfoPage;
pub use checkout_overview::CheckoutOverviewPage;
pub use inventory::InventoryPage;
pub use login::{LoginAttempt, LoginPage};

use crate::config::{join_url, SuiteConfig};
use crate::driver::SharedDriver;
use crate::wait::WaitOptions;
use async_trait::async_trait;
use std::fmt;

/// Storefront screens, the states of the navigation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Login form
    Login,
    /// Product list
    Inventory,
    /// Cart contents
    Cart,
    /// Checkout step one (shopper information)
    CheckoutInfo,
    /// Checkout step two (overview)
    CheckoutOverview,
    /// Order confirmation
    CheckoutComplete,
}

impl Screen {
    /// Every screen in flow order
    pub const ALL: [Self; 6] = [
        Self::Login,
        Self::Inventory,
        Self::Cart,
        Self::CheckoutInfo,
        Self::CheckoutOverview,
        Self::CheckoutComplete,
    ];

    /// Path relative to the storefront base URL
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Login => "",
            Self::Inventory => "inventory.html",
            Self::Cart => "cart.html",
            Self::CheckoutInfo => "checkout-step-one.html",
            Self::CheckoutOverview => "checkout-step-two.html",
            Self::CheckoutComplete => "checkout-complete.html",
        }
    }

    /// Text of the secondary header, where the screen has one
    #[must_use]
    pub const fn title(&self) -> Option<&'static str> {
        match self {
            Self::Login => None,
            Self::Inventory => Some("Products"),
            Self::Cart => Some("Your Cart"),
            Self::CheckoutInfo => Some("Checkout: Your Information"),
            Self::CheckoutOverview => Some("Checkout: Overview"),
            Self::CheckoutComplete => Some("Checkout: Complete!"),
        }
    }

    /// Identify the screen shown at `url`, given the storefront `base_url`.
    #[must_use]
    pub fn detect(base_url: &str, url: &str) -> Option<Self> {
        let base = base_url.trim_end_matches('/');
        let rest = url.strip_prefix(base)?;
        let path = rest
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_start_matches('/');
        Self::ALL.into_iter().find(|screen| screen.path() == path)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Inventory => "inventory",
            Self::Cart => "cart",
            Self::CheckoutInfo => "checkout step one",
            Self::CheckoutOverview => "checkout step two",
            Self::CheckoutComplete => "checkout complete",
        };
        f.write_str(name)
    }
}

/// What every page object carries: the session handle and wait policy.
#[derive(Clone)]
pub struct PageContext {
    driver: SharedDriver,
    wait: WaitOptions,
    base_url: String,
    force_overview_navigation: bool,
}

impl fmt::Debug for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("wait", &self.wait)
            .field("base_url", &self.base_url)
            .field("force_overview_navigation", &self.force_overview_navigation)
            .finish_non_exhaustive()
    }
}

impl PageContext {
    /// Build a context for `driver` from the suite configuration
    #[must_use]
    pub fn new(driver: SharedDriver, config: &SuiteConfig) -> Self {
        Self {
            driver,
            wait: config.wait_options(),
            base_url: config.base_url.clone(),
            force_overview_navigation: config.force_overview_navigation,
        }
    }

    /// Session handle
    #[must_use]
    pub fn driver(&self) -> &SharedDriver {
        &self.driver
    }

    /// Bounded-wait policy
    #[must_use]
    pub const fn wait(&self) -> &WaitOptions {
        &self.wait
    }

    /// Storefront base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether `continue_valid` navigates straight to the overview
    #[must_use]
    pub const fn force_overview_navigation(&self) -> bool {
        self.force_overview_navigation
    }

    /// Absolute address of `screen`
    #[must_use]
    pub fn url_of(&self, screen: Screen) -> String {
        join_url(&self.base_url, screen.path())
    }
}

/// Trait implemented by every screen's page object.
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Screen this page object represents
    const SCREEN: Screen;

    /// Element access layer bound to the session
    fn base(&self) -> &BasePage;

    /// Browser's current address
    async fn current_url(&self) -> String {
        self.base().current_url().await
    }

    /// Whether the browser is currently showing this page's screen
    async fn is_current(&self) -> bool {
        self.base().is_on(Self::SCREEN).await
    }
}
