//! Storefront E2E: page-object end-to-end suite for the Swag Labs storefront.
//!
//! Scenarios log in, fill and empty the cart, and walk checkout through to
//! the order confirmation. Each screen is a page object whose actions return
//! the page object of the next screen; every element interaction runs inside
//! one bounded poll.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌────────────┐    ┌─────────────────────┐   │
//! │   │ Scenario   │    │ Page       │    │ Driver              │   │
//! │   │ (Harness)  │───►│ Objects    │───►│  CdpDriver (CDP)    │   │
//! │   │            │    │ (BasePage) │    │  SimulatedStore     │   │
//! │   └────────────┘    └────────────┘    └─────────────────────┘   │
//! │         │                                                       │
//! │         └──► FailureReporter (screenshot on failure)            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Live-site scenarios need the `browser` feature (on by default) and a
//! Chromium binary; [`simulated`] runs the same page objects in-process.

#![warn(missing_docs)]

#[cfg(feature = "browser")]
pub mod cdp;
pub mod catalog;
pub mod config;
pub mod driver;
pub mod harness;
pub mod locator;
pub mod logging;
pub mod pages;
pub mod reporter;
pub mod result;
pub mod simulated;
pub mod wait;

#[cfg(feature = "browser")]
pub use cdp::{CdpDriver, ChromiumProvider};
pub use catalog::{CheckoutInfo, Product, PRODUCTS};
pub use config::SuiteConfig;
pub use driver::{Driver, ElementHandle, Screenshot, SharedDriver};
pub use harness::{Harness, Marker, ReportFiles, ScenarioOutcome, SessionProvider};
pub use locator::{Locator, Strategy};
pub use logging::init_logging;
pub use pages::{
    BasePage, CartPage, CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage,
    InventoryPage, LoginAttempt, LoginPage, PageContext, PageObject, Screen,
};
pub use reporter::{FailureReporter, SuiteReport, TestResultEntry, TestStatus};
pub use result::{StorefrontError, StorefrontResult};
pub use simulated::{SimulatedOptions, SimulatedProvider, SimulatedStore};
pub use wait::{poll_until, WaitOptions, WaitResult};
