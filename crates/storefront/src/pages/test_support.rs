//! Driver wrapper that injects transient failures into a simulated session.

use crate::config::SuiteConfig;
use crate::driver::{Driver, ElementHandle, Screenshot};
use crate::locator::Locator;
use crate::pages::PageContext;
use crate::result::{StorefrontError, StorefrontResult};
use crate::simulated::{SimulatedOptions, SimulatedStore};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Simulated session whose next few lookups, text reads or script clicks
/// fail as if the DOM changed underneath them.
#[derive(Debug)]
pub(crate) struct FlakyDriver {
    inner: Arc<SimulatedStore>,
    lookup_failures: AtomicU32,
    text_failures: AtomicU32,
    script_click_failures: AtomicU32,
    lookups: AtomicU32,
}

impl FlakyDriver {
    pub(crate) fn new(inner: Arc<SimulatedStore>) -> Self {
        Self {
            inner,
            lookup_failures: AtomicU32::new(0),
            text_failures: AtomicU32::new(0),
            script_click_failures: AtomicU32::new(0),
            lookups: AtomicU32::new(0),
        }
    }

    pub(crate) fn fail_lookups(&self, count: u32) {
        self.lookup_failures.store(count, Ordering::SeqCst);
    }

    pub(crate) fn fail_texts(&self, count: u32) {
        self.text_failures.store(count, Ordering::SeqCst);
    }

    pub(crate) fn fail_script_clicks(&self, count: u32) {
        self.script_click_failures.store(count, Ordering::SeqCst);
    }

    /// Lookups seen so far, failed ones included
    pub(crate) fn lookups(&self) -> u32 {
        self.lookups.load(Ordering::SeqCst)
    }

    fn take(budget: &AtomicU32) -> bool {
        budget
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn stale(element: &ElementHandle) -> StorefrontError {
        StorefrontError::StaleElement {
            id: element.id().to_string(),
        }
    }
}

#[async_trait]
impl Driver for FlakyDriver {
    async fn navigate(&self, url: &str) -> StorefrontResult<()> {
        self.inner.navigate(url).await
    }

    async fn current_url(&self) -> String {
        self.inner.current_url().await
    }

    async fn find_elements(&self, locator: &Locator) -> StorefrontResult<Vec<ElementHandle>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if Self::take(&self.lookup_failures) {
            return Err(StorefrontError::StaleElement {
                id: locator.to_string(),
            });
        }
        self.inner.find_elements(locator).await
    }

    async fn is_displayed(&self, element: &ElementHandle) -> StorefrontResult<bool> {
        self.inner.is_displayed(element).await
    }

    async fn is_interactable(&self, element: &ElementHandle) -> StorefrontResult<bool> {
        self.inner.is_interactable(element).await
    }

    async fn click(&self, element: &ElementHandle) -> StorefrontResult<()> {
        self.inner.click(element).await
    }

    async fn script_click(&self, element: &ElementHandle) -> StorefrontResult<()> {
        if Self::take(&self.script_click_failures) {
            return Err(Self::stale(element));
        }
        self.inner.script_click(element).await
    }

    async fn clear(&self, element: &ElementHandle) -> StorefrontResult<()> {
        self.inner.clear(element).await
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> StorefrontResult<()> {
        self.inner.send_keys(element, text).await
    }

    async fn text(&self, element: &ElementHandle) -> StorefrontResult<String> {
        if Self::take(&self.text_failures) {
            return Err(Self::stale(element));
        }
        self.inner.text(element).await
    }

    async fn screenshot(&self) -> StorefrontResult<Screenshot> {
        self.inner.screenshot().await
    }

    async fn close(&self) -> StorefrontResult<()> {
        self.inner.close().await
    }
}

/// Short-wait context over `driver`, already showing the login screen
pub(crate) async fn login_context(driver: Arc<dyn Driver>) -> PageContext {
    let config = SuiteConfig {
        timeout_ms: 1_000,
        poll_interval_ms: 100,
        ..SuiteConfig::default()
    };
    driver.navigate(&config.base_url).await.unwrap();
    PageContext::new(driver, &config)
}

/// Fresh simulated session with default behaviour
pub(crate) fn store() -> Arc<SimulatedStore> {
    Arc::new(SimulatedStore::new(SimulatedOptions::new()))
}
