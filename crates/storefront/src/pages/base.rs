//! Element access layer.
//!
//! Every lookup and interaction runs inside a single [`poll_until`] window
//! sized by the context's [`WaitOptions`]. Expired windows become
//! [`StorefrontError::NotFound`] or [`StorefrontError::NotClickable`] carrying
//! the locator and the wait duration. A lookup or handle that raced a DOM
//! change counts as "not yet" inside a window.

use super::{PageContext, Screen};
use crate::driver::{Driver, ElementHandle};
use crate::locator::Locator;
use crate::result::{StorefrontError, StorefrontResult};
use crate::wait::{poll_until, WaitOptions};
use tracing::{debug, error, info};

/// Element access layer shared by all page objects
#[derive(Debug, Clone)]
pub struct BasePage {
    ctx: PageContext,
}

impl BasePage {
    /// Bind the access layer to a session
    #[must_use]
    pub const fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    /// Session context
    #[must_use]
    pub const fn context(&self) -> &PageContext {
        &self.ctx
    }

    fn driver(&self) -> &dyn Driver {
        self.ctx.driver().as_ref()
    }

    const fn wait(&self) -> &WaitOptions {
        self.ctx.wait()
    }

    /// Load `url` in the session
    pub async fn navigate(&self, url: &str) -> StorefrontResult<()> {
        info!(url, "navigating");
        self.driver().navigate(url).await
    }

    /// First element matching `locator`, waiting for it to appear.
    pub async fn find_one(&self, locator: &Locator) -> StorefrontResult<ElementHandle> {
        info!(%locator, "finding element");
        let driver = self.driver();
        let waited = poll_until(self.wait(), move || async move {
            Ok(matches(driver, locator).await?.into_iter().next())
        })
        .await?;

        match waited.value {
            Some(element) => {
                info!(%locator, polls = waited.polls, "element found");
                Ok(element)
            }
            None => Err(self.not_found(locator)),
        }
    }

    /// Every element matching `locator`, waiting for at least one.
    pub async fn find_all(&self, locator: &Locator) -> StorefrontResult<Vec<ElementHandle>> {
        info!(%locator, "finding elements");
        let elements = self.poll_matches(locator).await?;
        match elements {
            Some(elements) => {
                info!(%locator, count = elements.len(), "elements found");
                Ok(elements)
            }
            None => Err(self.not_found(locator)),
        }
    }

    /// Number of elements matching `locator`; zero when none appear in time.
    pub async fn count(&self, locator: &Locator) -> StorefrontResult<usize> {
        info!(%locator, "counting elements");
        let count = self.poll_matches(locator).await?.map_or(0, |found| found.len());
        info!(%locator, count, "elements counted");
        Ok(count)
    }

    async fn poll_matches(&self, locator: &Locator) -> StorefrontResult<Option<Vec<ElementHandle>>> {
        let driver = self.driver();
        let waited = poll_until(self.wait(), move || async move {
            let found = matches(driver, locator).await?;
            Ok((!found.is_empty()).then_some(found))
        })
        .await?;
        Ok(waited.value)
    }

    /// Rendered text of every matching element; empty when none appear in time.
    ///
    /// Elements removed between the lookup and the read are left out.
    pub async fn read_all_text(&self, locator: &Locator) -> StorefrontResult<Vec<String>> {
        info!(%locator, "reading text of all elements");
        let Some(elements) = self.poll_matches(locator).await? else {
            return Ok(Vec::new());
        };
        let mut texts = Vec::with_capacity(elements.len());
        for element in &elements {
            match self.driver().text(element).await {
                Ok(text) => texts.push(text),
                Err(StorefrontError::StaleElement { .. }) => {
                    debug!(%element, "element removed before its text was read");
                }
                Err(e) => {
                    error!(%locator, error = %e, "reading text failed");
                    return Err(StorefrontError::action(locator, "read text of", e));
                }
            }
        }
        Ok(texts)
    }

    /// Wait until the element is present and displayed.
    pub async fn wait_visible(&self, locator: &Locator) -> StorefrontResult<ElementHandle> {
        info!(%locator, "waiting for visibility");
        let driver = self.driver();
        let waited = poll_until(self.wait(), move || async move {
            let Some(element) = matches(driver, locator).await?.into_iter().next() else {
                return Ok(None);
            };
            match driver.is_displayed(&element).await {
                Ok(true) => Ok(Some(element)),
                Ok(false) | Err(StorefrontError::StaleElement { .. }) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await?;

        match waited.value {
            Some(element) => {
                info!(%locator, "element visible");
                Ok(element)
            }
            None => Err(self.not_found(locator)),
        }
    }

    /// Native click once the element is present and interactable.
    pub async fn click(&self, locator: &Locator) -> StorefrontResult<()> {
        info!(%locator, "clicking element");
        let driver = self.driver();
        let waited = poll_until(self.wait(), move || async move {
            let Some(element) = matches(driver, locator).await?.into_iter().next() else {
                return Ok(None);
            };
            match driver.is_interactable(&element).await {
                Ok(true) => Ok(Some(element)),
                Ok(false) | Err(StorefrontError::StaleElement { .. }) => {
                    debug!(%element, "not yet clickable");
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await?;

        let Some(element) = waited.value else {
            let timeout_ms = self.wait().timeout_ms;
            error!(%locator, timeout_ms, "element not clickable");
            return Err(StorefrontError::NotClickable {
                locator: locator.to_string(),
                timeout_ms,
            });
        };

        driver.click(&element).await.map_err(|e| {
            error!(%locator, error = %e, "click failed");
            StorefrontError::action(locator, "click", e)
        })?;
        info!(%locator, "clicked");
        Ok(())
    }

    /// Click dispatched from page script; skips the interactability check.
    pub async fn scripted_click(&self, locator: &Locator) -> StorefrontResult<()> {
        info!(%locator, "script-clicking element");
        let element = self.find_one(locator).await?;
        self.driver().script_click(&element).await.map_err(|e| {
            error!(%locator, error = %e, "script click failed");
            StorefrontError::action(locator, "script-click", e)
        })?;
        info!(%locator, "script-clicked");
        Ok(())
    }

    /// Replace the element's content with `text`.
    pub async fn type_text(&self, locator: &Locator, text: &str) -> StorefrontResult<()> {
        info!(%locator, chars = text.chars().count(), "typing into element");
        let element = self.find_one(locator).await?;
        let driver = self.driver();

        let typed = async {
            driver.clear(&element).await?;
            driver.send_keys(&element, text).await
        };
        typed.await.map_err(|e| {
            error!(%locator, error = %e, "typing failed");
            StorefrontError::action(locator, "type into", e)
        })?;
        info!(%locator, "typed");
        Ok(())
    }

    /// Rendered text of the first matching element
    pub async fn read_text(&self, locator: &Locator) -> StorefrontResult<String> {
        info!(%locator, "reading text");
        let element = self.find_one(locator).await?;
        let text = self.driver().text(&element).await.map_err(|e| {
            error!(%locator, error = %e, "reading text failed");
            StorefrontError::action(locator, "read text of", e)
        })?;
        info!(%locator, text = %text, "text read");
        Ok(text)
    }

    /// Browser's current address
    pub async fn current_url(&self) -> String {
        let url = self.driver().current_url().await;
        debug!(url = %url, "current url");
        url
    }

    /// Wait until the browser's address equals `url`.
    pub async fn wait_url(&self, url: &str) -> StorefrontResult<()> {
        info!(url, "waiting for url");
        let driver = self.driver();
        let waited = poll_until(self.wait(), move || async move {
            Ok((driver.current_url().await == url).then_some(()))
        })
        .await?;

        if waited.is_success() {
            info!(url, "url reached");
            return Ok(());
        }
        let timeout_ms = self.wait().timeout_ms;
        error!(url, timeout_ms, current = %driver.current_url().await, "url not reached");
        Err(StorefrontError::Timeout {
            waited_for: format!("url {url}"),
            timeout_ms,
        })
    }

    /// Whether the browser currently shows `screen`
    pub async fn is_on(&self, screen: Screen) -> bool {
        let url = self.current_url().await;
        Screen::detect(self.ctx.base_url(), &url) == Some(screen)
    }

    fn not_found(&self, locator: &Locator) -> StorefrontError {
        let timeout_ms = self.wait().timeout_ms;
        error!(%locator, timeout_ms, "element not found");
        StorefrontError::NotFound {
            locator: locator.to_string(),
            timeout_ms,
        }
    }
}

/// Current matches for `locator`; a lookup that raced a DOM change is no match.
async fn matches(driver: &dyn Driver, locator: &Locator) -> StorefrontResult<Vec<ElementHandle>> {
    match driver.find_elements(locator).await {
        Err(StorefrontError::StaleElement { id }) => {
            debug!(%locator, id, "lookup raced a DOM change");
            Ok(Vec::new())
        }
        found => found,
    }
}
