//! Chromium driver over the DevTools protocol.
//!
//! [`CdpDriver`] launches a dedicated Chromium per session with a throwaway
//! profile whose preferences switch off the password manager, so credential
//! prompts never cover the storefront. Raw lookups honour an implicit wait
//! before reporting an empty match. Element handles live in a registry keyed
//! by document: a lookup on a new address drops every older handle, and a
//! repeated lookup replaces the handles of the same locator.

use crate::config::SuiteConfig;
use crate::driver::{Driver, ElementHandle, Screenshot, SharedDriver};
use crate::harness::SessionProvider;
use crate::locator::{Locator, Strategy};
use crate::result::{StorefrontError, StorefrontResult};
use crate::wait::{poll_until, WaitOptions};
use async_trait::async_trait;
use base64::Engine as _;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, CaptureScreenshotParams};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Launch window size
pub const WINDOW_SIZE: (u32, u32) = (1920, 1080);

const BLANK_URL: &str = "about:blank";

const IS_DISPLAYED_JS: &str = "function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
}";

const IS_INTERACTABLE_JS: &str = "function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    if (rect.width === 0 || rect.height === 0) return false;
    if (style.visibility === 'hidden' || style.display === 'none') return false;
    if (this.disabled) return false;
    this.scrollIntoView({block: 'center', inline: 'center'});
    const box = this.getBoundingClientRect();
    const top = document.elementFromPoint(box.left + box.width / 2, box.top + box.height / 2);
    return top !== null && (top === this || this.contains(top));
}";

const SCRIPT_CLICK_JS: &str = "function() { this.click(); }";

const CLEAR_JS: &str = "function() {
    const proto = Object.getPrototypeOf(this);
    const descriptor = Object.getOwnPropertyDescriptor(proto, 'value');
    if (descriptor && descriptor.set) { descriptor.set.call(this, ''); } else { this.value = ''; }
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
}";

/// Write profile preferences that disable credential saving and the
/// password manager into `user_data_dir`.
pub fn write_profile_preferences(user_data_dir: &Path) -> StorefrontResult<()> {
    let default_profile = user_data_dir.join("Default");
    std::fs::create_dir_all(&default_profile)?;
    let prefs = serde_json::json!({
        "credentials_enable_service": false,
        "profile": { "password_manager_enabled": false },
    });
    std::fs::write(
        default_profile.join("Preferences"),
        serde_json::to_vec(&prefs)?,
    )?;
    Ok(())
}

/// Chromium launch configuration derived from the suite configuration
pub fn browser_config(config: &SuiteConfig, user_data_dir: &Path) -> StorefrontResult<BrowserConfig> {
    let mut builder = BrowserConfig::builder()
        .user_data_dir(user_data_dir)
        .window_size(WINDOW_SIZE.0, WINDOW_SIZE.1)
        .arg("--start-maximized")
        .arg("--disable-features=PasswordLeakDetection");

    if !config.headless {
        builder = builder.with_head();
    }

    if !config.sandbox {
        builder = builder.no_sandbox();
    }

    if let Some(ref path) = config.chromium_path {
        builder = builder.chrome_executable(path);
    }

    builder
        .build()
        .map_err(|message| StorefrontError::BrowserLaunch { message })
}

/// Reported by `DOM.getSearchResults` when an XPath search matched nothing
const EMPTY_SEARCH: &str = "Invalid search result range";

fn is_stale(message: &str) -> bool {
    ["Could not find node", "No node with given id", "Cannot find context", "Node is detached"]
        .iter()
        .any(|marker| message.contains(marker))
}

fn element_error(
    element: &ElementHandle,
    action: &'static str,
    error: &impl std::fmt::Display,
) -> StorefrontError {
    let message = error.to_string();
    if is_stale(&message) {
        StorefrontError::StaleElement {
            id: element.id().to_string(),
        }
    } else {
        StorefrontError::action(element, action, message)
    }
}

/// Turn a failed lookup into an empty match when the failure only means
/// "nothing matched yet": the document changed under the query, or an XPath
/// search came back empty. Anything else is an `Action` error.
fn recover_lookup<T>(locator: &Locator, message: &str) -> StorefrontResult<Vec<T>> {
    if is_stale(message) {
        debug!(%locator, message, "document changed during lookup");
        return Ok(Vec::new());
    }
    if locator.strategy() == Strategy::XPath && message.contains(EMPTY_SEARCH) {
        debug!(%locator, "xpath matched nothing");
        return Ok(Vec::new());
    }
    Err(StorefrontError::action(locator, "find", message))
}

/// Elements behind the handles issued for the current document
#[derive(Debug)]
struct ElementRegistry<E> {
    document: String,
    nodes: HashMap<String, E>,
    by_locator: HashMap<Locator, Vec<String>>,
    next_id: u64,
}

impl<E> ElementRegistry<E> {
    fn new() -> Self {
        Self {
            document: String::new(),
            nodes: HashMap::new(),
            by_locator: HashMap::new(),
            next_id: 0,
        }
    }

    /// Issue handles for one lookup's matches on `document`.
    fn register(&mut self, document: &str, locator: &Locator, found: Vec<E>) -> Vec<ElementHandle> {
        if self.document != document {
            self.clear();
            self.document = document.to_string();
        }
        for id in self.by_locator.remove(locator).unwrap_or_default() {
            self.nodes.remove(&id);
        }

        let mut handles = Vec::with_capacity(found.len());
        for element in found {
            self.next_id += 1;
            let id = format!("node-{}", self.next_id);
            self.nodes.insert(id.clone(), element);
            handles.push(ElementHandle::new(id, locator.clone()));
        }
        self.by_locator.insert(
            locator.clone(),
            handles.iter().map(|h| h.id().to_string()).collect(),
        );
        handles
    }

    fn get(&self, element: &ElementHandle) -> StorefrontResult<&E> {
        self.nodes
            .get(element.id())
            .ok_or_else(|| StorefrontError::StaleElement {
                id: element.id().to_string(),
            })
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.by_locator.clear();
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// One Chromium process driving one tab
#[derive(Debug)]
pub struct CdpDriver {
    browser: Mutex<Option<Browser>>,
    page: Mutex<Page>,
    elements: Mutex<ElementRegistry<Element>>,
    implicit_wait: WaitOptions,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl CdpDriver {
    /// Launch Chromium and open a blank tab.
    pub async fn launch(config: &SuiteConfig) -> StorefrontResult<Self> {
        let profile = tempfile::Builder::new()
            .prefix("storefront-profile-")
            .tempdir()?;
        write_profile_preferences(profile.path())?;
        let cdp_config = browser_config(config, profile.path())?;

        let (browser, mut handler) =
            Browser::launch(cdp_config)
                .await
                .map_err(|e| StorefrontError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page(BLANK_URL)
            .await
            .map_err(|e| StorefrontError::BrowserLaunch {
                message: e.to_string(),
            })?;

        info!(
            headless = config.headless,
            sandbox = config.sandbox,
            implicit_wait_ms = config.implicit_wait_ms,
            "chromium session launched"
        );

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            page: Mutex::new(page),
            elements: Mutex::new(ElementRegistry::new()),
            implicit_wait: config.implicit_wait(),
            handler: handle,
            _profile: profile,
        })
    }

    async fn lookup(&self, locator: &Locator) -> StorefrontResult<Vec<Element>> {
        let page = self.page.lock().await;
        let found = match locator.to_css() {
            Some(css) => page.find_elements(css).await,
            None => page.find_xpaths(locator.value()).await,
        };
        found.or_else(|e| recover_lookup(locator, &e.to_string()))
    }

    async fn call_fn(
        &self,
        element: &ElementHandle,
        action: &'static str,
        function: &str,
    ) -> StorefrontResult<Option<serde_json::Value>> {
        let elements = self.elements.lock().await;
        let returned = elements
            .get(element)?
            .call_js_fn(function, false)
            .await
            .map_err(|e| element_error(element, action, &e))?;
        Ok(returned.result.value)
    }

    async fn call_bool(
        &self,
        element: &ElementHandle,
        action: &'static str,
        function: &str,
    ) -> StorefrontResult<bool> {
        let value = self.call_fn(element, action, function).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

#[async_trait]
impl Driver for CdpDriver {
    async fn navigate(&self, url: &str) -> StorefrontResult<()> {
        {
            let page = self.page.lock().await;
            page.goto(url)
                .await
                .map_err(|e| StorefrontError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
        }
        self.elements.lock().await.clear();
        debug!(url, "navigated");
        Ok(())
    }

    async fn current_url(&self) -> String {
        let page = self.page.lock().await;
        match page.url().await {
            Ok(Some(url)) => url,
            Ok(None) => BLANK_URL.to_string(),
            Err(e) => {
                warn!(error = %e, "current url unavailable");
                BLANK_URL.to_string()
            }
        }
    }

    async fn find_elements(&self, locator: &Locator) -> StorefrontResult<Vec<ElementHandle>> {
        let waited = poll_until(&self.implicit_wait, move || async move {
            let found = self.lookup(locator).await?;
            Ok((!found.is_empty()).then_some(found))
        })
        .await?;

        let document = self.current_url().await;
        let mut elements = self.elements.lock().await;
        let handles = elements.register(&document, locator, waited.value.unwrap_or_default());
        debug!(%locator, matched = handles.len(), live = elements.len(), "lookup registered");
        Ok(handles)
    }

    async fn is_displayed(&self, element: &ElementHandle) -> StorefrontResult<bool> {
        self.call_bool(element, "check visibility of", IS_DISPLAYED_JS)
            .await
    }

    async fn is_interactable(&self, element: &ElementHandle) -> StorefrontResult<bool> {
        self.call_bool(element, "check clickability of", IS_INTERACTABLE_JS)
            .await
    }

    async fn click(&self, element: &ElementHandle) -> StorefrontResult<()> {
        let elements = self.elements.lock().await;
        let node = elements.get(element)?;
        node.click()
            .await
            .map_err(|e| element_error(element, "click", &e))?;
        Ok(())
    }

    async fn script_click(&self, element: &ElementHandle) -> StorefrontResult<()> {
        self.call_fn(element, "script-click", SCRIPT_CLICK_JS)
            .await
            .map(|_| ())
    }

    async fn clear(&self, element: &ElementHandle) -> StorefrontResult<()> {
        self.call_fn(element, "clear", CLEAR_JS).await.map(|_| ())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> StorefrontResult<()> {
        let elements = self.elements.lock().await;
        let node = elements.get(element)?;
        node.focus()
            .await
            .map_err(|e| element_error(element, "focus", &e))?;
        node.type_str(text)
            .await
            .map_err(|e| element_error(element, "type into", &e))?;
        Ok(())
    }

    async fn text(&self, element: &ElementHandle) -> StorefrontResult<String> {
        let elements = self.elements.lock().await;
        let node = elements.get(element)?;
        let text = node
            .inner_text()
            .await
            .map_err(|e| element_error(element, "read text of", &e))?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn screenshot(&self) -> StorefrontResult<Screenshot> {
        let page = self.page.lock().await;
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();

        let screenshot = page
            .execute(params)
            .await
            .map_err(|e| StorefrontError::Screenshot {
                message: e.to_string(),
            })?;

        let data = base64::engine::general_purpose::STANDARD
            .decode(&screenshot.data)
            .map_err(|e| StorefrontError::Screenshot {
                message: e.to_string(),
            })?;
        Ok(Screenshot::new(data))
    }

    async fn close(&self) -> StorefrontResult<()> {
        self.elements.lock().await.clear();
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        let closed = browser
            .close()
            .await
            .map_err(|e| StorefrontError::BrowserLaunch {
                message: format!("close failed: {e}"),
            });
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "chromium did not exit cleanly");
        }
        self.handler.abort();
        info!("chromium session closed");
        closed.map(|_| ())
    }
}

/// Launches one Chromium per session
#[derive(Debug, Clone)]
pub struct ChromiumProvider {
    config: SuiteConfig,
}

impl ChromiumProvider {
    /// Provider launching browsers per `config`
    #[must_use]
    pub const fn new(config: SuiteConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionProvider for ChromiumProvider {
    async fn open(&self) -> StorefrontResult<SharedDriver> {
        let driver = CdpDriver::launch(&self.config).await?;
        Ok(Arc::new(driver))
    }
}
