//! Driver - abstract browser seam.
//!
//! The element access layer talks to the browser only through [`Driver`].
//! Two implementations exist:
//!
//! - `CdpDriver` (feature `browser`): real Chromium over the DevTools protocol
//! - [`SimulatedStore`](crate::simulated::SimulatedStore): in-process model of
//!   the storefront for deterministic tests
//!
//! Lookups never wait on their own account beyond the driver's implicit wait;
//! bounded polling lives in [`BasePage`](crate::pages::BasePage).

use crate::locator::Locator;
use crate::result::StorefrontResult;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Shared handle to one browser session
pub type SharedDriver = Arc<dyn Driver>;

/// Ephemeral reference to a DOM node.
///
/// Valid only until the next navigation or DOM mutation. Drivers reject stale
/// handles with [`StorefrontError::StaleElement`](crate::StorefrontError::StaleElement).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    id: String,
    locator: Locator,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, locator: Locator) -> Self {
        Self {
            id: id.into(),
            locator,
        }
    }

    /// Driver-assigned id
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Locator the handle was resolved from
    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.locator, self.id)
    }
}

/// Screenshot data with metadata
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Raw PNG data
    pub data: Vec<u8>,
    /// Timestamp when screenshot was taken
    pub timestamp: SystemTime,
}

impl Screenshot {
    /// Create a new screenshot
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            timestamp: SystemTime::now(),
        }
    }

    /// Get the size in bytes
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Check the payload starts with the PNG signature
    #[must_use]
    pub fn is_png(&self) -> bool {
        self.data.starts_with(&[0x89, b'P', b'N', b'G'])
    }
}

/// Abstract driver trait for browser automation.
///
/// All methods take `&self`; implementations guard their session state
/// internally so one session can be shared by successive page objects.
#[async_trait]
pub trait Driver: Send + Sync + fmt::Debug {
    /// Navigate to URL and wait for the load to settle
    async fn navigate(&self, url: &str) -> StorefrontResult<()>;

    /// Current address; always defined
    async fn current_url(&self) -> String;

    /// All elements matching `locator`, in document order. Empty when none match.
    async fn find_elements(&self, locator: &Locator) -> StorefrontResult<Vec<ElementHandle>>;

    /// Whether the element is rendered and visible
    async fn is_displayed(&self, element: &ElementHandle) -> StorefrontResult<bool>;

    /// Whether the element is visible, enabled and not covered by another element
    async fn is_interactable(&self, element: &ElementHandle) -> StorefrontResult<bool>;

    /// Native pointer click
    async fn click(&self, element: &ElementHandle) -> StorefrontResult<()>;

    /// Click dispatched by script inside the page
    async fn script_click(&self, element: &ElementHandle) -> StorefrontResult<()>;

    /// Clear the element's editable content
    async fn clear(&self, element: &ElementHandle) -> StorefrontResult<()>;

    /// Type text into the element
    async fn send_keys(&self, element: &ElementHandle, text: &str) -> StorefrontResult<()>;

    /// Rendered text content
    async fn text(&self, element: &ElementHandle) -> StorefrontResult<String>;

    /// Capture the viewport as PNG
    async fn screenshot(&self) -> StorefrontResult<Screenshot>;

    /// End the session
    async fn close(&self) -> StorefrontResult<()>;
}
