//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable `(strategy, value)` pair identifying zero or
//! more elements in the rendered page. Page objects declare their locators as
//! associated functions and never cache the elements they resolve to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy used to identify elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Element `id` attribute
    Id,
    /// Single class name
    ClassName,
    /// CSS selector
    Css,
    /// XPath expression
    XPath,
}

impl Strategy {
    /// Short name used in logs and error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ClassName => "class name",
            Self::Css => "css selector",
            Self::XPath => "xpath",
        }
    }
}

/// A `(strategy, value)` pair for finding elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: String,
}

impl Locator {
    /// Create a locator from its parts
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Locate by `id`
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::new(Strategy::Id, value)
    }

    /// Locate by a single class name
    #[must_use]
    pub fn class_name(value: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, value)
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(value: impl Into<String>) -> Self {
        Self::new(Strategy::Css, value)
    }

    /// Locate by XPath expression
    #[must_use]
    pub fn xpath(value: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, value)
    }

    /// Locate by `data-test` attribute
    #[must_use]
    pub fn data_test(value: &str) -> Self {
        Self::css(format!("[data-test='{value}']"))
    }

    /// Identification strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Identification value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Equivalent CSS selector, if the strategy has one.
    ///
    /// XPath has no CSS form and returns `None`.
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self.strategy {
            Strategy::Id => Some(format!("[id='{}']", self.value)),
            Strategy::ClassName => Some(format!(".{}", self.value)),
            Strategy::Css => Some(self.value.clone()),
            Strategy::XPath => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}'", self.strategy.as_str(), self.value)
    }
}
