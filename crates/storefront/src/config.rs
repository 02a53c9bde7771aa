//! Suite configuration.
//!
//! Resolution order: built-in defaults, then an optional YAML file named by
//! `STOREFRONT_CONFIG`, then `STOREFRONT_*` environment overrides.

use crate::harness::Marker;
use crate::result::{StorefrontError, StorefrontResult};
use crate::wait::{
    WaitOptions, DEFAULT_IMPLICIT_WAIT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default storefront address
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com/";

/// Account every positive scenario logs in with
pub const DEFAULT_USERNAME: &str = "standard_user";

/// Password shared by the storefront's demo accounts
pub const DEFAULT_PASSWORD: &str = "secret_sauce";

/// Environment variable naming a YAML config file
pub const CONFIG_PATH_VAR: &str = "STOREFRONT_CONFIG";

/// Suite configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    /// Storefront base address (with trailing slash)
    pub base_url: String,
    /// Login user for positive flows
    pub username: String,
    /// Login password for positive flows
    pub password: String,
    /// Explicit wait for element operations
    pub timeout_ms: u64,
    /// Implicit wait applied to raw browser lookups
    pub implicit_wait_ms: u64,
    /// Poll interval for bounded waits
    pub poll_interval_ms: u64,
    /// Run Chromium without a window
    pub headless: bool,
    /// Chromium executable override
    pub chromium_path: Option<String>,
    /// Keep the Chromium sandbox (disable inside containers)
    pub sandbox: bool,
    /// Where failure screenshots and the suite summary are written
    pub artifacts_dir: PathBuf,
    /// Markers to run; empty runs every scenario
    pub markers: Vec<Marker>,
    /// Navigate straight to the checkout overview after the continue click
    pub force_overview_navigation: bool,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            implicit_wait_ms: DEFAULT_IMPLICIT_WAIT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            headless: true,
            chromium_path: None,
            sandbox: true,
            artifacts_dir: PathBuf::from("target/storefront-artifacts"),
            markers: Vec::new(),
            force_overview_navigation: true,
            json_logs: false,
        }
    }
}

impl SuiteConfig {
    /// Defaults, then `STOREFRONT_CONFIG` file, then environment overrides.
    pub fn resolve() -> StorefrontResult<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.is_empty() => Self::load(path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> StorefrontResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Parse from YAML; missing keys keep their defaults
    pub fn from_yaml_str(raw: &str) -> StorefrontResult<Self> {
        let config: Self = serde_yaml_ng::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `STOREFRONT_*` overrides supplied by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> StorefrontResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("STOREFRONT_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("STOREFRONT_USERNAME") {
            self.username = v;
        }
        if let Some(v) = lookup("STOREFRONT_PASSWORD") {
            self.password = v;
        }
        if let Some(v) = lookup("STOREFRONT_TIMEOUT_MS") {
            self.timeout_ms = parse_ms("STOREFRONT_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("STOREFRONT_IMPLICIT_WAIT_MS") {
            self.implicit_wait_ms = parse_ms("STOREFRONT_IMPLICIT_WAIT_MS", &v)?;
        }
        if let Some(v) = lookup("STOREFRONT_POLL_INTERVAL_MS") {
            self.poll_interval_ms = parse_ms("STOREFRONT_POLL_INTERVAL_MS", &v)?;
        }
        if let Some(v) = lookup("STOREFRONT_HEADLESS") {
            self.headless = parse_flag("STOREFRONT_HEADLESS", &v)?;
        }
        if let Some(v) = lookup("STOREFRONT_CHROMIUM_PATH") {
            self.chromium_path = Some(v).filter(|p| !p.is_empty());
        }
        if let Some(v) = lookup("STOREFRONT_NO_SANDBOX") {
            self.sandbox = !parse_flag("STOREFRONT_NO_SANDBOX", &v)?;
        }
        if let Some(v) = lookup("STOREFRONT_ARTIFACTS_DIR") {
            self.artifacts_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("STOREFRONT_MARKERS") {
            self.markers = v
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::parse)
                .collect::<StorefrontResult<_>>()?;
        }
        if let Some(v) = lookup("STOREFRONT_FORCE_OVERVIEW_NAVIGATION") {
            self.force_overview_navigation =
                parse_flag("STOREFRONT_FORCE_OVERVIEW_NAVIGATION", &v)?;
        }
        if let Some(v) = lookup("STOREFRONT_JSON_LOGS") {
            self.json_logs = parse_flag("STOREFRONT_JSON_LOGS", &v)?;
        }
        Ok(())
    }

    /// Reject configurations the suite cannot run with
    pub fn validate(&self) -> StorefrontResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(StorefrontError::Config {
                message: format!("base_url must be http(s): {}", self.base_url),
            });
        }
        if self.poll_interval_ms == 0 {
            return Err(StorefrontError::Config {
                message: "poll_interval_ms must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Explicit wait policy handed to page objects
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Implicit lookup wait for the Chromium driver
    #[must_use]
    pub const fn implicit_wait(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.implicit_wait_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Whether scenarios tagged `marker` should run
    #[must_use]
    pub fn is_selected(&self, marker: Marker) -> bool {
        self.markers.is_empty() || self.markers.contains(&marker)
    }
}

/// Absolute address of `path` (such as `cart.html`) under `base_url`
#[must_use]
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn parse_ms(key: &str, value: &str) -> StorefrontResult<u64> {
    value.trim().parse().map_err(|_| StorefrontError::Config {
        message: format!("{key} expects milliseconds, got {value:?}"),
    })
}

fn parse_flag(key: &str, value: &str) -> StorefrontResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(StorefrontError::Config {
            message: format!("{key} expects a boolean, got {value:?}"),
        }),
    }
}
