//! Process-wide configuration snapshot.
//!
//! Settings are read once at process start and treated as immutable for the
//! rest of the run. Page objects copy their timeouts out of the snapshot at
//! construction time, so later environment changes never affect a live page.

use std::path::PathBuf;
use std::time::Duration;

use crate::result::{NavegarError, NavegarResult};

/// Default page-level operation timeout (30 seconds)
pub const DEFAULT_PAGE_TIMEOUT_MS: u64 = 30_000;

/// Default element-level wait timeout (5 seconds)
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 5_000;

/// Default selector document location, relative to the working directory
pub const DEFAULT_SELECTOR_PATH: &str = "config/selectors.yaml";

/// Browser engine choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserKind {
    /// Chromium over CDP (the only engine with a bundled driver)
    #[default]
    Chromium,
    /// Firefox
    Firefox,
    /// WebKit
    Webkit,
}

impl BrowserKind {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "firefox" => Self::Firefox,
            "webkit" => Self::Webkit,
            _ => Self::Chromium,
        }
    }
}

/// Immutable configuration snapshot for a test run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base address that relative navigation paths resolve against
    pub base_url: String,
    /// Test account username
    pub username: String,
    /// Test account password
    pub password: String,
    /// Browser engine
    pub browser: BrowserKind,
    /// Run the browser headless
    pub headless: bool,
    /// Artificial delay between driver operations, for debugging
    pub slow_mo_ms: u64,
    /// Page-level operation timeout in milliseconds
    pub page_timeout_ms: u64,
    /// Element-level wait timeout in milliseconds
    pub element_timeout_ms: u64,
    /// Log level passed to the tracing subscriber
    pub log_level: String,
    /// Emit a run report at teardown
    pub generate_report: bool,
    /// Location of the selector document
    pub selector_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://parabank.parasoft.com/parabank/".to_string(),
            username: String::new(),
            password: String::new(),
            browser: BrowserKind::Chromium,
            headless: true,
            slow_mo_ms: 0,
            page_timeout_ms: DEFAULT_PAGE_TIMEOUT_MS,
            element_timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            log_level: "info".to_string(),
            generate_report: false,
            selector_path: PathBuf::from(DEFAULT_SELECTOR_PATH),
        }
    }
}

impl Settings {
    /// Read the settings snapshot from the process environment.
    ///
    /// Unset variables fall back to defaults; `BASE_URL` must end up
    /// non-empty or startup aborts.
    ///
    /// # Errors
    ///
    /// Returns `MissingSetting` when a required value is absent or empty.
    pub fn from_env() -> NavegarResult<Self> {
        let defaults = Self::default();
        let settings = Self {
            base_url: env_or("BASE_URL", &defaults.base_url),
            username: env_or("TEST_USERNAME", ""),
            password: env_or("TEST_PASSWORD", ""),
            browser: BrowserKind::parse(&env_or("BROWSER", "chromium")),
            headless: env_flag("HEADLESS", defaults.headless),
            slow_mo_ms: env_u64("SLOW_MO", 0),
            page_timeout_ms: env_u64("PAGE_TIMEOUT", DEFAULT_PAGE_TIMEOUT_MS),
            element_timeout_ms: env_u64("ELEMENT_TIMEOUT", DEFAULT_ELEMENT_TIMEOUT_MS),
            log_level: env_or("LOG_LEVEL", "info"),
            generate_report: env_flag("GENERATE_REPORT", false),
            selector_path: PathBuf::from(env_or("SELECTORS_PATH", DEFAULT_SELECTOR_PATH)),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> NavegarResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(NavegarError::MissingSetting {
                name: "base_url".to_string(),
            });
        }
        Ok(())
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the page-level timeout in milliseconds
    #[must_use]
    pub const fn with_page_timeout(mut self, ms: u64) -> Self {
        self.page_timeout_ms = ms;
        self
    }

    /// Set the element-level timeout in milliseconds
    #[must_use]
    pub const fn with_element_timeout(mut self, ms: u64) -> Self {
        self.element_timeout_ms = ms;
        self
    }

    /// Set the selector document location
    #[must_use]
    pub fn with_selector_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.selector_path = path.into();
        self
    }

    /// Page-level timeout as a `Duration`
    #[must_use]
    pub const fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    /// Element-level timeout as a `Duration`
    #[must_use]
    pub const fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| v.to_ascii_lowercase() == "true")
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
