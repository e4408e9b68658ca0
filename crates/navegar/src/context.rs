//! Explicit run context.
//!
//! All dependencies a page object needs, the settings snapshot and the
//! selector registry, travel through a [`TestContext`] value that callers
//! construct and pass where needed. Nothing in the crate reaches for
//! process globals; two contexts with different registries can coexist in
//! one process.

use crate::registry::SelectorRegistry;
use crate::result::NavegarResult;
use crate::settings::Settings;

/// Shared dependencies for one test run
#[derive(Debug, Clone)]
pub struct TestContext {
    settings: Settings,
    registry: SelectorRegistry,
}

impl TestContext {
    /// Build a context from settings, loading the selector registry from
    /// the configured path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoad` when the selector document is missing or
    /// malformed. Startup aborts; there is no context without selectors.
    pub fn new(settings: Settings) -> NavegarResult<Self> {
        let registry = SelectorRegistry::load(&settings.selector_path)?;
        Ok(Self { settings, registry })
    }

    /// Build a context from settings and an already-loaded registry
    #[must_use]
    pub const fn with_registry(settings: Settings, registry: SelectorRegistry) -> Self {
        Self { settings, registry }
    }

    /// Build a context from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `MissingSetting` or `ConfigLoad` as in [`Settings::from_env`]
    /// and [`Self::new`].
    pub fn from_env() -> NavegarResult<Self> {
        Self::new(Settings::from_env()?)
    }

    /// The settings snapshot
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The selector registry
    #[must_use]
    pub const fn registry(&self) -> &SelectorRegistry {
        &self.registry
    }

    /// Re-read the selector registry from its source file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigLoad` on failure, keeping the previous contents.
    pub fn reload_selectors(&mut self) -> NavegarResult<()> {
        self.registry.reload()
    }
}
