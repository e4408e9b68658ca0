//! The Action Layer: wait-then-act element operations.
//!
//! Every operation that touches or reads an element first waits for it to
//! become visible, using the element-level timeout unless the caller
//! overrides it per call. `is_visible` runs the same wait but swallows the
//! timeout into `false`, which keeps negative assertions usable without
//! try/catch scaffolding at every call site. `get_text`/`get_value`
//! propagate the wait failure; the empty-string fallback applies only to
//! absent content on an element that did render.

use std::sync::Arc;
use std::time::Duration;

use crate::driver::BrowserDriver;
use crate::element::{BoundingBox, ElementRef};
use crate::result::NavegarResult;
use crate::session::Session;
use crate::settings::Settings;
use crate::wait::{poll_until, LoadState};

/// Wait-then-act operations bound to one session
#[derive(Clone)]
pub struct Actions {
    session: Session,
    base_url: String,
    page_timeout: Duration,
    element_timeout: Duration,
}

impl Actions {
    /// Bind an action layer to a session, copying timeouts and the base
    /// URL out of the settings snapshot.
    #[must_use]
    pub fn new(session: Session, settings: &Settings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            page_timeout: settings.page_timeout(),
            element_timeout: settings.element_timeout(),
            session,
        }
    }

    /// The session this layer operates on
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The default element-level wait bound
    #[must_use]
    pub const fn element_timeout(&self) -> Duration {
        self.element_timeout
    }

    /// The default page-level wait bound
    #[must_use]
    pub const fn page_timeout(&self) -> Duration {
        self.page_timeout
    }

    fn driver(&self) -> &Arc<dyn BrowserDriver> {
        self.session.driver()
    }

    /// Navigate to `path`. Absolute URLs are taken as-is; anything else is
    /// resolved against the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` when the browser fails to load the URL.
    pub async fn navigate(&self, path: &str) -> NavegarResult<()> {
        let url = self.resolve_url(path);
        tracing::info!(%url, "navigating");
        self.driver().navigate(&url).await?;
        self.driver()
            .wait_for_load_state(LoadState::Load, self.page_timeout)
            .await
    }

    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        }
    }

    /// Wait until the page reaches `state`, bounded by the page timeout.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when the bound expires.
    pub async fn wait_for_load_state(&self, state: LoadState) -> NavegarResult<()> {
        self.driver()
            .wait_for_load_state(state, self.page_timeout)
            .await
    }

    /// Wait until `element` is visible.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` carrying the selector and the effective bound.
    pub async fn wait_for_visible(
        &self,
        element: impl Into<ElementRef>,
        timeout: Option<Duration>,
    ) -> NavegarResult<()> {
        let element = element.into();
        let selector = element.selector().to_string();
        let bound = timeout.unwrap_or(self.element_timeout);
        let driver = self.driver().clone();
        poll_until(&selector, bound, || {
            let driver = driver.clone();
            let selector = selector.clone();
            async move { driver.is_visible(&selector).await }
        })
        .await
    }

    /// Wait until `element` is hidden or gone.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when the element stays visible past the bound.
    pub async fn wait_for_hidden(
        &self,
        element: impl Into<ElementRef>,
        timeout: Option<Duration>,
    ) -> NavegarResult<()> {
        let element = element.into();
        let selector = element.selector().to_string();
        let bound = timeout.unwrap_or(self.element_timeout);
        let driver = self.driver().clone();
        poll_until(&selector, bound, || {
            let driver = driver.clone();
            let selector = selector.clone();
            async move { Ok(!driver.is_visible(&selector).await.unwrap_or(false)) }
        })
        .await
    }

    /// Wait for visibility, then click.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the element never appears, or a driver error
    /// from the click itself.
    pub async fn click(
        &self,
        element: impl Into<ElementRef>,
        timeout: Option<Duration>,
    ) -> NavegarResult<()> {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await?;
        tracing::debug!(selector = %element, "click");
        self.driver().click(element.selector()).await
    }

    /// Wait for visibility, then replace the element's value.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the element never appears, or a driver error.
    pub async fn fill(
        &self,
        element: impl Into<ElementRef>,
        value: &str,
        timeout: Option<Duration>,
    ) -> NavegarResult<()> {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await?;
        tracing::debug!(selector = %element, "fill");
        self.driver().fill(element.selector(), value).await
    }

    /// Wait for visibility, then type into the element, appending to its
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the element never appears, or a driver error.
    pub async fn type_text(
        &self,
        element: impl Into<ElementRef>,
        text: &str,
        timeout: Option<Duration>,
    ) -> NavegarResult<()> {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await?;
        self.driver().type_text(element.selector(), text).await
    }

    /// Wait for visibility, then select the option with `value`.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the element never appears, or a driver error.
    pub async fn select_option(
        &self,
        element: impl Into<ElementRef>,
        value: &str,
        timeout: Option<Duration>,
    ) -> NavegarResult<()> {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await?;
        self.driver().select_option(element.selector(), value).await
    }

    /// Wait for visibility, then check the box.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the element never appears, or a driver error.
    pub async fn check(
        &self,
        element: impl Into<ElementRef>,
        timeout: Option<Duration>,
    ) -> NavegarResult<()> {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await?;
        self.driver().set_checked(element.selector(), true).await
    }

    /// Wait for visibility, then uncheck the box.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the element never appears, or a driver error.
    pub async fn uncheck(
        &self,
        element: impl Into<ElementRef>,
        timeout: Option<Duration>,
    ) -> NavegarResult<()> {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await?;
        self.driver().set_checked(element.selector(), false).await
    }

    /// Whether the element becomes visible within the bound. The wait is
    /// the same one the mutating operations use; its timeout, and any
    /// other failure underneath, reads as `false`. This method is made
    /// for assertions and never errors.
    pub async fn is_visible(
        &self,
        element: impl Into<ElementRef>,
        timeout: Option<Duration>,
    ) -> bool {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await.is_ok()
    }

    /// Wait for visibility, then report whether the element is enabled.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the element never appears. Unlike
    /// [`is_visible`](Self::is_visible), failures here propagate: an
    /// enabled-check against a missing element is a test bug, not a
    /// negative assertion.
    pub async fn is_enabled(
        &self,
        element: impl Into<ElementRef>,
        timeout: Option<Duration>,
    ) -> NavegarResult<bool> {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await?;
        self.driver().is_enabled(element.selector()).await
    }

    /// Text content of the element after waiting for visibility, trimmed.
    /// An element with no text reads as an empty string.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the element never appears, or a driver error
    /// from the read itself.
    pub async fn get_text(
        &self,
        element: impl Into<ElementRef>,
        timeout: Option<Duration>,
    ) -> NavegarResult<String> {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await?;
        let text = self.driver().text_content(element.selector()).await?;
        Ok(text.map(|t| t.trim().to_string()).unwrap_or_default())
    }

    /// Input value of the element after waiting for visibility. An element
    /// with no value reads as an empty string.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the element never appears, or a driver error
    /// from the read itself.
    pub async fn get_value(
        &self,
        element: impl Into<ElementRef>,
        timeout: Option<Duration>,
    ) -> NavegarResult<String> {
        let element = element.into();
        self.wait_for_visible(&element, timeout).await?;
        let value = self.driver().input_value(element.selector()).await?;
        Ok(value.unwrap_or_default())
    }

    /// Number of elements matching the reference right now, without
    /// waiting.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the query fails.
    pub async fn count(&self, element: impl Into<ElementRef>) -> NavegarResult<usize> {
        let element = element.into();
        self.driver().count(element.selector()).await
    }

    /// Bounding box of the element, `None` when not rendered.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the query fails.
    pub async fn bounding_box(
        &self,
        element: impl Into<ElementRef>,
    ) -> NavegarResult<Option<BoundingBox>> {
        let element = element.into();
        self.driver().bounding_box(element.selector()).await
    }

    /// Scroll the element into view without waiting for visibility;
    /// scrolling is often what makes an element visible in the first
    /// place.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the element does not exist.
    pub async fn scroll_to(&self, element: impl Into<ElementRef>) -> NavegarResult<()> {
        let element = element.into();
        self.driver().scroll_into_view(element.selector()).await
    }

    /// Hover over the element without an implicit wait; hovering is used
    /// to reveal elements, not to interact with revealed ones.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the element does not exist.
    pub async fn hover(&self, element: impl Into<ElementRef>) -> NavegarResult<()> {
        let element = element.into();
        self.driver().hover(element.selector()).await
    }

    /// Current page URL.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the query fails.
    pub async fn current_url(&self) -> NavegarResult<String> {
        self.driver().current_url().await
    }

    /// Current page title.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the query fails.
    pub async fn title(&self) -> NavegarResult<String> {
        self.driver().title().await
    }

    /// PNG screenshot of the viewport.
    ///
    /// # Errors
    ///
    /// Returns a driver error if capture fails.
    pub async fn screenshot(&self) -> NavegarResult<Vec<u8>> {
        self.driver().screenshot().await
    }
}

impl std::fmt::Debug for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actions")
            .field("session", &self.session.id())
            .field("base_url", &self.base_url)
            .field("page_timeout", &self.page_timeout)
            .field("element_timeout", &self.element_timeout)
            .finish()
    }
}
