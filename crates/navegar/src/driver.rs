//! Browser driver abstraction.
//!
//! The [`BrowserDriver`] trait is the seam between the Action Layer and a
//! real browser. Operations take raw selector strings; everything above
//! this boundary (waiting, timeouts, registry lookups) lives in the Action
//! Layer so a driver only has to answer point-in-time questions about the
//! page. [`MockDriver`] is the in-memory implementation used by the test
//! suite; the CDP-backed driver lives behind the `browser` feature.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::element::BoundingBox;
use crate::result::{NavegarError, NavegarResult};
use crate::wait::LoadState;

/// Point-in-time browser operations. No waiting happens at this level.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate to an absolute URL
    async fn navigate(&self, url: &str) -> NavegarResult<()>;

    /// Block until the page reaches `state`, checked against `timeout`
    async fn wait_for_load_state(
        &self,
        state: LoadState,
        timeout: std::time::Duration,
    ) -> NavegarResult<()>;

    /// Whether the first element matching `selector` exists and is visible
    async fn is_visible(&self, selector: &str) -> NavegarResult<bool>;

    /// Whether the first element matching `selector` is enabled
    async fn is_enabled(&self, selector: &str) -> NavegarResult<bool>;

    /// Click the first element matching `selector`
    async fn click(&self, selector: &str) -> NavegarResult<()>;

    /// Replace the value of the first element matching `selector`
    async fn fill(&self, selector: &str, value: &str) -> NavegarResult<()>;

    /// Type `text` into the first element matching `selector`, appending
    /// to the current value
    async fn type_text(&self, selector: &str, text: &str) -> NavegarResult<()>;

    /// Select the option with `value` in the first matching `<select>`
    async fn select_option(&self, selector: &str, value: &str) -> NavegarResult<()>;

    /// Set the checked state of the first matching checkbox or radio
    async fn set_checked(&self, selector: &str, checked: bool) -> NavegarResult<()>;

    /// Text content of the first matching element, `None` if absent
    async fn text_content(&self, selector: &str) -> NavegarResult<Option<String>>;

    /// Input value of the first matching element, `None` if absent
    async fn input_value(&self, selector: &str) -> NavegarResult<Option<String>>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> NavegarResult<usize>;

    /// Bounding box of the first matching element, `None` if not rendered
    async fn bounding_box(&self, selector: &str) -> NavegarResult<Option<BoundingBox>>;

    /// Scroll the first matching element into view
    async fn scroll_into_view(&self, selector: &str) -> NavegarResult<()>;

    /// Hover over the first matching element
    async fn hover(&self, selector: &str) -> NavegarResult<()>;

    /// Current page URL
    async fn current_url(&self) -> NavegarResult<String>;

    /// Current page title
    async fn title(&self) -> NavegarResult<String>;

    /// PNG screenshot of the viewport
    async fn screenshot(&self) -> NavegarResult<Vec<u8>>;

    /// Close the underlying browser page
    async fn close(&self) -> NavegarResult<()>;
}

/// One element in the mock DOM
#[derive(Debug, Clone)]
pub struct MockElement {
    /// Visible to `is_visible` probes
    pub visible: bool,
    /// Enabled for interaction
    pub enabled: bool,
    /// Text content
    pub text: String,
    /// Input value
    pub value: String,
    /// Checked state for checkboxes and radios
    pub checked: bool,
    /// Number of matches the selector reports
    pub count: usize,
    /// Become visible only after this many `is_visible` probes, to
    /// exercise wait loops deterministically
    pub visible_after: Option<u32>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            visible: true,
            enabled: true,
            text: String::new(),
            value: String::new(),
            checked: false,
            count: 1,
            visible_after: None,
        }
    }
}

impl MockElement {
    /// A visible, enabled element with no content
    #[must_use]
    pub fn visible() -> Self {
        Self::default()
    }

    /// An element that never becomes visible
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }

    /// A visible element carrying text content
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A visible element carrying an input value
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    /// An element that turns visible after `probes` visibility checks
    #[must_use]
    pub fn visible_after(probes: u32) -> Self {
        Self {
            visible: false,
            visible_after: Some(probes),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    title: String,
    elements: HashMap<String, MockElement>,
    calls: Vec<String>,
    fail_navigation: bool,
}

/// In-memory driver for unit and integration tests. The DOM is a flat map
/// from selector string to [`MockElement`]; unknown selectors behave like
/// elements that do not exist.
#[derive(Debug, Default)]
pub struct MockDriver {
    state: Mutex<MockState>,
}

impl MockDriver {
    /// Create an empty mock driver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace an element at `selector`
    pub fn add_element(&self, selector: impl Into<String>, element: MockElement) {
        self.lock().elements.insert(selector.into(), element);
    }

    /// Remove the element at `selector`
    pub fn remove_element(&self, selector: &str) {
        self.lock().elements.remove(selector);
    }

    /// Set the page title reported by `title`
    pub fn set_title(&self, title: impl Into<String>) {
        self.lock().title = title.into();
    }

    /// Make every subsequent `navigate` call fail
    pub fn fail_navigation(&self, fail: bool) {
        self.lock().fail_navigation = fail;
    }

    /// Every driver call recorded in order, formatted as
    /// `"method(args)"`. Used to assert that failed waits never touched
    /// the DOM.
    #[must_use]
    pub fn call_history(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Calls whose name starts with `prefix`
    #[must_use]
    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // Mock state is plain data; a poisoned lock only happens after a
        // test already panicked.
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn record(&self, call: String) {
        self.lock().calls.push(call);
    }

    fn with_element<T>(
        &self,
        selector: &str,
        f: impl FnOnce(&mut MockElement) -> T,
    ) -> NavegarResult<T> {
        let mut state = self.lock();
        match state.elements.get_mut(selector) {
            Some(element) => Ok(f(element)),
            None => Err(NavegarError::Driver {
                message: format!("no element matches '{selector}'"),
            }),
        }
    }
}

#[async_trait]
impl BrowserDriver for MockDriver {
    async fn navigate(&self, url: &str) -> NavegarResult<()> {
        self.record(format!("navigate({url})"));
        let mut state = self.lock();
        if state.fail_navigation {
            return Err(NavegarError::Navigation {
                url: url.to_string(),
                message: "connection refused".to_string(),
            });
        }
        state.url = url.to_string();
        Ok(())
    }

    async fn wait_for_load_state(
        &self,
        state: LoadState,
        _timeout: std::time::Duration,
    ) -> NavegarResult<()> {
        self.record(format!("wait_for_load_state({state})"));
        Ok(())
    }

    async fn is_visible(&self, selector: &str) -> NavegarResult<bool> {
        self.record(format!("is_visible({selector})"));
        let mut state = self.lock();
        match state.elements.get_mut(selector) {
            Some(element) => {
                if let Some(remaining) = element.visible_after {
                    if remaining == 0 {
                        element.visible = true;
                        element.visible_after = None;
                    } else {
                        element.visible_after = Some(remaining - 1);
                    }
                }
                Ok(element.visible)
            }
            None => Ok(false),
        }
    }

    async fn is_enabled(&self, selector: &str) -> NavegarResult<bool> {
        self.record(format!("is_enabled({selector})"));
        self.with_element(selector, |e| e.enabled)
    }

    async fn click(&self, selector: &str) -> NavegarResult<()> {
        self.record(format!("click({selector})"));
        self.with_element(selector, |_| ())
    }

    async fn fill(&self, selector: &str, value: &str) -> NavegarResult<()> {
        self.record(format!("fill({selector}, {value})"));
        self.with_element(selector, |e| e.value = value.to_string())
    }

    async fn type_text(&self, selector: &str, text: &str) -> NavegarResult<()> {
        self.record(format!("type_text({selector}, {text})"));
        self.with_element(selector, |e| e.value.push_str(text))
    }

    async fn select_option(&self, selector: &str, value: &str) -> NavegarResult<()> {
        self.record(format!("select_option({selector}, {value})"));
        self.with_element(selector, |e| e.value = value.to_string())
    }

    async fn set_checked(&self, selector: &str, checked: bool) -> NavegarResult<()> {
        self.record(format!("set_checked({selector}, {checked})"));
        self.with_element(selector, |e| e.checked = checked)
    }

    async fn text_content(&self, selector: &str) -> NavegarResult<Option<String>> {
        self.record(format!("text_content({selector})"));
        let state = self.lock();
        Ok(state.elements.get(selector).map(|e| e.text.clone()))
    }

    async fn input_value(&self, selector: &str) -> NavegarResult<Option<String>> {
        self.record(format!("input_value({selector})"));
        let state = self.lock();
        Ok(state.elements.get(selector).map(|e| e.value.clone()))
    }

    async fn count(&self, selector: &str) -> NavegarResult<usize> {
        self.record(format!("count({selector})"));
        let state = self.lock();
        Ok(state.elements.get(selector).map_or(0, |e| e.count))
    }

    async fn bounding_box(&self, selector: &str) -> NavegarResult<Option<BoundingBox>> {
        self.record(format!("bounding_box({selector})"));
        let state = self.lock();
        Ok(state
            .elements
            .get(selector)
            .filter(|e| e.visible)
            .map(|_| BoundingBox::new(0.0, 0.0, 100.0, 20.0)))
    }

    async fn scroll_into_view(&self, selector: &str) -> NavegarResult<()> {
        self.record(format!("scroll_into_view({selector})"));
        self.with_element(selector, |_| ())
    }

    async fn hover(&self, selector: &str) -> NavegarResult<()> {
        self.record(format!("hover({selector})"));
        self.with_element(selector, |_| ())
    }

    async fn current_url(&self) -> NavegarResult<String> {
        self.record("current_url()".to_string());
        Ok(self.lock().url.clone())
    }

    async fn title(&self) -> NavegarResult<String> {
        self.record("title()".to_string());
        Ok(self.lock().title.clone())
    }

    async fn screenshot(&self) -> NavegarResult<Vec<u8>> {
        self.record("screenshot()".to_string());
        // Minimal valid PNG header so callers can sanity-check the format
        Ok(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
    }

    async fn close(&self) -> NavegarResult<()> {
        self.record("close()".to_string());
        Ok(())
    }
}
