//! Chromium-backed driver over the Chrome DevTools Protocol.
//!
//! Element operations run as JavaScript in the page: selectors are
//! JSON-escaped and passed to `document.querySelector`, so the driver
//! needs no per-operation CDP plumbing beyond `evaluate`. Only available
//! with the `browser` feature.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use tokio::time::sleep;

use crate::driver::BrowserDriver;
use crate::element::BoundingBox;
use crate::result::{NavegarError, NavegarResult};
use crate::settings::Settings;
use crate::wait::{poll_until, LoadState};

/// Quiet period a page must hold after `load` before it counts as
/// network-idle
const NETWORK_IDLE_QUIET: Duration = Duration::from_millis(500);

/// A launched Chromium process and its CDP connection
pub struct ChromiumBrowser {
    browser: Browser,
    slow_mo: Duration,
}

impl ChromiumBrowser {
    /// Launch Chromium per the settings snapshot.
    ///
    /// # Errors
    ///
    /// Returns `BrowserLaunch` if the process fails to start or the
    /// configuration is invalid.
    pub async fn launch(settings: &Settings) -> NavegarResult<Self> {
        let mut config = BrowserConfig::builder();
        if settings.headless {
            config = config.arg("--headless");
        }
        config = config
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--window-size=1920,1080");

        // A unique profile directory per launch keeps parallel sessions
        // from fighting over Chrome's ProcessSingleton lock.
        let user_data_dir = std::env::temp_dir().join(format!("navegar-{}", uuid::Uuid::new_v4()));
        config = config.arg(format!("--user-data-dir={}", user_data_dir.display()));

        let config = config.build().map_err(|e| NavegarError::BrowserLaunch {
            message: format!("invalid browser configuration: {e}"),
        })?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| NavegarError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // chromiumoxide needs its handler polled for CDP traffic to flow
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::warn!(error = %e, "browser handler error");
                }
            }
        });

        tracing::debug!(headless = settings.headless, "browser launched");
        Ok(Self {
            browser,
            slow_mo: Duration::from_millis(settings.slow_mo_ms),
        })
    }

    /// Open a new tab and wrap it as a driver.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the tab cannot be created.
    pub async fn new_driver(&self) -> NavegarResult<ChromiumDriver> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(NavegarError::driver)?;
        Ok(ChromiumDriver {
            page,
            slow_mo: self.slow_mo,
        })
    }

    /// Shut down the browser process.
    ///
    /// # Errors
    ///
    /// Returns a driver error if teardown fails.
    pub async fn close(mut self) -> NavegarResult<()> {
        self.browser.close().await.map_err(NavegarError::driver)?;
        self.browser.wait().await.map_err(NavegarError::driver)?;
        Ok(())
    }
}

/// One Chromium tab, driven through `evaluate`
pub struct ChromiumDriver {
    page: Page,
    slow_mo: Duration,
}

impl ChromiumDriver {
    /// Run `body` against the first element matching `selector`, with the
    /// selector JSON-escaped into the script. `body` sees the element as
    /// `el`; a missing element evaluates to `null`.
    fn element_script(selector: &str, body: &str) -> NavegarResult<String> {
        let escaped = serde_json::to_string(selector)?;
        Ok(format!(
            "(() => {{ const el = document.querySelector({escaped}); if (!el) return null; return ({body}); }})()"
        ))
    }

    async fn eval(&self, script: String) -> NavegarResult<serde_json::Value> {
        let result = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(NavegarError::driver)?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    /// Evaluate against an element that must exist; `null` becomes a
    /// driver error naming the selector.
    async fn eval_element(
        &self,
        selector: &str,
        body: &str,
    ) -> NavegarResult<serde_json::Value> {
        let value = self.eval(Self::element_script(selector, body)?).await?;
        if value.is_null() {
            return Err(NavegarError::Driver {
                message: format!("no element matches '{selector}'"),
            });
        }
        Ok(value)
    }

    async fn pace(&self) {
        if !self.slow_mo.is_zero() {
            sleep(self.slow_mo).await;
        }
    }

    async fn ready_state(&self) -> NavegarResult<String> {
        let value = self.eval("document.readyState".to_string()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn navigate(&self, url: &str) -> NavegarResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| NavegarError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.pace().await;
        Ok(())
    }

    async fn wait_for_load_state(
        &self,
        state: LoadState,
        timeout: Duration,
    ) -> NavegarResult<()> {
        let target = match state {
            LoadState::DomContentLoaded => "interactive",
            LoadState::Load | LoadState::NetworkIdle => "complete",
        };
        poll_until(&format!("document.readyState == {target}"), timeout, || async move {
            let ready = self.ready_state().await?;
            // readyState advances monotonically, so "complete" also
            // satisfies an "interactive" wait
            Ok(ready == target || ready == "complete")
        })
        .await?;
        if state == LoadState::NetworkIdle {
            // CDP network tracking is not wired up here; a quiet period
            // after `load` approximates idleness
            sleep(NETWORK_IDLE_QUIET).await;
        }
        Ok(())
    }

    async fn is_visible(&self, selector: &str) -> NavegarResult<bool> {
        let script = Self::element_script(
            selector,
            "(() => { const r = el.getBoundingClientRect(); \
             const s = window.getComputedStyle(el); \
             return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; })()",
        )?;
        Ok(self.eval(script).await?.as_bool().unwrap_or(false))
    }

    async fn is_enabled(&self, selector: &str) -> NavegarResult<bool> {
        let value = self.eval_element(selector, "!el.disabled").await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn click(&self, selector: &str) -> NavegarResult<()> {
        self.eval_element(selector, "(el.click(), true)").await?;
        self.pace().await;
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> NavegarResult<()> {
        let escaped = serde_json::to_string(value)?;
        let body = format!(
            "(() => {{ el.value = {escaped}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()"
        );
        self.eval_element(selector, &body).await?;
        self.pace().await;
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> NavegarResult<()> {
        let escaped = serde_json::to_string(text)?;
        let body = format!(
            "(() => {{ el.focus(); el.value = el.value + {escaped}; \
             el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             return true; }})()"
        );
        self.eval_element(selector, &body).await?;
        self.pace().await;
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> NavegarResult<()> {
        let escaped = serde_json::to_string(value)?;
        let body = format!(
            "(() => {{ el.value = {escaped}; \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()"
        );
        self.eval_element(selector, &body).await?;
        self.pace().await;
        Ok(())
    }

    async fn set_checked(&self, selector: &str, checked: bool) -> NavegarResult<()> {
        let body = format!(
            "(() => {{ el.checked = {checked}; \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true; }})()"
        );
        self.eval_element(selector, &body).await?;
        self.pace().await;
        Ok(())
    }

    async fn text_content(&self, selector: &str) -> NavegarResult<Option<String>> {
        let script = Self::element_script(selector, "el.textContent ?? ''")?;
        let value = self.eval(script).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn input_value(&self, selector: &str) -> NavegarResult<Option<String>> {
        let script = Self::element_script(selector, "el.value ?? ''")?;
        let value = self.eval(script).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn count(&self, selector: &str) -> NavegarResult<usize> {
        let escaped = serde_json::to_string(selector)?;
        let value = self
            .eval(format!("document.querySelectorAll({escaped}).length"))
            .await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn bounding_box(&self, selector: &str) -> NavegarResult<Option<BoundingBox>> {
        let script = Self::element_script(
            selector,
            "(() => { const r = el.getBoundingClientRect(); \
             return { x: r.x, y: r.y, width: r.width, height: r.height }; })()",
        )?;
        let value = self.eval(script).await?;
        if value.is_null() {
            return Ok(None);
        }
        let rect: serde_json::Map<String, serde_json::Value> = match value {
            serde_json::Value::Object(map) => map,
            _ => return Ok(None),
        };
        let get = |k: &str| rect.get(k).and_then(serde_json::Value::as_f64).unwrap_or(0.0);
        Ok(Some(BoundingBox::new(
            get("x"),
            get("y"),
            get("width"),
            get("height"),
        )))
    }

    async fn scroll_into_view(&self, selector: &str) -> NavegarResult<()> {
        self.eval_element(
            selector,
            "(el.scrollIntoView({ block: 'center', inline: 'nearest' }), true)",
        )
        .await?;
        Ok(())
    }

    async fn hover(&self, selector: &str) -> NavegarResult<()> {
        self.eval_element(
            selector,
            "(() => { el.dispatchEvent(new MouseEvent('mouseover', { bubbles: true })); \
             el.dispatchEvent(new MouseEvent('mouseenter', { bubbles: true })); \
             return true; })()",
        )
        .await?;
        self.pace().await;
        Ok(())
    }

    async fn current_url(&self) -> NavegarResult<String> {
        let value = self.eval("window.location.href".to_string()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn title(&self) -> NavegarResult<String> {
        let value = self.eval("document.title".to_string()).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn screenshot(&self) -> NavegarResult<Vec<u8>> {
        self.page
            .screenshot(ScreenshotParams::default())
            .await
            .map_err(NavegarError::driver)
    }

    async fn close(&self) -> NavegarResult<()> {
        self.page.clone().close().await.map_err(NavegarError::driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_script_escapes_selector() {
        let script =
            ChromiumDriver::element_script("a[href=\"/x\"]", "el.textContent").unwrap();
        assert!(script.contains("querySelector(\"a[href=\\\"/x\\\"]\")"));
        assert!(script.contains("if (!el) return null"));
    }

    #[test]
    fn test_element_script_handles_backticks() {
        let script = ChromiumDriver::element_script("`weird`", "true").unwrap();
        // JSON escaping neutralizes template-literal injection
        assert!(script.contains("\"`weird`\""));
    }
}
