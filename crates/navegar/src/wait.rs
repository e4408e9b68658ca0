//! Polling primitives shared by the Action Layer.
//!
//! Every wait in the framework is a poll loop over a driver probe: check,
//! sleep, check again, until the bound expires. Timeouts surface the
//! selector and the configured bound so a failing test names the element
//! it was stuck on.

use std::future::Future;
use std::time::Instant;
use tokio::time::{sleep, Duration};

use crate::result::{NavegarError, NavegarResult};

/// Default polling interval for wait loops (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Page load states the driver can wait on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// The `load` event has fired
    #[default]
    Load,
    /// `DOMContentLoaded` has fired
    DomContentLoaded,
    /// No network activity for a quiet period
    NetworkIdle,
}

impl LoadState {
    /// Event name for logging and JS-side checks
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "domcontentloaded",
            Self::NetworkIdle => "networkidle",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Poll `probe` until it reports `true` or `timeout` expires.
///
/// Transient probe errors are swallowed and retried: a probe failure while
/// the page is mid-render is indistinguishable from "not ready yet". Only
/// the deadline produces an error, a `Timeout` carrying `selector` and the
/// configured bound.
///
/// # Errors
///
/// Returns `Timeout` when the deadline passes without a `true` probe.
pub(crate) async fn poll_until<F, Fut>(
    selector: &str,
    timeout: Duration,
    mut probe: F,
) -> NavegarResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = NavegarResult<bool>>,
{
    let start = Instant::now();
    loop {
        match probe().await {
            Ok(true) => return Ok(()),
            Ok(false) | Err(_) => {}
        }
        if start.elapsed() >= timeout {
            return Err(NavegarError::Timeout {
                selector: selector.to_string(),
                ms: timeout.as_millis() as u64,
            });
        }
        sleep(poll_interval(timeout)).await;
    }
}

/// Keep sub-second timeouts responsive in tests while polling at the
/// default cadence for real waits.
fn poll_interval(timeout: Duration) -> Duration {
    if timeout < DEFAULT_POLL_INTERVAL * 4 {
        Duration::from_millis(5)
    } else {
        DEFAULT_POLL_INTERVAL
    }
}
