//! Browser sessions.
//!
//! A [`Session`] pairs a unique id with a driver handle. Page objects and
//! factories scoped to one session share the driver through cheap clones;
//! two sessions never share state.

use std::sync::Arc;

use uuid::Uuid;

use crate::driver::BrowserDriver;
use crate::result::NavegarResult;

/// A single browser session
#[derive(Clone)]
pub struct Session {
    id: Uuid,
    driver: Arc<dyn BrowserDriver>,
}

impl Session {
    /// Wrap a driver in a fresh session
    #[must_use]
    pub fn new(driver: Arc<dyn BrowserDriver>) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver,
        }
    }

    /// Unique id for this session
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The driver backing this session
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn BrowserDriver> {
        &self.driver
    }

    /// Close the underlying browser page.
    ///
    /// # Errors
    ///
    /// Returns a driver error if teardown fails.
    pub async fn close(&self) -> NavegarResult<()> {
        tracing::debug!(session = %self.id, "closing session");
        self.driver.close().await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish()
    }
}
