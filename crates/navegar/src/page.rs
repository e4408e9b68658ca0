//! Page objects.
//!
//! A page object owns its [`Actions`] handle and the selector groups it
//! needs, resolved once at construction. Construction fails fast when a
//! required group is missing from the registry; readiness checks happen
//! later, in [`PageObject::wait_for_page_load`], because a page can be
//! constructed long before it is navigated to.
//!
//! Pages are composed, not subclassed: concrete pages embed `Actions`
//! directly and implement the trait, so there is no base-struct state to
//! inherit or shadow.

use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::select_ok;

use crate::actions::Actions;
use crate::element::ElementRef;
use crate::result::NavegarResult;
use crate::wait::LoadState;

/// Outcome of a readiness wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageReadiness {
    /// An anchor element confirmed the page rendered
    Ready,
    /// No anchor appeared; the page proceeded after a fallback delay and
    /// may not be fully usable
    Degraded,
}

impl PageReadiness {
    /// Whether the page reached readiness through the fallback path
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded)
    }
}

/// Behavior every page object exposes to the factory and to tests
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Human-readable page name, used in logs and factory lookups
    fn page_name(&self) -> &str;

    /// The action layer this page operates through
    fn actions(&self) -> &Actions;

    /// Block until the page is usable. The default implementation waits
    /// for the `load` event; pages with known anchor elements override
    /// this with [`race_anchors`].
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the page never reaches a load state.
    async fn wait_for_page_load(&self) -> NavegarResult<PageReadiness> {
        self.actions().wait_for_load_state(LoadState::Load).await?;
        Ok(PageReadiness::Ready)
    }

    /// Downcast support for callers that need the concrete page type back
    /// from a factory lookup
    fn as_any(&self) -> &dyn Any;
}

/// Race a set of anchor selectors: the page is ready as soon as any one of
/// them becomes visible. When none appears within `per_anchor_timeout`,
/// sleep for `fallback` and report [`PageReadiness::Degraded`] with a
/// warning instead of failing, since anchor churn on third-party pages is
/// routine and should not kill a whole run.
pub async fn race_anchors(
    page_name: &str,
    actions: &Actions,
    anchors: &[ElementRef],
    per_anchor_timeout: Duration,
    fallback: Duration,
) -> PageReadiness {
    if anchors.is_empty() {
        return PageReadiness::Ready;
    }
    let waits = anchors.iter().map(|anchor| {
        Box::pin(actions.wait_for_visible(anchor, Some(per_anchor_timeout)))
    });
    match select_ok(waits).await {
        Ok(_) => PageReadiness::Ready,
        Err(_) => {
            tracing::warn!(
                page = page_name,
                "no anchor element appeared; continuing after fallback delay"
            );
            tokio::time::sleep(fallback).await;
            PageReadiness::Degraded
        }
    }
}

/// Fallback page returned by the factory for names it does not recognize.
/// Carries no selectors; only generic navigation and readiness.
pub struct GenericPage {
    name: String,
    actions: Actions,
}

impl GenericPage {
    /// Create a generic page under the given name
    #[must_use]
    pub fn new(name: impl Into<String>, actions: Actions) -> Self {
        Self {
            name: name.into(),
            actions,
        }
    }
}

#[async_trait]
impl PageObject for GenericPage {
    fn page_name(&self) -> &str {
        &self.name
    }

    fn actions(&self) -> &Actions {
        &self.actions
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::session::Session;
    use crate::settings::Settings;
    use std::sync::Arc;

    fn actions_with(driver: Arc<MockDriver>) -> Actions {
        let session = Session::new(driver);
        let settings = Settings::default().with_element_timeout(200);
        Actions::new(session, &settings)
    }

    #[tokio::test]
    async fn test_generic_page_reports_ready() {
        let actions = actions_with(Arc::new(MockDriver::new()));
        let page = GenericPage::new("unknown", actions);
        assert_eq!(page.page_name(), "unknown");
        let readiness = page.wait_for_page_load().await.unwrap();
        assert_eq!(readiness, PageReadiness::Ready);
    }

    mod anchor_race_tests {
        use super::*;

        #[tokio::test]
        async fn test_first_anchor_wins() {
            let driver = Arc::new(MockDriver::new());
            driver.add_element(".nav-bar", MockElement::visible());
            let actions = actions_with(driver);
            let anchors = [
                ElementRef::from("#missing"),
                ElementRef::from(".nav-bar"),
            ];
            let readiness = race_anchors(
                "home",
                &actions,
                &anchors,
                Duration::from_millis(200),
                Duration::from_millis(10),
            )
            .await;
            assert_eq!(readiness, PageReadiness::Ready);
        }

        #[tokio::test]
        async fn test_no_anchor_degrades_instead_of_failing() {
            let actions = actions_with(Arc::new(MockDriver::new()));
            let anchors = [ElementRef::from("#a"), ElementRef::from("#b")];
            let readiness = race_anchors(
                "login",
                &actions,
                &anchors,
                Duration::from_millis(50),
                Duration::from_millis(10),
            )
            .await;
            assert!(readiness.is_degraded());
        }

        #[tokio::test]
        async fn test_late_anchor_still_wins() {
            let driver = Arc::new(MockDriver::new());
            driver.add_element("#late", MockElement::visible_after(2));
            let actions = actions_with(driver);
            let anchors = [ElementRef::from("#late")];
            let readiness = race_anchors(
                "video",
                &actions,
                &anchors,
                Duration::from_millis(500),
                Duration::from_millis(10),
            )
            .await;
            assert_eq!(readiness, PageReadiness::Ready);
        }

        #[tokio::test]
        async fn test_empty_anchor_list_is_ready() {
            let actions = actions_with(Arc::new(MockDriver::new()));
            let readiness = race_anchors(
                "blank",
                &actions,
                &[],
                Duration::from_millis(50),
                Duration::from_millis(10),
            )
            .await;
            assert_eq!(readiness, PageReadiness::Ready);
        }
    }

    #[test]
    fn test_downcast_through_as_any() {
        let actions = actions_with(Arc::new(MockDriver::new()));
        let page: Box<dyn PageObject> = Box::new(GenericPage::new("x", actions));
        assert!(page.as_any().downcast_ref::<GenericPage>().is_some());
    }
}
