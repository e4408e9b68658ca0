//! Concrete page objects for the applications under test.
//!
//! Every page follows the same shape: resolve the page's selector group at
//! construction (failing fast on a missing group or leaf), hold the
//! resolved selectors as [`ElementRef`](crate::element::ElementRef)s, and
//! express user-level operations through the shared
//! [`Actions`](crate::actions::Actions) handle.

pub mod bilibili;
pub mod parabank;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::actions::Actions;
    use crate::context::TestContext;
    use crate::driver::MockDriver;
    use crate::registry::SelectorRegistry;
    use crate::session::Session;
    use crate::settings::Settings;

    /// A context backed by the checked-in selector document, loaded from
    /// YAML text so page tests need no filesystem.
    pub fn context() -> TestContext {
        let yaml = include_str!("../../../../config/selectors.yaml");
        let registry = SelectorRegistry::from_yaml(yaml, "config/selectors.yaml").unwrap();
        TestContext::with_registry(Settings::default().with_element_timeout(200), registry)
    }

    /// A mock-backed action layer plus a handle to the driver for
    /// installing elements and inspecting the call history.
    pub fn mock_actions(ctx: &TestContext) -> (Arc<MockDriver>, Actions) {
        let driver = Arc::new(MockDriver::new());
        let session = Session::new(driver.clone());
        (driver, Actions::new(session, ctx.settings()))
    }
}
