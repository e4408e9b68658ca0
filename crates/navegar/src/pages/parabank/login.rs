//! ParaBank login page.

use std::any::Any;

use async_trait::async_trait;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::element::ElementRef;
use crate::page::PageObject;
use crate::result::NavegarResult;

/// Login form on the ParaBank landing page
pub struct LoginPage {
    actions: Actions,
    username_input: ElementRef,
    password_input: ElementRef,
    login_button: ElementRef,
    register_link: ElementRef,
    error_message: ElementRef,
    welcome_message: ElementRef,
}

impl LoginPage {
    /// Selector group this page resolves at construction
    pub const SELECTOR_GROUP: &'static str = "parabank.loginPage";

    /// Construct the page, resolving its selector group.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` when the group or any required leaf
    /// is absent from the registry.
    pub fn new(actions: Actions, ctx: &TestContext) -> NavegarResult<Self> {
        let group = ctx.registry().require_group(Self::SELECTOR_GROUP)?;
        Ok(Self {
            username_input: group.require("usernameInput")?.into(),
            password_input: group.require("passwordInput")?.into(),
            login_button: group.require("loginButton")?.into(),
            register_link: group.require("registerLink")?.into(),
            error_message: group.require("errorMessage")?.into(),
            welcome_message: group.require("welcomeMessage")?.into(),
            actions,
        })
    }

    /// Open the landing page.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` on load failure.
    pub async fn open(&self) -> NavegarResult<()> {
        self.actions.navigate("index.htm").await
    }

    /// Fill the credentials and submit.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if any form element never appears.
    pub async fn login(&self, username: &str, password: &str) -> NavegarResult<()> {
        self.actions.fill(&self.username_input, username, None).await?;
        self.actions.fill(&self.password_input, password, None).await?;
        self.actions.click(&self.login_button, None).await
    }

    /// Follow the registration link.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the link never appears.
    pub async fn click_register_link(&self) -> NavegarResult<()> {
        self.actions.click(&self.register_link, None).await
    }

    /// Whether the failed-login error tip is showing
    pub async fn is_login_failed(&self) -> bool {
        self.actions.is_visible(&self.error_message, None).await
    }

    /// Error text shown after a failed login.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if no error panel ever appears.
    pub async fn error_message(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.error_message, None).await
    }

    /// Welcome banner text.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the banner never appears.
    pub async fn welcome_message(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.welcome_message, None).await
    }

    /// Whether the submit button is enabled.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the button never appears.
    pub async fn is_login_button_enabled(&self) -> NavegarResult<bool> {
        self.actions.is_enabled(&self.login_button, None).await
    }
}

#[async_trait]
impl PageObject for LoginPage {
    fn page_name(&self) -> &str {
        "ParaBank Login"
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
    use crate::driver::MockElement;
    use crate::pages::test_support::{context, mock_actions};
    use crate::result::NavegarError;

    #[tokio::test]
    async fn test_login_fills_and_submits() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element(".login input[name=\"username\"]", MockElement::visible());
        driver.add_element(".login input[name=\"password\"]", MockElement::visible());
        driver.add_element(".login [type=\"submit\"]", MockElement::visible());

        let page = LoginPage::new(actions, &ctx).unwrap();
        page.login("john", "demo").await.unwrap();

        let history = driver.call_history();
        assert!(history.contains(&"fill(.login input[name=\"username\"], john)".to_string()));
        assert!(history.contains(&"fill(.login input[name=\"password\"], demo)".to_string()));
        assert!(history.last().unwrap().starts_with("click(.login"));
    }

    #[tokio::test]
    async fn test_error_message_times_out_when_absent() {
        let ctx = context();
        let (_, actions) = mock_actions(&ctx);
        let page = LoginPage::new(actions, &ctx).unwrap();
        assert!(matches!(
            page.error_message().await,
            Err(NavegarError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_error_message_read_once_panel_renders() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        // The panel renders a moment after the failed submit
        driver.add_element(
            ".error",
            MockElement {
                visible: false,
                visible_after: Some(2),
                ..MockElement::with_text("The username and password could not be verified.")
            },
        );
        let page = LoginPage::new(actions, &ctx).unwrap();
        assert!(page.is_login_failed().await);
        assert_eq!(
            page.error_message().await.unwrap(),
            "The username and password could not be verified."
        );
    }

    #[test]
    fn test_construction_fails_without_selector_group() {
        let ctx = crate::context::TestContext::with_registry(
            crate::settings::Settings::default(),
            crate::registry::SelectorRegistry::from_yaml("parabank: {}\n", "inline").unwrap(),
        );
        let (_, actions) = mock_actions(&ctx);
        let err = match LoginPage::new(actions, &ctx) {
            Ok(_) => panic!("construction should fail without the selector group"),
            Err(err) => err,
        };
        assert!(matches!(
            err,
            NavegarError::MissingSelectorGroup { ref path } if path == "parabank.loginPage"
        ));
    }
}
