//! ParaBank customer registration page.

use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::element::ElementRef;
use crate::page::PageObject;
use crate::result::NavegarResult;

/// Personal details for the registration form
#[derive(Debug, Clone, Default)]
pub struct PersonalInfo {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State
    pub state: String,
    /// Zip code
    pub zip_code: String,
    /// Phone number
    pub phone: String,
    /// Social security number
    pub ssn: String,
}

/// Credentials for the registration form
#[derive(Debug, Clone, Default)]
pub struct AccountInfo {
    /// Desired username
    pub username: String,
    /// Password
    pub password: String,
    /// Password confirmation
    pub confirm_password: String,
}

/// Registration form page
pub struct RegisterPage {
    actions: Actions,
    register_form: ElementRef,
    first_name_input: ElementRef,
    last_name_input: ElementRef,
    address_input: ElementRef,
    city_input: ElementRef,
    state_input: ElementRef,
    zip_code_input: ElementRef,
    phone_input: ElementRef,
    ssn_input: ElementRef,
    username_input: ElementRef,
    password_input: ElementRef,
    confirm_password_input: ElementRef,
    register_button: ElementRef,
    register_button_by_value: ElementRef,
    success_message: ElementRef,
    error_messages: ElementRef,
}

impl RegisterPage {
    /// Selector group this page resolves at construction
    pub const SELECTOR_GROUP: &'static str = "parabank.registerPage";

    /// Construct the page, resolving its selector group.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` when the group or any required leaf
    /// is absent from the registry.
    pub fn new(actions: Actions, ctx: &TestContext) -> NavegarResult<Self> {
        let group = ctx.registry().require_group(Self::SELECTOR_GROUP)?;
        Ok(Self {
            register_form: group.require("registerForm")?.into(),
            first_name_input: group.require("firstNameInput")?.into(),
            last_name_input: group.require("lastNameInput")?.into(),
            address_input: group.require("addressInput")?.into(),
            city_input: group.require("cityInput")?.into(),
            state_input: group.require("stateInput")?.into(),
            zip_code_input: group.require("zipCodeInput")?.into(),
            phone_input: group.require("phoneInput")?.into(),
            ssn_input: group.require("ssnInput")?.into(),
            username_input: group.require("usernameInput")?.into(),
            password_input: group.require("passwordInput")?.into(),
            confirm_password_input: group.require("confirmPasswordInput")?.into(),
            register_button: group.require("registerButton")?.into(),
            register_button_by_value: group.require("registerButtonByValue")?.into(),
            success_message: group.require("successMessage")?.into(),
            error_messages: group.require("errorMessages")?.into(),
            actions,
        })
    }

    /// Open the registration form.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` on load failure.
    pub async fn open(&self) -> NavegarResult<()> {
        self.actions.navigate("register.htm").await
    }

    /// Fill the personal details section.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if any field never appears.
    pub async fn fill_personal_info(&self, info: &PersonalInfo) -> NavegarResult<()> {
        self.actions.fill(&self.first_name_input, &info.first_name, None).await?;
        self.actions.fill(&self.last_name_input, &info.last_name, None).await?;
        self.actions.fill(&self.address_input, &info.address, None).await?;
        self.actions.fill(&self.city_input, &info.city, None).await?;
        self.actions.fill(&self.state_input, &info.state, None).await?;
        self.actions.fill(&self.zip_code_input, &info.zip_code, None).await?;
        self.actions.fill(&self.phone_input, &info.phone, None).await?;
        self.actions.fill(&self.ssn_input, &info.ssn, None).await
    }

    /// Fill the credentials section.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if any field never appears.
    pub async fn fill_account_info(&self, info: &AccountInfo) -> NavegarResult<()> {
        self.actions.fill(&self.username_input, &info.username, None).await?;
        self.actions.fill(&self.password_input, &info.password, None).await?;
        self.actions
            .fill(&self.confirm_password_input, &info.confirm_password, None)
            .await
    }

    /// Submit the form. The register button markup has shifted between
    /// ParaBank deployments, so the click falls through a chain of
    /// selectors: the form-scoped one, the value-attribute one, then a
    /// generic submit-input match.
    ///
    /// # Errors
    ///
    /// Returns the last `Timeout` when no candidate selector ever appears.
    pub async fn click_register_button(&self) -> NavegarResult<()> {
        self.actions.wait_for_visible(&self.register_form, None).await?;

        for candidate in [&self.register_button, &self.register_button_by_value] {
            match self.try_click(candidate).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!(selector = %candidate, error = %e, "register button candidate failed");
                }
            }
        }
        self.try_click(&ElementRef::from("input[type=\"submit\"][value=\"Register\"]"))
            .await
    }

    async fn try_click(&self, element: &ElementRef) -> NavegarResult<()> {
        self.actions.scroll_to(element).await.ok();
        self.actions.click(element, None).await
    }

    /// Fill both sections and submit.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if any step fails.
    pub async fn register(
        &self,
        personal: &PersonalInfo,
        account: &AccountInfo,
    ) -> NavegarResult<()> {
        self.fill_personal_info(personal).await?;
        self.fill_account_info(account).await?;
        self.click_register_button().await
    }

    /// Whether registration redirected to the overview page. Polls the
    /// URL for up to the page timeout; staying on the register page reads
    /// as failure, not an error.
    pub async fn is_registration_successful(&self) -> bool {
        let deadline = std::time::Instant::now() + self.actions.page_timeout();
        loop {
            if let Ok(url) = self.actions.current_url().await {
                if url.contains("overview.htm") {
                    return true;
                }
            }
            if std::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Success banner text.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the banner never appears.
    pub async fn success_message(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.success_message, None).await
    }

    /// All validation error texts currently shown, deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if a counted message never renders, or a driver
    /// error if the count query fails.
    pub async fn error_messages(&self) -> NavegarResult<Vec<String>> {
        let count = self.actions.count(&self.error_messages).await?;
        let mut messages: Vec<String> = Vec::new();
        for i in 0..count {
            let text = self.actions.get_text(self.error_messages.nth(i), None).await?;
            if !text.is_empty() && !messages.contains(&text) {
                messages.push(text);
            }
        }
        Ok(messages)
    }
}

#[async_trait]
impl PageObject for RegisterPage {
    fn page_name(&self) -> &str {
        "ParaBank Register"
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
    use crate::driver::{BrowserDriver, MockElement};
    use crate::pages::test_support::{context, mock_actions};
    use crate::result::NavegarError;

    fn sample_personal() -> PersonalInfo {
        PersonalInfo {
            first_name: "John".into(),
            last_name: "Smith".into(),
            address: "1 Main St".into(),
            city: "Beverly Hills".into(),
            state: "CA".into(),
            zip_code: "90210".into(),
            phone: "555-0100".into(),
            ssn: "123-45-6789".into(),
        }
    }

    fn install_form(driver: &crate::driver::MockDriver) {
        for selector in [
            "#customerForm",
            "input[id=\"customer.firstName\"]",
            "input[id=\"customer.lastName\"]",
            "input[id=\"customer.address.street\"]",
            "input[id=\"customer.address.city\"]",
            "input[id=\"customer.address.state\"]",
            "input[id=\"customer.address.zipCode\"]",
            "input[id=\"customer.phoneNumber\"]",
            "input[id=\"customer.ssn\"]",
            "input[id=\"customer.username\"]",
            "input[id=\"customer.password\"]",
            "input[id=\"repeatedPassword\"]",
        ] {
            driver.add_element(selector, MockElement::visible());
        }
    }

    #[tokio::test]
    async fn test_register_fills_all_fields_and_submits() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        install_form(&driver);
        driver.add_element("#customerForm input[type=\"submit\"]", MockElement::visible());

        let page = RegisterPage::new(actions, &ctx).unwrap();
        let account = AccountInfo {
            username: "jsmith".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
        };
        page.register(&sample_personal(), &account).await.unwrap();

        assert_eq!(driver.calls_matching("fill").len(), 11);
        assert!(!driver.calls_matching("click(#customerForm input").is_empty());
    }

    #[tokio::test]
    async fn test_register_button_falls_back_to_value_selector() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element("#customerForm", MockElement::visible());
        // Primary selector absent; value-attribute selector present
        driver.add_element("input[value=\"Register\"]", MockElement::visible());

        let page = RegisterPage::new(actions, &ctx).unwrap();
        page.click_register_button().await.unwrap();
        assert!(!driver
            .calls_matching("click(input[value=\"Register\"])")
            .is_empty());
    }

    #[tokio::test]
    async fn test_register_button_error_when_no_candidate_exists() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element("#customerForm", MockElement::visible());

        let page = RegisterPage::new(actions, &ctx).unwrap();
        // The error is the final candidate's own timeout
        match page.click_register_button().await {
            Err(NavegarError::Timeout { selector, ms }) => {
                assert_eq!(selector, "input[type=\"submit\"][value=\"Register\"]");
                assert_eq!(ms, 200);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_registration_success_detected_from_url() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver
            .navigate("https://parabank.parasoft.com/parabank/overview.htm")
            .await
            .unwrap();
        let page = RegisterPage::new(actions, &ctx).unwrap();
        assert!(page.is_registration_successful().await);
    }

    #[tokio::test]
    async fn test_error_messages_deduplicated() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element(
            ".error",
            MockElement {
                count: 2,
                ..MockElement::default()
            },
        );
        driver.add_element(
            ".error:nth-of-type(1)",
            MockElement::with_text("Username already exists"),
        );
        driver.add_element(
            ".error:nth-of-type(2)",
            MockElement::with_text("Username already exists"),
        );
        let page = RegisterPage::new(actions, &ctx).unwrap();
        assert_eq!(
            page.error_messages().await.unwrap(),
            vec!["Username already exists"]
        );
    }
}
