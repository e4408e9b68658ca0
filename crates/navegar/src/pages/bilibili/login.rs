//! Bilibili login modal.

use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::element::ElementRef;
use crate::page::{race_anchors, PageObject, PageReadiness};
use crate::result::NavegarResult;

/// Login modal with QR, password, and mobile tabs
pub struct LoginPage {
    actions: Actions,
    username_input: ElementRef,
    password_input: ElementRef,
    login_submit_button: ElementRef,
    qr_code_login_tab: ElementRef,
    password_login_tab: ElementRef,
    mobile_login_tab: ElementRef,
    qr_code_container: ElementRef,
    error_message: ElementRef,
    forget_password_link: ElementRef,
    register_link: ElementRef,
    close_button: ElementRef,
    captcha_image: ElementRef,
    login_form: ElementRef,
}

impl LoginPage {
    /// Selector group this page resolves at construction
    pub const SELECTOR_GROUP: &'static str = "bilibili.loginPage";

    /// Per-anchor bound used by the readiness race
    const ANCHOR_TIMEOUT: Duration = Duration::from_secs(10);

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
            login_submit_button: group.require("loginSubmitButton")?.into(),
            qr_code_login_tab: group.require("qrCodeLoginTab")?.into(),
            password_login_tab: group.require("passwordLoginTab")?.into(),
            mobile_login_tab: group.require("mobileLoginTab")?.into(),
            qr_code_container: group.require("qrCodeContainer")?.into(),
            error_message: group.require("errorMessage")?.into(),
            forget_password_link: group.require("forgetPasswordLink")?.into(),
            register_link: group.require("registerLink")?.into(),
            close_button: group.require("closeButton")?.into(),
            captcha_image: group.require("captchaImage")?.into(),
            login_form: group.require("loginForm")?.into(),
            actions,
        })
    }

    /// Switch to the password tab.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the tab never appears.
    pub async fn switch_to_password_login(&self) -> NavegarResult<()> {
        self.actions.click(&self.password_login_tab, None).await
    }

    /// Switch to the QR code tab.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the tab never appears.
    pub async fn switch_to_qr_code_login(&self) -> NavegarResult<()> {
        self.actions.click(&self.qr_code_login_tab, None).await
    }

    /// Switch to the mobile tab.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the tab never appears.
    pub async fn switch_to_mobile_login(&self) -> NavegarResult<()> {
        self.actions.click(&self.mobile_login_tab, None).await
    }

    /// Switch to the password tab, fill credentials, and submit.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if any step fails.
    pub async fn login(&self, username: &str, password: &str) -> NavegarResult<()> {
        self.switch_to_password_login().await?;
        self.actions.fill(&self.username_input, username, None).await?;
        self.actions.fill(&self.password_input, password, None).await?;
        self.actions.click(&self.login_submit_button, None).await
    }

    /// Error tip text, `None` when no error is shown
    pub async fn error_message(&self) -> Option<String> {
        if self.actions.is_visible(&self.error_message, None).await {
            self.actions.get_text(&self.error_message, None).await.ok()
        } else {
            None
        }
    }

    /// Whether the error tip is showing, waiting for it to render
    pub async fn is_login_failed(&self) -> bool {
        self.actions.is_visible(&self.error_message, None).await
    }

    /// Whether a captcha challenge is showing
    pub async fn is_captcha_required(&self) -> bool {
        self.actions.is_visible(&self.captcha_image, None).await
    }

    /// Whether the QR code pane rendered
    pub async fn is_qr_code_visible(&self) -> bool {
        self.actions.is_visible(&self.qr_code_container, None).await
    }

    /// Follow the password-recovery link.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the link never appears.
    pub async fn click_forget_password(&self) -> NavegarResult<()> {
        self.actions.click(&self.forget_password_link, None).await
    }

    /// Follow the registration link.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the link never appears.
    pub async fn click_register(&self) -> NavegarResult<()> {
        self.actions.click(&self.register_link, None).await
    }

    /// Dismiss the modal.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the close button never appears.
    pub async fn close(&self) -> NavegarResult<()> {
        self.actions.click(&self.close_button, None).await
    }
}

#[async_trait]
impl PageObject for LoginPage {
    fn page_name(&self) -> &str {
        "Bilibili Login"
    }

    fn actions(&self) -> &Actions {
        &self.actions
    }

    /// The modal's markup varies by rollout, so readiness races every
    /// element known to anchor it: the form, the three tabs, and the
    /// close button.
    async fn wait_for_page_load(&self) -> NavegarResult<PageReadiness> {
        let anchors = [
            self.login_form.clone(),
            self.qr_code_login_tab.clone(),
            self.password_login_tab.clone(),
            self.mobile_login_tab.clone(),
            self.close_button.clone(),
        ];
        Ok(race_anchors(
            self.page_name(),
            &self.actions,
            &anchors,
            Self::ANCHOR_TIMEOUT,
            Duration::from_secs(5),
        )
        .await)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
