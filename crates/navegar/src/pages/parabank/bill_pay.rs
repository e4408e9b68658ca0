//! ParaBank bill payment page.

use std::any::Any;

use async_trait::async_trait;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::element::ElementRef;
use crate::page::PageObject;
use crate::result::NavegarResult;

/// Payee details for the bill pay form
#[derive(Debug, Clone, Default)]
pub struct PayeeInfo {
    /// Payee name
    pub name: String,
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
}

/// Payment details for the bill pay form
#[derive(Debug, Clone, Default)]
pub struct PaymentInfo {
    /// Payee account number
    pub account: String,
    /// Account number confirmation
    pub verify_account: String,
    /// Amount to pay
    pub amount: f64,
    /// Source account option index
    pub from_account_index: usize,
}

/// Bill payment form
pub struct BillPayPage {
    actions: Actions,
    payee_name_input: ElementRef,
    payee_address_input: ElementRef,
    payee_city_input: ElementRef,
    payee_state_input: ElementRef,
    payee_zip_code_input: ElementRef,
    payee_phone_input: ElementRef,
    payee_account_input: ElementRef,
    verify_account_input: ElementRef,
    amount_input: ElementRef,
    from_account_select: ElementRef,
    send_payment_button: ElementRef,
    success_message: ElementRef,
    error_messages: ElementRef,
}

impl BillPayPage {
    /// Selector group this page resolves at construction
    pub const SELECTOR_GROUP: &'static str = "parabank.billPayPage";

    /// Construct the page, resolving its selector group.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` when the group or any required leaf
    /// is absent from the registry.
    pub fn new(actions: Actions, ctx: &TestContext) -> NavegarResult<Self> {
        let group = ctx.registry().require_group(Self::SELECTOR_GROUP)?;
        Ok(Self {
            payee_name_input: group.require("payeeNameInput")?.into(),
            payee_address_input: group.require("payeeAddressInput")?.into(),
            payee_city_input: group.require("payeeCityInput")?.into(),
            payee_state_input: group.require("payeeStateInput")?.into(),
            payee_zip_code_input: group.require("payeeZipCodeInput")?.into(),
            payee_phone_input: group.require("payeePhoneInput")?.into(),
            payee_account_input: group.require("payeeAccountInput")?.into(),
            verify_account_input: group.require("verifyAccountInput")?.into(),
            amount_input: group.require("amountInput")?.into(),
            from_account_select: group.require("fromAccountSelect")?.into(),
            send_payment_button: group.require("sendPaymentButton")?.into(),
            success_message: group.require("successMessage")?.into(),
            error_messages: group.require("errorMessages")?.into(),
            actions,
        })
    }

    /// Open the bill pay form.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` on load failure.
    pub async fn open(&self) -> NavegarResult<()> {
        self.actions.navigate("billpay.htm").await
    }

    /// Fill the payee section.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if any field never appears.
    pub async fn fill_payee_info(&self, info: &PayeeInfo) -> NavegarResult<()> {
        self.actions.fill(&self.payee_name_input, &info.name, None).await?;
        self.actions.fill(&self.payee_address_input, &info.address, None).await?;
        self.actions.fill(&self.payee_city_input, &info.city, None).await?;
        self.actions.fill(&self.payee_state_input, &info.state, None).await?;
        self.actions.fill(&self.payee_zip_code_input, &info.zip_code, None).await?;
        self.actions.fill(&self.payee_phone_input, &info.phone, None).await
    }

    /// Fill the payment section.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if any field never appears.
    pub async fn fill_payment_info(&self, info: &PaymentInfo) -> NavegarResult<()> {
        self.actions.fill(&self.payee_account_input, &info.account, None).await?;
        self.actions
            .fill(&self.verify_account_input, &info.verify_account, None)
            .await?;
        self.actions
            .fill(&self.amount_input, &info.amount.to_string(), None)
            .await?;
        self.actions
            .select_option(&self.from_account_select, &info.from_account_index.to_string(), None)
            .await
    }

    /// Fill both sections and submit.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if any step fails.
    pub async fn pay_bill(&self, payee: &PayeeInfo, payment: &PaymentInfo) -> NavegarResult<()> {
        self.fill_payee_info(payee).await?;
        self.fill_payment_info(payment).await?;
        self.actions.click(&self.send_payment_button, None).await
    }

    /// Confirmation banner text.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the banner never appears.
    pub async fn success_message(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.success_message, None).await
    }

    /// All validation error texts currently shown.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if a counted message never renders, or a driver
    /// error if the count query fails.
    pub async fn error_messages(&self) -> NavegarResult<Vec<String>> {
        let count = self.actions.count(&self.error_messages).await?;
        let mut messages = Vec::with_capacity(count);
        for i in 0..count {
            let text = self.actions.get_text(self.error_messages.nth(i), None).await?;
            if !text.is_empty() {
                messages.push(text);
            }
        }
        Ok(messages)
    }
}

#[async_trait]
impl PageObject for BillPayPage {
    fn page_name(&self) -> &str {
        "ParaBank Bill Pay"
    }

    fn actions(&self) -> &Actions {
        &self.actions
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
