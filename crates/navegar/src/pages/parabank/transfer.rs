//! ParaBank transfer funds page.

use std::any::Any;

use async_trait::async_trait;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::element::ElementRef;
use crate::page::PageObject;
use crate::result::NavegarResult;

/// Funds transfer form
pub struct TransferFundsPage {
    actions: Actions,
    amount_input: ElementRef,
    from_account_select: ElementRef,
    to_account_select: ElementRef,
    transfer_button: ElementRef,
    success_message: ElementRef,
    error_message: ElementRef,
}

impl TransferFundsPage {
    /// Selector group this page resolves at construction
    pub const SELECTOR_GROUP: &'static str = "parabank.transferFundsPage";

    /// Construct the page, resolving its selector group.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` when the group or any required leaf
    /// is absent from the registry.
    pub fn new(actions: Actions, ctx: &TestContext) -> NavegarResult<Self> {
        let group = ctx.registry().require_group(Self::SELECTOR_GROUP)?;
        Ok(Self {
            amount_input: group.require("amountInput")?.into(),
            from_account_select: group.require("fromAccountSelect")?.into(),
            to_account_select: group.require("toAccountSelect")?.into(),
            transfer_button: group.require("transferButton")?.into(),
            success_message: group.require("successMessage")?.into(),
            error_message: group.require("errorMessage")?.into(),
            actions,
        })
    }

    /// Open the transfer form.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` on load failure.
    pub async fn open(&self) -> NavegarResult<()> {
        self.actions.navigate("transfer.htm").await
    }

    /// Transfer `amount` between the accounts at the given option indices.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if any form element never appears.
    pub async fn transfer_funds(
        &self,
        amount: f64,
        from_index: usize,
        to_index: usize,
    ) -> NavegarResult<()> {
        self.actions
            .fill(&self.amount_input, &amount.to_string(), None)
            .await?;
        self.actions
            .select_option(&self.from_account_select, &from_index.to_string(), None)
            .await?;
        self.actions
            .select_option(&self.to_account_select, &to_index.to_string(), None)
            .await?;
        self.actions.click(&self.transfer_button, None).await
    }

    /// Confirmation banner text.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the banner never appears.
    pub async fn success_message(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.success_message, None).await
    }

    /// Error text.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if no error panel ever appears.
    pub async fn error_message(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.error_message, None).await
    }
}

#[async_trait]
impl PageObject for TransferFundsPage {
    fn page_name(&self) -> &str {
        "ParaBank Transfer Funds"
    }

    fn actions(&self) -> &Actions {
        &self.actions
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
