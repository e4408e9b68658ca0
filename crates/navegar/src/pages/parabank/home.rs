//! ParaBank accounts overview page.

use std::any::Any;

use async_trait::async_trait;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::element::ElementRef;
use crate::page::PageObject;
use crate::result::NavegarResult;

/// Logged-in landing page with the account menu and balances
pub struct HomePage {
    actions: Actions,
    account_overview_link: ElementRef,
    transfer_funds_link: ElementRef,
    bill_pay_link: ElementRef,
    find_transactions_link: ElementRef,
    update_contact_info_link: ElementRef,
    logout_link: ElementRef,
    welcome_message: ElementRef,
    account_number_links: ElementRef,
    balance_amounts: ElementRef,
}

impl HomePage {
    /// Selector group this page resolves at construction
    pub const SELECTOR_GROUP: &'static str = "parabank.homePage";

    /// Construct the page, resolving its selector group.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` when the group or any required leaf
    /// is absent from the registry.
    pub fn new(actions: Actions, ctx: &TestContext) -> NavegarResult<Self> {
        let group = ctx.registry().require_group(Self::SELECTOR_GROUP)?;
        Ok(Self {
            account_overview_link: group.require("accountOverviewLink")?.into(),
            transfer_funds_link: group.require("transferFundsLink")?.into(),
            bill_pay_link: group.require("billPayLink")?.into(),
            find_transactions_link: group.require("findTransactionsLink")?.into(),
            update_contact_info_link: group.require("updateContactInfoLink")?.into(),
            logout_link: group.require("logoutLink")?.into(),
            welcome_message: group.require("welcomeMessage")?.into(),
            account_number_links: group.require("accountNumberLinks")?.into(),
            balance_amounts: group.require("balanceAmounts")?.into(),
            actions,
        })
    }

    /// Open the overview page.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` on load failure.
    pub async fn open(&self) -> NavegarResult<()> {
        self.actions.navigate("overview.htm").await
    }

    /// Open the accounts overview via the menu.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the link never appears.
    pub async fn click_account_overview(&self) -> NavegarResult<()> {
        self.actions.click(&self.account_overview_link, None).await
    }

    /// Open the transfer funds form via the menu.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the link never appears.
    pub async fn click_transfer_funds(&self) -> NavegarResult<()> {
        self.actions.click(&self.transfer_funds_link, None).await
    }

    /// Open the bill pay form via the menu.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the link never appears.
    pub async fn click_bill_pay(&self) -> NavegarResult<()> {
        self.actions.click(&self.bill_pay_link, None).await
    }

    /// Open the transaction search via the menu.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the link never appears.
    pub async fn click_find_transactions(&self) -> NavegarResult<()> {
        self.actions.click(&self.find_transactions_link, None).await
    }

    /// Open the contact info form via the menu.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the link never appears.
    pub async fn click_update_contact_info(&self) -> NavegarResult<()> {
        self.actions.click(&self.update_contact_info_link, None).await
    }

    /// Log out of the session.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the logout link never appears.
    pub async fn logout(&self) -> NavegarResult<()> {
        self.actions.click(&self.logout_link, None).await
    }

    /// Welcome banner text.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the banner never appears.
    pub async fn welcome_message(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.welcome_message, None).await
    }

    /// Account numbers listed in the overview table.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if a counted link never renders, or a driver
    /// error if the count query fails.
    pub async fn account_numbers(&self) -> NavegarResult<Vec<String>> {
        let count = self.actions.count(&self.account_number_links).await?;
        let mut numbers = Vec::with_capacity(count);
        for i in 0..count {
            let text = self.actions.get_text(self.account_number_links.nth(i), None).await?;
            if !text.is_empty() {
                numbers.push(text);
            }
        }
        Ok(numbers)
    }

    /// Balance of the account at `index`, parsed from the displayed
    /// amount. Currency symbols and separators are stripped; an unreadable
    /// cell reads as zero.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the cell never appears.
    pub async fn account_balance(&self, index: usize) -> NavegarResult<f64> {
        let text = self.actions.get_text(self.balance_amounts.nth(index), None).await?;
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        Ok(cleaned.parse().unwrap_or(0.0))
    }

    /// Click the account link at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the link never appears.
    pub async fn click_account_number(&self, index: usize) -> NavegarResult<()> {
        self.actions.click(self.account_number_links.nth(index), None).await
    }
}

#[async_trait]
impl PageObject for HomePage {
    fn page_name(&self) -> &str {
        "ParaBank Home"
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

    #[tokio::test]
    async fn test_balance_parsing_strips_currency() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element(
            ".balance:nth-of-type(1)",
            MockElement::with_text("$1,234.56"),
        );
        let page = HomePage::new(actions, &ctx).unwrap();
        let balance = page.account_balance(0).await.unwrap();
        assert!((balance - 1234.56).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_unreadable_balance_reads_zero() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element(".balance:nth-of-type(1)", MockElement::with_text("N/A"));
        let page = HomePage::new(actions, &ctx).unwrap();
        assert!(page.account_balance(0).await.unwrap().abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_balance_cell_times_out() {
        let ctx = context();
        let (_, actions) = mock_actions(&ctx);
        let page = HomePage::new(actions, &ctx).unwrap();
        assert!(matches!(
            page.account_balance(0).await,
            Err(crate::result::NavegarError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_account_numbers_collects_nonempty() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        let base = "a[href^=\"/parabank/activity.htm?id=\"]";
        driver.add_element(
            base,
            MockElement {
                count: 2,
                ..MockElement::default()
            },
        );
        driver.add_element(
            format!("{base}:nth-of-type(1)"),
            MockElement::with_text("13344"),
        );
        driver.add_element(
            format!("{base}:nth-of-type(2)"),
            MockElement::with_text("13455"),
        );
        let page = HomePage::new(actions, &ctx).unwrap();
        assert_eq!(page.account_numbers().await.unwrap(), vec!["13344", "13455"]);
    }

    #[tokio::test]
    async fn test_logout_clicks_link() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element("a[href=\"/parabank/logout.htm\"]", MockElement::visible());
        let page = HomePage::new(actions, &ctx).unwrap();
        page.logout().await.unwrap();
        assert!(!driver.calls_matching("click").is_empty());
    }
}
