//! Bilibili search results page.

use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::element::ElementRef;
use crate::page::{race_anchors, PageObject, PageReadiness};
use crate::result::NavegarResult;

/// Search results listing with filters and pagination
pub struct SearchResultsPage {
    actions: Actions,
    search_input: ElementRef,
    search_button: ElementRef,
    search_keyword: ElementRef,
    results_count: ElementRef,
    video_results: ElementRef,
    filter_tabs: ElementRef,
    sort_dropdown: ElementRef,
    pagination: ElementRef,
    current_page: ElementRef,
    next_page_button: ElementRef,
    previous_page_button: ElementRef,
    empty_results: ElementRef,
    result_cards: ElementRef,
    result_titles: ElementRef,
    result_authors: ElementRef,
}

impl SearchResultsPage {
    /// Selector group this page resolves at construction
    pub const SELECTOR_GROUP: &'static str = "bilibili.searchResultsPage";

    /// Construct the page, resolving its selector group.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` when the group or any required leaf
    /// is absent from the registry.
    pub fn new(actions: Actions, ctx: &TestContext) -> NavegarResult<Self> {
        let group = ctx.registry().require_group(Self::SELECTOR_GROUP)?;
        Ok(Self {
            search_input: group.require("searchInput")?.into(),
            search_button: group.require("searchButton")?.into(),
            search_keyword: group.require("searchKeyword")?.into(),
            results_count: group.require("resultsCount")?.into(),
            video_results: group.require("videoResults")?.into(),
            filter_tabs: group.require("filterTabs")?.into(),
            sort_dropdown: group.require("sortDropdown")?.into(),
            pagination: group.require("pagination")?.into(),
            current_page: group.require("currentPage")?.into(),
            next_page_button: group.require("nextPageButton")?.into(),
            previous_page_button: group.require("previousPageButton")?.into(),
            empty_results: group.require("emptyResults")?.into(),
            result_cards: group.require("resultCards")?.into(),
            result_titles: group.require("resultTitles")?.into(),
            result_authors: group.require("resultAuthors")?.into(),
            actions,
        })
    }

    /// The keyword the results are for.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the keyword header never appears.
    pub async fn current_keyword(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.search_keyword, None).await
    }

    /// Total result count parsed from the order bar, zero when unreadable.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the order bar never appears.
    pub async fn results_count(&self) -> NavegarResult<u64> {
        let text = self.actions.get_text(&self.results_count, None).await?;
        Ok(parse_leading_number(&text))
    }

    /// Number of result cards on this page.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the count query fails.
    pub async fn result_count_on_page(&self) -> NavegarResult<usize> {
        self.actions.count(&self.result_cards).await
    }

    /// Click the result card at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the card never appears.
    pub async fn click_result_card(&self, index: usize) -> NavegarResult<()> {
        self.actions.click(self.result_cards.nth(index), None).await
    }

    /// Titles of all results on this page.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the count query fails.
    pub async fn result_titles(&self) -> NavegarResult<Vec<String>> {
        self.collect_texts(&self.result_titles).await
    }

    /// Uploader names of all results on this page.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the count query fails.
    pub async fn result_authors(&self) -> NavegarResult<Vec<String>> {
        self.collect_texts(&self.result_authors).await
    }

    /// Whether any result title contains `keyword`, case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns a driver error if title collection fails.
    pub async fn has_result_with_keyword(&self, keyword: &str) -> NavegarResult<bool> {
        let needle = keyword.to_lowercase();
        Ok(self
            .result_titles()
            .await?
            .iter()
            .any(|t| t.to_lowercase().contains(&needle)))
    }

    /// Advance to the next page of results.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the button never appears.
    pub async fn go_to_next_page(&self) -> NavegarResult<()> {
        self.actions.click(&self.next_page_button, None).await
    }

    /// Return to the previous page of results.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the button never appears.
    pub async fn go_to_previous_page(&self) -> NavegarResult<()> {
        self.actions.click(&self.previous_page_button, None).await
    }

    /// Current page number, defaulting to 1 when the pagination text is
    /// unreadable.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the pagination never appears.
    pub async fn current_page(&self) -> NavegarResult<u64> {
        let text = self.actions.get_text(&self.current_page, None).await?;
        let n = parse_leading_number(&text);
        Ok(if n == 0 { 1 } else { n })
    }

    /// Whether the empty-results placeholder is showing
    pub async fn is_empty_results(&self) -> bool {
        self.actions.is_visible(&self.empty_results, None).await
    }

    /// Run a new search from the results page.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the search bar never appears.
    pub async fn refine_search(&self, keyword: &str) -> NavegarResult<()> {
        self.actions.fill(&self.search_input, keyword, None).await?;
        self.actions.click(&self.search_button, None).await
    }

    /// Filter tab container, for callers composing their own interactions
    #[must_use]
    pub const fn filter_tabs(&self) -> &ElementRef {
        &self.filter_tabs
    }

    /// Sort dropdown, for callers composing their own interactions
    #[must_use]
    pub const fn sort_dropdown(&self) -> &ElementRef {
        &self.sort_dropdown
    }

    /// Pagination container, for callers composing their own interactions
    #[must_use]
    pub const fn pagination(&self) -> &ElementRef {
        &self.pagination
    }

    async fn collect_texts(&self, element: &ElementRef) -> NavegarResult<Vec<String>> {
        let count = self.actions.count(element).await?;
        let mut texts = Vec::with_capacity(count);
        for i in 0..count {
            let text = self.actions.get_text(element.nth(i), None).await?;
            if !text.is_empty() {
                texts.push(text);
            }
        }
        Ok(texts)
    }
}

/// First run of digits in `text`, zero when none
fn parse_leading_number(text: &str) -> u64 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}

#[async_trait]
impl PageObject for SearchResultsPage {
    fn page_name(&self) -> &str {
        "Bilibili Search Results"
    }

    fn actions(&self) -> &Actions {
        &self.actions
    }

    async fn wait_for_page_load(&self) -> NavegarResult<PageReadiness> {
        let anchors = [self.video_results.clone(), self.empty_results.clone()];
        Ok(race_anchors(
            self.page_name(),
            &self.actions,
            &anchors,
            self.actions.element_timeout(),
            Duration::from_secs(5),
        )
        .await)
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

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("约 1,234 个结果"), 1);
        assert_eq!(parse_leading_number("got 42 hits"), 42);
        assert_eq!(parse_leading_number("none"), 0);
    }

    #[tokio::test]
    async fn test_result_titles_collects_in_order() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        let base = ".bili-video-card__info--right > h3 > a";
        driver.add_element(
            base,
            MockElement {
                count: 2,
                ..MockElement::default()
            },
        );
        driver.add_element(
            format!("{base}:nth-of-type(1)"),
            MockElement::with_text("Rust in 100 seconds"),
        );
        driver.add_element(
            format!("{base}:nth-of-type(2)"),
            MockElement::with_text("Tokio deep dive"),
        );
        let page = SearchResultsPage::new(actions, &ctx).unwrap();
        assert_eq!(
            page.result_titles().await.unwrap(),
            vec!["Rust in 100 seconds", "Tokio deep dive"]
        );
        assert!(page.has_result_with_keyword("RUST").await.unwrap());
        assert!(!page.has_result_with_keyword("python").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_results_detection() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element(".empty-results", MockElement::visible());
        let page = SearchResultsPage::new(actions, &ctx).unwrap();
        assert!(page.is_empty_results().await);
        assert_eq!(page.result_count_on_page().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_current_page_defaults_to_one() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        // Pagination rendered, but the active item carries no number yet
        driver.add_element(
            ".pagination > ul > li.page-item.active",
            MockElement::visible(),
        );
        let page = SearchResultsPage::new(actions, &ctx).unwrap();
        assert_eq!(page.current_page().await.unwrap(), 1);
    }
}
