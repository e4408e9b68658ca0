//! Bilibili home page.

use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::element::ElementRef;
use crate::page::{race_anchors, PageObject, PageReadiness};
use crate::result::NavegarResult;

/// Landing page with the search bar, nav menu, and recommended feed
pub struct HomePage {
    actions: Actions,
    login_button: ElementRef,
    search_input: ElementRef,
    search_button: ElementRef,
    search_history: ElementRef,
    user_avatar: ElementRef,
    nav_menu: ElementRef,
    video_cards: ElementRef,
    featured_section: ElementRef,
    live_section: ElementRef,
    anime_section: ElementRef,
    game_section: ElementRef,
    footer: ElementRef,
}

impl HomePage {
    /// Selector group this page resolves at construction
    pub const SELECTOR_GROUP: &'static str = "bilibili.homePage";

    /// Construct the page, resolving its selector group.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` when the group or any required leaf
    /// is absent from the registry.
    pub fn new(actions: Actions, ctx: &TestContext) -> NavegarResult<Self> {
        let group = ctx.registry().require_group(Self::SELECTOR_GROUP)?;
        Ok(Self {
            login_button: group.require("loginButton")?.into(),
            search_input: group.require("searchInput")?.into(),
            search_button: group.require("searchButton")?.into(),
            search_history: group.require("searchHistory")?.into(),
            user_avatar: group.require("userAvatar")?.into(),
            nav_menu: group.require("navMenu")?.into(),
            video_cards: group.require("videoCards")?.into(),
            featured_section: group.require("featuredSection")?.into(),
            live_section: group.require("liveSection")?.into(),
            anime_section: group.require("animeSection")?.into(),
            game_section: group.require("gameSection")?.into(),
            footer: group.require("footer")?.into(),
            actions,
        })
    }

    /// Open the home page.
    ///
    /// # Errors
    ///
    /// Returns `Navigation` on load failure.
    pub async fn open(&self) -> NavegarResult<()> {
        self.actions.navigate(super::BASE_URL).await
    }

    /// Open the login modal.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the entry button never appears.
    pub async fn click_login_button(&self) -> NavegarResult<()> {
        self.actions.click(&self.login_button, None).await
    }

    /// Type `keyword` into the search bar and submit.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the search bar never appears.
    pub async fn search(&self, keyword: &str) -> NavegarResult<()> {
        self.actions.fill(&self.search_input, keyword, None).await?;
        self.actions.click(&self.search_button, None).await
    }

    /// Hover the search bar until the history dropdown shows.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the dropdown never appears.
    pub async fn show_search_history(&self) -> NavegarResult<()> {
        self.actions.hover(&self.search_input).await?;
        self.actions.wait_for_visible(&self.search_history, None).await
    }

    /// Whether an avatar is shown in place of the login entry
    pub async fn is_user_logged_in(&self) -> bool {
        self.actions.is_visible(&self.user_avatar, None).await
    }

    /// Open the user menu.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the avatar never appears.
    pub async fn click_user_avatar(&self) -> NavegarResult<()> {
        self.actions.click(&self.user_avatar, None).await
    }

    /// Number of video cards in the feed, after waiting for the first one.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if no card ever appears.
    pub async fn video_card_count(&self) -> NavegarResult<usize> {
        self.actions.wait_for_visible(&self.video_cards, None).await?;
        self.actions.count(&self.video_cards).await
    }

    /// Click the feed card at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the card never appears.
    pub async fn click_video_card(&self, index: usize) -> NavegarResult<()> {
        self.actions.click(self.video_cards.nth(index), None).await
    }

    /// Whether the recommended feed section rendered
    pub async fn is_featured_section_visible(&self) -> bool {
        self.actions.is_visible(&self.featured_section, None).await
    }

    /// Whether the live entry rendered
    pub async fn is_live_section_visible(&self) -> bool {
        self.actions.is_visible(&self.live_section, None).await
    }

    /// Whether the anime entry rendered
    pub async fn is_anime_section_visible(&self) -> bool {
        self.actions.is_visible(&self.anime_section, None).await
    }

    /// Whether the game entry rendered
    pub async fn is_game_section_visible(&self) -> bool {
        self.actions.is_visible(&self.game_section, None).await
    }

    /// Whether the footer rendered
    pub async fn is_footer_visible(&self) -> bool {
        self.actions.is_visible(&self.footer, None).await
    }

    /// Nav menu element, for callers composing their own interactions
    #[must_use]
    pub const fn nav_menu(&self) -> &ElementRef {
        &self.nav_menu
    }
}

#[async_trait]
impl PageObject for HomePage {
    fn page_name(&self) -> &str {
        "Bilibili Home"
    }

    fn actions(&self) -> &Actions {
        &self.actions
    }

    async fn wait_for_page_load(&self) -> NavegarResult<PageReadiness> {
        let anchors = [self.featured_section.clone(), self.video_cards.clone()];
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

    #[tokio::test]
    async fn test_search_fills_and_clicks() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element("#nav-searchform > input", MockElement::visible());
        driver.add_element("#nav-searchform > div > button", MockElement::visible());

        let page = HomePage::new(actions, &ctx).unwrap();
        page.search("rust async").await.unwrap();

        let history = driver.call_history();
        assert!(history.contains(&"fill(#nav-searchform > input, rust async)".to_string()));
        assert!(history.last().unwrap().starts_with("click(#nav-searchform"));
    }

    #[tokio::test]
    async fn test_logged_out_without_avatar() {
        let ctx = context();
        let (_, actions) = mock_actions(&ctx);
        let page = HomePage::new(actions, &ctx).unwrap();
        assert!(!page.is_user_logged_in().await);
    }

    #[tokio::test]
    async fn test_video_card_count_waits_first() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element(
            ".bili-video-card",
            MockElement {
                count: 12,
                ..MockElement::visible_after(1)
            },
        );
        let page = HomePage::new(actions, &ctx).unwrap();
        assert_eq!(page.video_card_count().await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_page_load_ready_when_feed_renders() {
        let ctx = context();
        let (driver, actions) = mock_actions(&ctx);
        driver.add_element(".bili-video-card", MockElement::visible());
        let page = HomePage::new(actions, &ctx).unwrap();
        let readiness = page.wait_for_page_load().await.unwrap();
        assert_eq!(readiness, PageReadiness::Ready);
    }

    #[tokio::test]
    async fn test_page_load_degrades_without_anchors() {
        let ctx = context();
        let (_, actions) = mock_actions(&ctx);
        let page = HomePage::new(actions, &ctx).unwrap();
        // Only exercised with short timeouts; the fallback sleep is 5s
        let readiness = race_anchors(
            page.page_name(),
            page.actions(),
            &[ElementRef::from("#absent")],
            Duration::from_millis(50),
            Duration::from_millis(10),
        )
        .await;
        assert!(readiness.is_degraded());
    }
}
