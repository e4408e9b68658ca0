//! Bilibili video playback page.

use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::element::ElementRef;
use crate::page::{race_anchors, PageObject, PageReadiness};
use crate::result::NavegarResult;

/// Player page with danmaku, comments, and the triple-action bar
pub struct VideoPage {
    actions: Actions,
    video_player: ElementRef,
    play_button: ElementRef,
    pause_button: ElementRef,
    progress_bar: ElementRef,
    current_time: ElementRef,
    total_time: ElementRef,
    volume_control: ElementRef,
    fullscreen_button: ElementRef,
    danmaku_input: ElementRef,
    danmaku_send_button: ElementRef,
    comments_section: ElementRef,
    comment_input: ElementRef,
    comment_send_button: ElementRef,
    comments_list: ElementRef,
    like_button: ElementRef,
    coin_button: ElementRef,
    favorite_button: ElementRef,
    share_button: ElementRef,
    video_title: ElementRef,
    up_name: ElementRef,
    view_count: ElementRef,
    related_videos: ElementRef,
    subscribe_button: ElementRef,
    video_tags: ElementRef,
}

impl VideoPage {
    /// Selector group this page resolves at construction
    pub const SELECTOR_GROUP: &'static str = "bilibili.videoPage";

    /// Construct the page, resolving its selector group.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` when the group or any required leaf
    /// is absent from the registry.
    pub fn new(actions: Actions, ctx: &TestContext) -> NavegarResult<Self> {
        let group = ctx.registry().require_group(Self::SELECTOR_GROUP)?;
        Ok(Self {
            video_player: group.require("videoPlayer")?.into(),
            play_button: group.require("playButton")?.into(),
            pause_button: group.require("pauseButton")?.into(),
            progress_bar: group.require("progressBar")?.into(),
            current_time: group.require("currentTime")?.into(),
            total_time: group.require("totalTime")?.into(),
            volume_control: group.require("volumeControl")?.into(),
            fullscreen_button: group.require("fullscreenButton")?.into(),
            danmaku_input: group.require("danmakuInput")?.into(),
            danmaku_send_button: group.require("danmakuSendButton")?.into(),
            comments_section: group.require("commentsSection")?.into(),
            comment_input: group.require("commentInput")?.into(),
            comment_send_button: group.require("commentSendButton")?.into(),
            comments_list: group.require("commentsList")?.into(),
            like_button: group.require("likeButton")?.into(),
            coin_button: group.require("coinButton")?.into(),
            favorite_button: group.require("favoriteButton")?.into(),
            share_button: group.require("shareButton")?.into(),
            video_title: group.require("videoTitle")?.into(),
            up_name: group.require("upName")?.into(),
            view_count: group.require("viewCount")?.into(),
            related_videos: group.require("relatedVideos")?.into(),
            subscribe_button: group.require("subscribeButton")?.into(),
            video_tags: group.require("videoTags")?.into(),
            actions,
        })
    }

    /// Start playback.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the play control never appears.
    pub async fn play(&self) -> NavegarResult<()> {
        self.actions.click(&self.play_button, None).await
    }

    /// Pause playback.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the pause control never appears.
    pub async fn pause(&self) -> NavegarResult<()> {
        self.actions.click(&self.pause_button, None).await
    }

    /// Progress bar element, for click-to-seek compositions
    #[must_use]
    pub const fn progress_bar(&self) -> &ElementRef {
        &self.progress_bar
    }

    /// Current playback position, as displayed.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the control bar never appears.
    pub async fn current_time(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.current_time, None).await
    }

    /// Total duration, as displayed.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the control bar never appears.
    pub async fn total_time(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.total_time, None).await
    }

    /// Toggle the mute state.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the volume control never appears.
    pub async fn toggle_volume(&self) -> NavegarResult<()> {
        self.actions.click(&self.volume_control, None).await
    }

    /// Toggle fullscreen.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the fullscreen control never appears.
    pub async fn toggle_fullscreen(&self) -> NavegarResult<()> {
        self.actions.click(&self.fullscreen_button, None).await
    }

    /// Send a danmaku (bullet comment).
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the danmaku bar never appears.
    pub async fn send_danmaku(&self, message: &str) -> NavegarResult<()> {
        self.actions.fill(&self.danmaku_input, message, None).await?;
        self.actions.click(&self.danmaku_send_button, None).await
    }

    /// Scroll down to the comments section.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the section does not exist.
    pub async fn scroll_to_comments(&self) -> NavegarResult<()> {
        self.actions.scroll_to(&self.comments_section).await
    }

    /// Scroll to the comments section and post a comment.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the comment box never appears.
    pub async fn post_comment(&self, comment: &str) -> NavegarResult<()> {
        self.scroll_to_comments().await?;
        self.actions.fill(&self.comment_input, comment, None).await?;
        self.actions.click(&self.comment_send_button, None).await
    }

    /// Texts of the loaded comments.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if a counted comment never renders, or a driver
    /// error if the count query fails.
    pub async fn comments(&self) -> NavegarResult<Vec<String>> {
        let count = self.actions.count(&self.comments_list).await?;
        let mut texts = Vec::with_capacity(count);
        for i in 0..count {
            let text = self.actions.get_text(self.comments_list.nth(i), None).await?;
            if !text.is_empty() {
                texts.push(text);
            }
        }
        Ok(texts)
    }

    /// Like the video.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the like button never appears.
    pub async fn like(&self) -> NavegarResult<()> {
        self.actions.click(&self.like_button, None).await
    }

    /// Open the coin dialog.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the coin button never appears.
    pub async fn coin(&self) -> NavegarResult<()> {
        self.actions.click(&self.coin_button, None).await
    }

    /// Open the favorite dialog.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the favorite button never appears.
    pub async fn favorite(&self) -> NavegarResult<()> {
        self.actions.click(&self.favorite_button, None).await
    }

    /// Open the share panel.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the share button never appears.
    pub async fn share(&self) -> NavegarResult<()> {
        self.actions.click(&self.share_button, None).await
    }

    /// Video title.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the title never appears.
    pub async fn title(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.video_title, None).await
    }

    /// Uploader name.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the uploader panel never appears.
    pub async fn up_name(&self) -> NavegarResult<String> {
        self.actions.get_text(&self.up_name, None).await
    }

    /// View count parsed from the stats bar, zero when unreadable.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the stats bar never appears.
    pub async fn view_count(&self) -> NavegarResult<u64> {
        let text = self.actions.get_text(&self.view_count, None).await?;
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        Ok(digits.parse().unwrap_or(0))
    }

    /// Follow the uploader.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the subscribe button never appears.
    pub async fn subscribe(&self) -> NavegarResult<()> {
        self.actions.click(&self.subscribe_button, None).await
    }

    /// Click the related video at `index`.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if the entry never appears.
    pub async fn click_related_video(&self, index: usize) -> NavegarResult<()> {
        self.actions.click(self.related_videos.nth(index), None).await
    }

    /// Tag texts under the video.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` if a counted tag never renders, or a driver
    /// error if the count query fails.
    pub async fn tags(&self) -> NavegarResult<Vec<String>> {
        let count = self.actions.count(&self.video_tags).await?;
        let mut texts = Vec::with_capacity(count);
        for i in 0..count {
            let text = self.actions.get_text(self.video_tags.nth(i), None).await?;
            if !text.is_empty() {
                texts.push(text);
            }
        }
        Ok(texts)
    }
}

#[async_trait]
impl PageObject for VideoPage {
    fn page_name(&self) -> &str {
        "Bilibili Video"
    }

    fn actions(&self) -> &Actions {
        &self.actions
    }

    async fn wait_for_page_load(&self) -> NavegarResult<PageReadiness> {
        let anchors = [self.video_player.clone()];
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
