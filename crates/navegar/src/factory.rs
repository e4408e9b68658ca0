//! Page factory with per-session caching.
//!
//! The factory hands out page objects by name, constructing each page at
//! most once per factory and serving the same `Arc` afterwards. Names are
//! case-insensitive and alias-friendly ("home", "homepage"); an unknown
//! name yields a generic page, flagged as a fallback so callers can tell
//! a deliberate lookup from a typo.

use std::collections::HashMap;
use std::sync::Arc;

use crate::actions::Actions;
use crate::context::TestContext;
use crate::page::{GenericPage, PageObject};
use crate::pages::{bilibili, parabank};
use crate::result::NavegarResult;
use crate::session::Session;

/// Result of a factory lookup
#[derive(Clone)]
pub struct PageLookup {
    /// The page object, cached per factory
    pub page: Arc<dyn PageObject>,
    /// Whether the name was unrecognized and a generic page substituted
    pub fallback: bool,
}

impl std::fmt::Debug for PageLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageLookup")
            .field("page", &self.page.page_name())
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Constructs and caches page objects for one session
pub struct PageFactory {
    session: Session,
    ctx: Arc<TestContext>,
    cache: HashMap<String, PageLookup>,
}

impl PageFactory {
    /// Create a factory bound to a session and context
    #[must_use]
    pub fn new(session: Session, ctx: Arc<TestContext>) -> Self {
        Self {
            session,
            ctx,
            cache: HashMap::new(),
        }
    }

    /// Look up a page by name, constructing it on first use.
    ///
    /// Known names (case-insensitive, including aliases) yield their
    /// concrete page. Unknown names yield a [`GenericPage`] with
    /// `fallback` set, after a logged warning. Repeat lookups under any
    /// alias of the same page return the identical `Arc`.
    ///
    /// # Errors
    ///
    /// Returns `MissingSelectorGroup` when a known page's selector group
    /// is absent from the registry.
    pub fn get_page(&mut self, name: &str) -> NavegarResult<PageLookup> {
        let canonical = canonical_name(name);
        if let Some(hit) = self.cache.get(&canonical) {
            return Ok(hit.clone());
        }

        let actions = Actions::new(self.session.clone(), self.ctx.settings());
        let lookup = self.construct(&canonical, actions)?;
        self.cache.insert(canonical, lookup.clone());
        Ok(lookup)
    }

    /// Drop every cached page; subsequent lookups construct fresh
    /// instances.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of distinct pages currently cached
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn construct(&self, canonical: &str, actions: Actions) -> NavegarResult<PageLookup> {
        let ctx = &self.ctx;
        let page: Arc<dyn PageObject> = match canonical {
            "bilibili.home" => Arc::new(bilibili::HomePage::new(actions, ctx)?),
            "bilibili.login" => Arc::new(bilibili::LoginPage::new(actions, ctx)?),
            "bilibili.search" => Arc::new(bilibili::SearchResultsPage::new(actions, ctx)?),
            "bilibili.video" => Arc::new(bilibili::VideoPage::new(actions, ctx)?),
            "parabank.login" => Arc::new(parabank::LoginPage::new(actions, ctx)?),
            "parabank.home" => Arc::new(parabank::HomePage::new(actions, ctx)?),
            "parabank.register" => Arc::new(parabank::RegisterPage::new(actions, ctx)?),
            "parabank.transfer" => Arc::new(parabank::TransferFundsPage::new(actions, ctx)?),
            "parabank.billpay" => Arc::new(parabank::BillPayPage::new(actions, ctx)?),
            other => {
                tracing::warn!(name = other, "unknown page name, serving generic page");
                return Ok(PageLookup {
                    page: Arc::new(GenericPage::new(other, actions)),
                    fallback: true,
                });
            }
        };
        Ok(PageLookup {
            page,
            fallback: false,
        })
    }
}

/// Map a requested name to its canonical form. Unqualified names belong
/// to the Bilibili suite; ParaBank pages use the `parabank.` prefix.
fn canonical_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.as_str() {
        "home" | "homepage" | "bilibili.home" | "bilibili.homepage" => "bilibili.home",
        "login" | "loginpage" | "bilibili.login" | "bilibili.loginpage" => "bilibili.login",
        "search" | "searchresults" | "searchresultspage" | "bilibili.search" => "bilibili.search",
        "video" | "videopage" | "bilibili.video" | "bilibili.videopage" => "bilibili.video",
        "parabank.login" | "parabank.loginpage" => "parabank.login",
        "parabank.home" | "parabank.homepage" | "parabank.overview" => "parabank.home",
        "parabank.register" | "parabank.registerpage" => "parabank.register",
        "parabank.transfer" | "parabank.transferfunds" => "parabank.transfer",
        "parabank.billpay" | "parabank.billpaypage" => "parabank.billpay",
        _ => return lower,
    }
    .to_string()
}
