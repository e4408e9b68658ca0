//! # Navegar
//!
//! Page-object end-to-end testing framework with externalized selectors
//! and a swappable browser driver.
//!
//! The layers, bottom up:
//!
//! - [`driver`]: the [`BrowserDriver`](driver::BrowserDriver) trait plus
//!   an in-memory [`MockDriver`](driver::MockDriver); the CDP-backed
//!   driver lives in [`cdp`] behind the `browser` feature
//! - [`registry`]: hierarchical YAML selector document with dotted-path
//!   resolution
//! - [`actions`]: wait-then-act element operations with implicit
//!   visibility waits and bounded timeouts
//! - [`pages`]: concrete page objects, composed from the layers above
//! - [`factory`]: by-name page construction with per-session caching
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use navegar::{
//!     MockDriver, PageFactory, PageObject, Session, Settings, TestContext,
//! };
//!
//! # async fn run() -> navegar::NavegarResult<()> {
//! let ctx = Arc::new(TestContext::new(Settings::from_env()?)?);
//! let session = Session::new(Arc::new(MockDriver::new()));
//! let mut factory = PageFactory::new(session, ctx);
//!
//! let lookup = factory.get_page("home")?;
//! lookup.page.wait_for_page_load().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod actions;
#[cfg(feature = "browser")]
pub mod cdp;
pub mod context;
pub mod driver;
pub mod element;
pub mod factory;
pub mod page;
pub mod pages;
pub mod registry;
pub mod result;
pub mod session;
pub mod settings;
pub mod tracing_support;
pub mod wait;

pub use actions::Actions;
#[cfg(feature = "browser")]
pub use cdp::{ChromiumBrowser, ChromiumDriver};
pub use context::TestContext;
pub use driver::{BrowserDriver, MockDriver, MockElement};
pub use element::{BoundingBox, ElementHandle, ElementRef};
pub use factory::{PageFactory, PageLookup};
pub use page::{GenericPage, PageObject, PageReadiness};
pub use registry::{SelectorGroup, SelectorNode, SelectorRegistry};
pub use result::{NavegarError, NavegarResult};
pub use session::Session;
pub use settings::{BrowserKind, Settings};
pub use wait::LoadState;
