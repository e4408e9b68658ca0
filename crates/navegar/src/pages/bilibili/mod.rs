//! Page objects for the Bilibili video platform.
//!
//! Bilibili pages are rendered client-side and churn their markup often,
//! so readiness goes through anchor races rather than bare load events.

mod home;
mod login;
mod search;
mod video;

pub use home::HomePage;
pub use login::LoginPage;
pub use search::SearchResultsPage;
pub use video::VideoPage;

/// Base address for absolute Bilibili navigation
pub const BASE_URL: &str = "https://www.bilibili.com";
