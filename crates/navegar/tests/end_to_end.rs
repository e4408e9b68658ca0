//! End-to-end flows through the public API against the mock driver.

use std::sync::Arc;

use navegar::pages::parabank;
use navegar::{
    Actions, BrowserDriver, MockDriver, MockElement, NavegarError, PageFactory, PageObject,
    PageReadiness, SelectorRegistry, Session, Settings, TestContext,
};

const SELECTORS_YAML: &str = include_str!("../../../config/selectors.yaml");

fn test_context() -> Arc<TestContext> {
    let registry = SelectorRegistry::from_yaml(SELECTORS_YAML, "config/selectors.yaml")
        .expect("selector document parses");
    let settings = Settings::default()
        .with_base_url("https://parabank.parasoft.com/parabank/")
        .with_element_timeout(200);
    Arc::new(TestContext::with_registry(settings, registry))
}

fn harness() -> (Arc<MockDriver>, Session, Arc<TestContext>) {
    let driver = Arc::new(MockDriver::new());
    let session = Session::new(driver.clone());
    (driver, session, test_context())
}

fn install(driver: &MockDriver, selectors: &[&str]) {
    for selector in selectors {
        driver.add_element(*selector, MockElement::visible());
    }
}

#[tokio::test]
async fn login_flow_through_page_object() {
    let (driver, session, ctx) = harness();
    install(
        &driver,
        &[
            ".login input[name=\"username\"]",
            ".login input[name=\"password\"]",
            ".login [type=\"submit\"]",
        ],
    );

    let actions = Actions::new(session, ctx.settings());
    let login = parabank::LoginPage::new(actions, &ctx).expect("selector group present");

    login.open().await.unwrap();
    login.login("john", "demo").await.unwrap();

    assert_eq!(
        driver.current_url().await.unwrap(),
        "https://parabank.parasoft.com/parabank/index.htm"
    );
    assert_eq!(
        driver.input_value(".login input[name=\"username\"]").await.unwrap(),
        Some("john".to_string())
    );
}

#[tokio::test]
async fn timeout_surfaces_selector_and_leaves_dom_untouched() {
    let (driver, session, ctx) = harness();
    driver.add_element(".login input[name=\"username\"]", MockElement::hidden());

    let actions = Actions::new(session, ctx.settings());
    let login = parabank::LoginPage::new(actions, &ctx).unwrap();

    match login.login("john", "demo").await {
        Err(NavegarError::Timeout { selector, ms }) => {
            assert_eq!(selector, ".login input[name=\"username\"]");
            assert_eq!(ms, 200);
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(driver.calls_matching("fill").is_empty());
    assert!(driver.calls_matching("click").is_empty());
}

#[tokio::test]
async fn factory_serves_cached_pages_until_cleared() {
    let (_, session, ctx) = harness();
    let mut factory = PageFactory::new(session, ctx);

    let first = factory.get_page("parabank.login").unwrap();
    let second = factory.get_page("PARABANK.LOGIN").unwrap();
    assert!(Arc::ptr_eq(&first.page, &second.page));
    assert!(!first.fallback);

    factory.clear();
    let third = factory.get_page("parabank.login").unwrap();
    assert!(!Arc::ptr_eq(&first.page, &third.page));
}

#[tokio::test]
async fn factory_flags_unknown_names() {
    let (_, session, ctx) = harness();
    let mut factory = PageFactory::new(session, ctx);

    let lookup = factory.get_page("dashboard").unwrap();
    assert!(lookup.fallback);
    assert_eq!(lookup.page.page_name(), "dashboard");

    // A generic page still supports readiness waits
    let readiness = lookup.page.wait_for_page_load().await.unwrap();
    assert_eq!(readiness, PageReadiness::Ready);
}

#[tokio::test]
async fn two_sessions_do_not_share_page_caches() {
    let ctx = test_context();
    let session_a = Session::new(Arc::new(MockDriver::new()));
    let session_b = Session::new(Arc::new(MockDriver::new()));
    let mut factory_a = PageFactory::new(session_a, ctx.clone());
    let mut factory_b = PageFactory::new(session_b, ctx);

    let a = factory_a.get_page("video").unwrap();
    let b = factory_b.get_page("video").unwrap();
    assert!(!Arc::ptr_eq(&a.page, &b.page));
}

#[tokio::test]
async fn missing_selector_group_fails_page_construction() {
    let registry = SelectorRegistry::from_yaml("parabank:\n  other: {}\n", "inline").unwrap();
    let ctx = Arc::new(TestContext::with_registry(Settings::default(), registry));
    let session = Session::new(Arc::new(MockDriver::new()));
    let mut factory = PageFactory::new(session, ctx);

    let err = factory.get_page("parabank.login").unwrap_err();
    assert!(matches!(
        err,
        NavegarError::MissingSelectorGroup { ref path } if path == "parabank.loginPage"
    ));
}

#[tokio::test]
async fn bilibili_search_flow() {
    let (driver, session, ctx) = harness();
    install(
        &driver,
        &[
            "#nav-searchform > input",
            "#nav-searchform > div > button",
        ],
    );
    driver.add_element(
        ".bili-video-card",
        MockElement {
            count: 20,
            ..MockElement::default()
        },
    );

    let mut factory = PageFactory::new(session, ctx);
    let lookup = factory.get_page("home").unwrap();
    let home = lookup
        .page
        .as_any()
        .downcast_ref::<navegar::pages::bilibili::HomePage>()
        .expect("concrete home page");

    home.search("rust").await.unwrap();
    assert_eq!(home.video_card_count().await.unwrap(), 20);
    assert_eq!(home.wait_for_page_load().await.unwrap(), PageReadiness::Ready);
}

#[tokio::test]
async fn registry_missing_path_is_probe_not_failure() {
    let ctx = test_context();
    assert!(ctx.registry().resolve("parabank.loginPage.usernameInput").is_some());
    assert!(ctx.registry().resolve("parabank.loginPage.missing").is_none());
    assert!(ctx.registry().resolve_group("parabank.missingPage").is_none());
}
