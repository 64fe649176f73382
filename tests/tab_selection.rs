//! End-to-end tests for the tab widget: mount resolution, deep links,
//! navigation interception, and the shared selection store, driven the way
//! a documentation-page host would drive them.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use tabkit::prelude::*;

/// Render collaborator standing in for a documentation page
struct PageHost {
    render_requests: AtomicUsize,
    focused: Mutex<Vec<usize>>,
}

impl PageHost {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            render_requests: AtomicUsize::new(0),
            focused: Mutex::new(Vec::new()),
        })
    }

    fn render_requests(&self) -> usize {
        self.render_requests.load(Ordering::SeqCst)
    }

    fn focused(&self) -> Vec<usize> {
        self.focused.lock().unwrap().clone()
    }
}

impl RenderHost for PageHost {
    fn request_render(&self) {
        self.render_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn focus_header(&self, index: usize) {
        self.focused.lock().unwrap().push(index);
    }
}

/// Drive one render pass the way a host would: render the tree, then
/// report completion so deferred navigations continue
fn complete_render_pass(tabs: &Tabs) {
    tabs.render().unwrap();
    tabs.render_complete();
}

fn package_manager_tabs() -> Vec<TabDescriptor> {
    vec![
        TabDescriptor::new("cargo"),
        TabDescriptor::new("binstall").with_nav_id("install-binstall"),
        TabDescriptor::new("source"),
    ]
}

fn create_mounted(
    group_id: &str,
    store: &TabStore,
    router: &Arc<MemoryRouter>,
    host: &Arc<PageHost>,
) -> Tabs {
    let context = Context::new(host.clone())
        .with_store(store.clone())
        .with_router(router.clone() as Arc<dyn Router>);

    let mut tabs = Tabs::create(
        TabsProps {
            group_id: group_id.to_string(),
            store_key: Some("package-manager".to_string()),
            tabs: package_manager_tabs(),
            default_active_index: None,
            fragment: None,
        },
        context,
    );
    tabs.mount().unwrap();
    tabs
}

#[test]
fn deep_link_to_tab_anchor_opens_tab_before_navigation_commits() {
    let host = PageHost::new();
    let router = Arc::new(MemoryRouter::new());
    let store = TabStore::new();
    let tabs = create_mounted("install", &store, &router, &host);
    assert_eq!(tabs.active_index(), 0);

    router.navigate(NavigationTarget::parse("/guide/install#install-binstall"));

    // the tab switched and a render was requested, but the navigation is
    // still suspended
    assert_eq!(tabs.active_index(), 1);
    assert!(host.render_requests() >= 1);
    assert_eq!(router.current_fragment(), None);

    complete_render_pass(&tabs);
    assert_eq!(router.current_fragment(), Some("install-binstall".to_string()));

    // route-driven resolution never persists
    assert_eq!(store.get("package-manager"), None);
}

#[test]
fn deep_link_into_panel_content_opens_owning_tab() {
    let host = PageHost::new();
    let router = Arc::new(MemoryRouter::new());
    let store = TabStore::new();
    let tabs = create_mounted("install", &store, &router, &host);

    // the "source" panel mounts and its headings are scanned
    tabs.panel_mounted(
        2,
        r##"<h3>Build flags <a class="header-anchor" href="#build-flags">#</a></h3>"##,
    );

    router.navigate(NavigationTarget::parse("/guide/install#build-flags"));
    complete_render_pass(&tabs);

    assert_eq!(tabs.active_index(), 2);
    assert_eq!(router.current_fragment(), Some("build-flags".to_string()));
}

#[test]
fn interaction_persists_and_other_groups_follow() {
    let host = PageHost::new();
    let router = Arc::new(MemoryRouter::new());
    let store = TabStore::new();

    let first = create_mounted("install-linux", &store, &router, &host);
    let second = create_mounted("install-macos", &store, &router, &host);

    first.handle_click(1);

    assert_eq!(store.get("package-manager"), Some("binstall".to_string()));
    assert_eq!(second.active_index(), 1);

    // adopting did not write back; the store holds exactly the clicked id
    let mut event = KeyboardEvent::new(KeyCode::ArrowRight);
    second.handle_keydown(&mut event, 1);
    assert_eq!(store.get("package-manager"), Some("source".to_string()));
    assert_eq!(first.active_index(), 2);
}

#[test]
fn selection_survives_reload_via_store_snapshot() {
    let host = PageHost::new();
    let router = Arc::new(MemoryRouter::new());

    let snapshot = {
        let store = TabStore::new();
        let tabs = create_mounted("install", &store, &router, &host);
        tabs.handle_click(2);
        store.snapshot().unwrap()
    };

    // a later page load restores the session store before mounting widgets
    let store = TabStore::new();
    store.restore(&snapshot).unwrap();
    let tabs = create_mounted("install", &store, &router, &host);

    assert_eq!(tabs.active_index(), 2);
}

#[test]
fn mount_resolution_prefers_store_over_fragment_over_default() {
    let host = PageHost::new();
    let router = Arc::new(MemoryRouter::with_fragment("install-binstall"));

    // fragment alone resolves
    let store = TabStore::new();
    let tabs = create_mounted("install", &store, &router, &host);
    assert_eq!(tabs.active_index(), 1);
    drop(tabs);

    // a persisted value outranks the fragment
    let store = TabStore::new();
    store.insert("package-manager", "source");
    let tabs = create_mounted("install", &store, &router, &host);
    assert_eq!(tabs.active_index(), 2);
}

#[test]
fn keyboard_navigation_wraps_and_moves_focus() {
    let host = PageHost::new();
    let router = Arc::new(MemoryRouter::new());
    let store = TabStore::new();
    let tabs = create_mounted("install", &store, &router, &host);

    let mut left = KeyboardEvent::new(KeyCode::ArrowLeft);
    tabs.handle_keydown(&mut left, 0);
    assert!(left.is_default_prevented());
    assert_eq!(tabs.active_index(), 2);

    let mut enter = KeyboardEvent::new(KeyCode::Enter);
    tabs.handle_keydown(&mut enter, 0);
    assert_eq!(tabs.active_index(), 0);

    assert_eq!(host.focused(), vec![2]);
}

#[test]
fn unmount_during_suspended_navigation_releases_it_cleanly() {
    let host = PageHost::new();
    let router = Arc::new(MemoryRouter::new());
    let store = TabStore::new();
    let mut tabs = create_mounted("install", &store, &router, &host);

    router.navigate(NavigationTarget::parse("/guide/install#install-binstall"));
    assert_eq!(router.current_fragment(), None);

    tabs.unmount().unwrap();

    // the navigation went through, and the dead group ignores later events
    assert_eq!(router.current_fragment(), Some("install-binstall".to_string()));
    store.insert("package-manager", "source");
    assert_eq!(tabs.active_index(), 1);
}

#[test]
fn routerless_host_still_resolves_mount_fragment() {
    let host = PageHost::new();
    let context = Context::new(host.clone()).with_store(TabStore::new());

    let mut tabs = Tabs::create(
        TabsProps {
            group_id: "install".to_string(),
            store_key: None,
            tabs: package_manager_tabs(),
            default_active_index: None,
            fragment: Some("#install-binstall".to_string()),
        },
        context,
    );
    tabs.mount().unwrap();

    assert_eq!(tabs.active_index(), 1);
}
