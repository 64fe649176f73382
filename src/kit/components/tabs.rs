// Tabs widget for documentation pages

use crate::component::{Component, ComponentError, Context, Node};
use crate::events::KeyboardEvent;
use crate::tabs::{TabDescriptor, TabGroupConfig, TabSelectionController};

/// Properties for the Tabs component
#[derive(Debug, Clone)]
pub struct TabsProps {
    /// Unique identifier for this group, used for ARIA id pairing
    pub group_id: String,
    /// Key into the shared store; `None` disables persistence
    pub store_key: Option<String>,
    /// Tab data in display order
    pub tabs: Vec<TabDescriptor>,
    /// Initially active tab index
    pub default_active_index: Option<usize>,
    /// Current URL fragment for hosts without a router
    pub fragment: Option<String>,
}

/// Tabbed-content widget
///
/// Renders one header control per tab and one panel per tab, and keeps the
/// active tab consistent across interaction, deep links, navigation, and
/// the shared selection store. The host forwards clicks and key events to
/// [`Tabs::handle_click`] / [`Tabs::handle_keydown`], reports each panel's
/// mounted content through [`Tabs::panel_mounted`], and signals finished
/// render passes with [`Tabs::render_complete`].
pub struct Tabs {
    tabs: Vec<TabDescriptor>,
    controller: TabSelectionController,
}

impl Tabs {
    /// Get the selection-state controller backing this widget
    pub fn controller(&self) -> &TabSelectionController {
        &self.controller
    }

    /// Index of the currently active tab
    pub fn active_index(&self) -> usize {
        self.controller.active_index()
    }

    /// Handle a click on the header at `index`
    pub fn handle_click(&self, index: usize) {
        self.controller.handle_click(index);
    }

    /// Handle a key event delivered to the header at `index`
    pub fn handle_keydown(&self, event: &mut KeyboardEvent, index: usize) {
        self.controller.handle_keydown(event, index);
    }

    /// Report the rendered content of the panel at `index`, once per mount
    pub fn panel_mounted(&self, index: usize, content: &str) {
        self.controller.panel_mounted(index, content);
    }

    /// Report that the host committed one render pass
    pub fn render_complete(&self) {
        self.controller.render_complete();
    }

    fn panel_id(&self, index: usize) -> String {
        format!("tab-{}-{}", self.controller.group_id(), index)
    }
}

impl Component for Tabs {
    type Props = TabsProps;

    fn create(props: Self::Props, context: Context) -> Self {
        let config = TabGroupConfig {
            group_id: props.group_id,
            store_key: props.store_key,
            tabs: props.tabs.clone(),
            default_active_index: props.default_active_index.unwrap_or(0),
            fragment: props.fragment,
        };

        Self {
            tabs: props.tabs,
            controller: TabSelectionController::new(config, &context),
        }
    }

    fn mount(&mut self) -> Result<(), ComponentError> {
        self.controller.mount()
    }

    fn update(&mut self, props: Self::Props) -> Result<(), ComponentError> {
        // The tab list defines the index space the controller, the store
        // and the anchor cache all agree on; it is fixed for a mounted
        // group. Hosts swap the whole widget to change it.
        if props.tabs != self.tabs {
            return Err(ComponentError::UpdateError(
                "tab set of a mounted group cannot change".to_string(),
            ));
        }
        Ok(())
    }

    fn unmount(&mut self) -> Result<(), ComponentError> {
        self.controller.unmount()
    }

    fn render(&self) -> Result<Vec<Node>, ComponentError> {
        if self.tabs.is_empty() {
            return Ok(vec![]);
        }

        let active = self.controller.active_index();

        let mut nav = Node::element("div").class("tabs-nav").attr("role", "tablist");
        for (index, tab) in self.tabs.iter().enumerate() {
            let is_active = index == active;

            let mut header = Node::element("button")
                .class("tab-nav")
                .attr("type", "button")
                // anchor id the router scrolls to when the tab itself is
                // the navigation target
                .attr("id", tab.anchor_id())
                .attr("role", "tab")
                .attr("aria-controls", self.panel_id(index))
                .attr("aria-selected", if is_active { "true" } else { "false" });
            if is_active {
                header = header.class("active");
            }
            nav = nav.child(header.child(Node::text(tab.id())));
        }

        let mut root = Node::element("div").class("tabs").child(nav);
        for (index, tab) in self.tabs.iter().enumerate() {
            let is_active = index == active;

            let mut panel = Node::element("div")
                .class("tab")
                .attr("id", self.panel_id(index))
                .attr("role", "tabpanel")
                .attr("aria-expanded", if is_active { "true" } else { "false" });
            if is_active {
                panel = panel.class("active");
            }
            root = root.child(
                panel.child(Node::element("div").class("tab-title").child(Node::text(tab.id()))),
            );
        }

        Ok(vec![root])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::RenderHost;
    use crate::state::TabStore;
    use std::sync::Arc;

    struct NullHost;

    impl RenderHost for NullHost {
        fn request_render(&self) {}
        fn focus_header(&self, _index: usize) {}
    }

    fn mounted_tabs() -> Tabs {
        let context = Context::new(Arc::new(NullHost)).with_store(TabStore::new());
        let mut tabs = Tabs::create(
            TabsProps {
                group_id: "install".to_string(),
                store_key: None,
                tabs: vec![
                    TabDescriptor::new("cargo"),
                    TabDescriptor::new("binstall").with_nav_id("install-binstall"),
                ],
                default_active_index: None,
                fragment: None,
            },
            context,
        );
        tabs.mount().unwrap();
        tabs
    }

    #[test]
    fn test_render_aria_contract() {
        let tabs = mounted_tabs();
        let rendered = tabs.render().unwrap();
        let root = &rendered[0];

        let nav = &root.children()[0];
        assert_eq!(nav.attribute("role"), Some("tablist"));

        let first = &nav.children()[0];
        assert_eq!(first.tag(), "button");
        assert_eq!(first.attribute("role"), Some("tab"));
        assert_eq!(first.attribute("id"), Some("cargo"));
        assert_eq!(first.attribute("aria-selected"), Some("true"));
        assert_eq!(first.attribute("aria-controls"), Some("tab-install-0"));

        // nav_id overrides the header's anchor id
        let second = &nav.children()[1];
        assert_eq!(second.attribute("id"), Some("install-binstall"));
        assert_eq!(second.attribute("aria-selected"), Some("false"));

        let first_panel = &root.children()[1];
        assert_eq!(first_panel.attribute("role"), Some("tabpanel"));
        assert_eq!(first_panel.attribute("id"), Some("tab-install-0"));
        assert_eq!(first_panel.attribute("aria-expanded"), Some("true"));
        let second_panel = &root.children()[2];
        assert_eq!(second_panel.attribute("aria-expanded"), Some("false"));
    }

    #[test]
    fn test_click_moves_active_marker() {
        let tabs = mounted_tabs();
        tabs.handle_click(1);

        let rendered = tabs.render().unwrap();
        let nav = &rendered[0].children()[0];
        assert_eq!(nav.children()[0].attribute("aria-selected"), Some("false"));
        assert_eq!(nav.children()[1].attribute("aria-selected"), Some("true"));
        assert_eq!(nav.children()[1].attribute("class"), Some("tab-nav active"));
    }

    #[test]
    fn test_empty_group_renders_nothing() {
        let context = Context::new(Arc::new(NullHost)).with_store(TabStore::new());
        let tabs = Tabs::create(
            TabsProps {
                group_id: "empty".to_string(),
                store_key: None,
                tabs: vec![],
                default_active_index: None,
                fragment: None,
            },
            context,
        );
        assert!(tabs.render().unwrap().is_empty());
    }

    #[test]
    fn test_update_rejects_changed_tab_set() {
        let mut tabs = mounted_tabs();
        let err = tabs.update(TabsProps {
            group_id: "install".to_string(),
            store_key: None,
            tabs: vec![TabDescriptor::new("other")],
            default_active_index: None,
            fragment: None,
        });
        assert!(matches!(err, Err(ComponentError::UpdateError(_))));
    }
}
