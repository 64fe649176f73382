//! Tab selection core
//!
//! This module contains all the logic that decides which tab of a group is
//! active and keeps that choice consistent:
//!
//! 1. Selection state with wrap-around keyboard switching
//! 2. The persistence bridge into the shared [`crate::state::TabStore`]
//! 3. Anchor resolution mapping a URL fragment to a tab index
//! 4. The navigation listener that intercepts in-app route changes
//!
//! Rendering lives in [`crate::kit`]; the controller only drives it through
//! the [`crate::component::RenderHost`] boundary.

mod anchor;
mod controller;

pub use anchor::AnchorIndex;
pub use controller::{
    SelectionChanged, SelectionSource, TabSelectionController,
};

/// One tab within a group
///
/// `id` is the stable identity used for persistence and hash matching; it
/// only needs to be unique within its group. `nav_id`, when present,
/// overrides `id` as the header's anchor id and as the hash-matching key.
/// Deserializes from the `{"id": ..., "navId": ...}` shape documentation
/// pages declare their tab data in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabDescriptor {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nav_id: Option<String>,
}

impl TabDescriptor {
    /// Create a descriptor for the tab identified by `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nav_id: None,
        }
    }

    /// Override the tab's anchor identity
    pub fn with_nav_id(mut self, nav_id: impl Into<String>) -> Self {
        self.nav_id = Some(nav_id.into());
        self
    }

    /// Get the tab's stable identity
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the explicit anchor identity, if one was set
    pub fn nav_id(&self) -> Option<&str> {
        self.nav_id.as_deref()
    }

    /// Anchor id rendered on the tab's header control
    pub fn anchor_id(&self) -> &str {
        self.nav_id.as_deref().unwrap_or(&self.id)
    }
}

/// Configuration for one tab group instance
#[derive(Debug, Clone)]
pub struct TabGroupConfig {
    /// Unique identifier for this instance, used for ARIA id pairing
    pub group_id: String,

    /// Key into the shared store; `None` (or empty) disables persistence
    pub store_key: Option<String>,

    /// Tabs in display order; the order defines the index space
    pub tabs: Vec<TabDescriptor>,

    /// Index selected when neither the store nor the fragment resolves
    pub default_active_index: usize,

    /// Current URL fragment for hosts without a router collaborator
    pub fragment: Option<String>,
}

impl TabGroupConfig {
    /// Create a configuration with no tabs and default settings
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            store_key: None,
            tabs: Vec::new(),
            default_active_index: 0,
            fragment: None,
        }
    }

    /// Enable persistence under `key`
    pub fn with_store_key(mut self, key: impl Into<String>) -> Self {
        self.store_key = Some(key.into());
        self
    }

    /// Set the tab list
    pub fn with_tabs(mut self, tabs: Vec<TabDescriptor>) -> Self {
        self.tabs = tabs;
        self
    }

    /// Set the default active index
    pub fn with_default_active_index(mut self, index: usize) -> Self {
        self.default_active_index = index;
        self
    }

    /// Supply the current fragment for routerless hosts
    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }
}
