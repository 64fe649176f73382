//! Component model for the Tabkit toolkit
//!
//! This module contains the types and traits the widgets are built on:
//! the component lifecycle, the context a component is created with, and
//! the node tree rendering produces.

mod error;
mod node;

pub use error::ComponentError;
pub use node::Node;

use std::sync::Arc;

use crate::router::Router;
use crate::state::TabStore;

/// Lifecycle phase of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// Component is created but not yet mounted
    Created,
    /// Component is being mounted
    Mounting,
    /// Component is fully mounted and operational
    Mounted,
    /// Component is about to be unmounted
    BeforeUnmount,
    /// Component is unmounted and inactive
    Unmounted,
}

/// Render collaborator a component drives
///
/// The host owns the actual output surface. Components ask it to schedule a
/// render pass and to move keyboard focus; after finishing a pass the host
/// reports completion to whichever controller asked for it (see
/// [`crate::tabs::TabSelectionController::render_complete`]).
pub trait RenderHost: Send + Sync {
    /// Schedule a render pass for the component's subtree
    fn request_render(&self);

    /// Move keyboard focus to the header control at `index`
    fn focus_header(&self, index: usize);
}

/// Context passed to components providing access to the shared collaborators
#[derive(Clone)]
pub struct Context {
    /// Process-wide tab store shared by every group on the page
    store: TabStore,

    /// Router boundary; absent hosts lose live interception but nothing else
    router: Option<Arc<dyn Router>>,

    /// Render collaborator
    host: Arc<dyn RenderHost>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("store", &self.store)
            .field("router", &self.router.as_ref().map(|_| "[Router]"))
            .field("host", &"[RenderHost]")
            .finish()
    }
}

impl Context {
    /// Create a new context backed by the process-wide shared store
    pub fn new(host: Arc<dyn RenderHost>) -> Self {
        Self {
            store: TabStore::shared(),
            router: None,
            host,
        }
    }

    /// Replace the tab store (primarily for isolated embedding and tests)
    pub fn with_store(mut self, store: TabStore) -> Self {
        self.store = store;
        self
    }

    /// Attach a router collaborator
    pub fn with_router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    /// Get the shared tab store
    pub fn store(&self) -> &TabStore {
        &self.store
    }

    /// Get the router, if one is attached
    pub fn router(&self) -> Option<&Arc<dyn Router>> {
        self.router.as_ref()
    }

    /// Get the render collaborator
    pub fn host(&self) -> &Arc<dyn RenderHost> {
        &self.host
    }
}

/// Component trait - implemented by all UI components
pub trait Component: Send + Sync {
    /// The props type for this component
    type Props: Clone;

    /// Create a new component instance
    fn create(props: Self::Props, context: Context) -> Self
    where
        Self: Sized;

    /// Mount component - called when component is first added to the tree
    fn mount(&mut self) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Update component with new props
    fn update(&mut self, props: Self::Props) -> Result<(), ComponentError>;

    /// Unmount component - called when component is removed from the tree
    fn unmount(&mut self) -> Result<(), ComponentError> {
        Ok(())
    }

    /// Render component - returns child nodes
    fn render(&self) -> Result<Vec<Node>, ComponentError>;
}
