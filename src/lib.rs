// Core module of the Tabkit widget toolkit
pub mod component;
pub mod events;
pub mod router;
pub mod state;
pub mod tabs;

pub mod kit; // Tab widget built on the component model

/// Version of the Tabkit toolkit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::component::{
        Component, ComponentError, Context, LifecyclePhase, Node, RenderHost,
    };
    pub use crate::events::{Dispatcher, Event, KeyCode, KeyboardEvent};
    pub use crate::kit::components::tabs::{Tabs, TabsProps};
    pub use crate::router::{
        Guard, GuardHandle, MemoryRouter, NavigationTarget, Proceed, Router,
    };
    pub use crate::state::{Subscription, TabStore};
    pub use crate::tabs::{
        SelectionChanged, SelectionSource, TabDescriptor, TabGroupConfig,
        TabSelectionController,
    };
}

/// Errors that can occur in the Tabkit toolkit
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Component error: {0}")]
    Component(#[from] component::ComponentError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Router error: {0}")]
    Router(String),
}
