// Tabkit widget library

pub mod components;

/// Re-export of common components for convenience
pub mod prelude {
    pub use crate::kit::components::tabs::{Tabs, TabsProps};
}
