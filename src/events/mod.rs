//! Event system for the Tabkit toolkit
//!
//! The event system provides:
//! - Generic event trait with downcasting support
//! - Dispatcher for strongly-typed event handling
//! - Keyboard event model for tab header controls

pub mod dispatcher;
pub mod event;
pub mod keyboard;

pub use dispatcher::Dispatcher;
pub use event::Event;
pub use keyboard::{KeyCode, KeyboardEvent};
