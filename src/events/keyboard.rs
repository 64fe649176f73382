//! Keyboard event model for tab header controls
//!
//! Hosts translate their platform key events into this model before
//! forwarding them to a widget. Only the keys the tab contract cares about
//! are distinguished; everything else arrives as `Other` and passes through
//! untouched.

/// Key identity of a keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// Space bar - activates the focused header's tab
    Space,
    /// Enter - activates the focused header's tab
    Enter,
    /// Arrow left - moves to the previous tab, wrapping around
    ArrowLeft,
    /// Arrow right - moves to the next tab, wrapping around
    ArrowRight,
    /// Any key the tab contract does not handle
    Other,
}

/// A keyboard event delivered to a tab header control
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    /// Key identity
    code: KeyCode,

    /// Whether the default action should be prevented
    default_prevented: bool,
}

impl KeyboardEvent {
    /// Create a new keyboard event for the given key
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            default_prevented: false,
        }
    }

    /// Get the key identity
    pub fn code(&self) -> KeyCode {
        self.code
    }

    /// Prevent the host's default action for this key
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Check if default is prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_not_prevented_initially() {
        let event = KeyboardEvent::new(KeyCode::Space);
        assert_eq!(event.code(), KeyCode::Space);
        assert!(!event.is_default_prevented());
    }

    #[test]
    fn test_prevent_default() {
        let mut event = KeyboardEvent::new(KeyCode::ArrowRight);
        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}
