//! Router boundary for in-app navigation
//!
//! The toolkit never drives navigation itself; it observes and briefly
//! suspends it. A host router exposes two things through the [`Router`]
//! trait: the fragment of the current location, and a hook to register
//! guards that run before each in-app navigation. A guard receives the
//! pending [`NavigationTarget`] together with a [`Proceed`] continuation it
//! must invoke exactly once to let the navigation go ahead; until then the
//! navigation is suspended.
//!
//! [`MemoryRouter`] is an in-process implementation for headless hosts and
//! tests.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

/// Destination of a pending in-app navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    /// Destination path
    path: String,

    /// Destination fragment, stored without the leading `#`
    fragment: Option<String>,
}

impl NavigationTarget {
    /// Create a target for `path` with no fragment
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fragment: None,
        }
    }

    /// Attach a fragment; a leading `#` is accepted and stripped
    pub fn with_fragment(mut self, fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        self.fragment = (!fragment.is_empty()).then(|| fragment.to_string());
        self
    }

    /// Parse a location of the form `/path#fragment`
    pub fn parse(location: &str) -> Self {
        match location.split_once('#') {
            Some((path, fragment)) => Self::new(path).with_fragment(fragment),
            None => Self::new(location),
        }
    }

    /// Parse a full URL, keeping its path and fragment
    pub fn from_url(input: &str) -> Result<Self, crate::Error> {
        let url = url::Url::parse(input).map_err(|e| crate::Error::Router(e.to_string()))?;

        let target = Self::new(url.path());
        Ok(match url.fragment() {
            Some(fragment) => target.with_fragment(fragment),
            None => target,
        })
    }

    /// Get the destination path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the destination fragment, without the leading `#`
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

/// Continuation that lets a suspended navigation go ahead
///
/// A guard must invoke this exactly once. Exactly-once is enforced by
/// construction (`proceed` consumes the handle); a `Proceed` dropped
/// without being invoked leaves the navigation suspended forever, which is
/// logged as a warning - bounding that wait is the caller's policy.
pub struct Proceed {
    action: Option<Box<dyn FnOnce() + Send>>,
}

impl Proceed {
    /// Wrap the router's resume action
    pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            action: Some(Box::new(action)),
        }
    }

    /// Let the navigation go ahead
    pub fn proceed(mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

impl std::fmt::Debug for Proceed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proceed")
            .field("pending", &self.action.is_some())
            .finish()
    }
}

impl Drop for Proceed {
    fn drop(&mut self) {
        if self.action.is_some() {
            log::warn!("navigation guard released without proceeding; navigation stays suspended");
        }
    }
}

/// Type for navigation guard callbacks
pub type Guard = Arc<dyn Fn(&NavigationTarget, Proceed) + Send + Sync>;

/// Router collaborator a tab group observes
pub trait Router: Send + Sync {
    /// Fragment of the current location, without the leading `#`
    fn current_fragment(&self) -> Option<String>;

    /// Register a guard to run before each in-app navigation
    ///
    /// Dropping the returned [`GuardHandle`] removes the guard; a group
    /// instance must release its guard when it unmounts.
    fn before_each(&self, guard: Guard) -> GuardHandle;
}

/// Handle for a registered guard; dropping it removes the guard
pub struct GuardHandle {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl GuardHandle {
    /// Wrap the router's removal action
    pub fn new(remove: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }
}

impl std::fmt::Debug for GuardHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardHandle")
            .field("registered", &self.remove.is_some())
            .finish()
    }
}

impl Drop for GuardHandle {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

// Inner state shared by MemoryRouter clones
struct MemoryRouterInner {
    fragment: Mutex<Option<String>>,
    guards: Mutex<Vec<(u64, Guard)>>,
    next_id: AtomicU64,
}

/// In-process router implementation
///
/// Drives registered guards in order for each [`MemoryRouter::navigate`]
/// call and commits the target - updating the current fragment - only after
/// every guard has proceeded. Guards are free to hold their `Proceed` and
/// invoke it later, suspending the navigation in the meantime.
#[derive(Clone)]
pub struct MemoryRouter {
    inner: Arc<MemoryRouterInner>,
}

impl MemoryRouter {
    /// Create a router with no current fragment
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryRouterInner {
                fragment: Mutex::new(None),
                guards: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Create a router whose current location carries `fragment`
    pub fn with_fragment(fragment: &str) -> Self {
        let router = Self::new();
        if let Ok(mut current) = router.inner.fragment.lock() {
            let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
            *current = (!fragment.is_empty()).then(|| fragment.to_string());
        }
        router
    }

    /// Start an in-app navigation to `target`
    ///
    /// Returns once every guard has either proceeded or parked its
    /// continuation; in the latter case the navigation commits whenever the
    /// last parked `Proceed` is invoked.
    pub fn navigate(&self, target: NavigationTarget) {
        // Snapshot the guard list so registrations and removals during the
        // navigation do not shift the chain under it.
        let guards: Vec<Guard> = match self.inner.guards.lock() {
            Ok(guards) => guards.iter().map(|(_, guard)| guard.clone()).collect(),
            Err(_) => Vec::new(),
        };

        self.advance(Arc::new(target), Arc::new(guards), 0);
    }

    // Run the guard at `index`, handing it a continuation that resumes the
    // chain; past the last guard, commit the target.
    fn advance(&self, target: Arc<NavigationTarget>, guards: Arc<Vec<Guard>>, index: usize) {
        match guards.get(index) {
            Some(guard) => {
                let guard = guard.clone();
                let router = self.clone();
                let next_target = target.clone();
                let next_guards = guards.clone();

                let proceed =
                    Proceed::new(move || router.advance(next_target, next_guards, index + 1));
                guard(target.as_ref(), proceed);
            }
            None => {
                if let Ok(mut fragment) = self.inner.fragment.lock() {
                    *fragment = target.fragment().map(String::from);
                }
                log::debug!(
                    "navigation committed: path={} fragment={:?}",
                    target.path(),
                    target.fragment()
                );
            }
        }
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for MemoryRouter {
    fn current_fragment(&self) -> Option<String> {
        self.inner.fragment.lock().ok()?.clone()
    }

    fn before_each(&self, guard: Guard) -> GuardHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut guards) = self.inner.guards.lock() {
            guards.push((id, guard));
        }

        let inner = self.inner.clone();
        GuardHandle::new(move || {
            if let Ok(mut guards) = inner.guards.lock() {
                guards.retain(|(guard_id, _)| *guard_id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_parse_path_and_fragment() {
        let target = NavigationTarget::parse("/guide#install");
        assert_eq!(target.path(), "/guide");
        assert_eq!(target.fragment(), Some("install"));

        let bare = NavigationTarget::parse("/guide");
        assert_eq!(bare.fragment(), None);

        let empty = NavigationTarget::parse("/guide#");
        assert_eq!(empty.fragment(), None);
    }

    #[test]
    fn test_from_url() {
        let target = NavigationTarget::from_url("https://docs.example.com/guide#install").unwrap();
        assert_eq!(target.path(), "/guide");
        assert_eq!(target.fragment(), Some("install"));

        assert!(NavigationTarget::from_url("not a url").is_err());
    }

    #[test]
    fn test_navigation_commits_without_guards() {
        let router = MemoryRouter::new();
        router.navigate(NavigationTarget::parse("/guide#install"));
        assert_eq!(router.current_fragment(), Some("install".to_string()));
    }

    #[test]
    fn test_guards_run_in_registration_order() {
        let router = MemoryRouter::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut handles = Vec::new();

        for label in ["first", "second"] {
            let order_clone = order.clone();
            handles.push(router.before_each(Arc::new(move |_target, proceed| {
                order_clone.lock().unwrap().push(label);
                proceed.proceed();
            })));
        }

        router.navigate(NavigationTarget::parse("/guide"));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_parked_proceed_suspends_navigation() {
        let router = MemoryRouter::with_fragment("before");
        let parked = Arc::new(Mutex::new(None));
        let parked_clone = parked.clone();

        let _handle = router.before_each(Arc::new(move |_target, proceed| {
            *parked_clone.lock().unwrap() = Some(proceed);
        }));

        router.navigate(NavigationTarget::parse("/guide#after"));
        assert_eq!(router.current_fragment(), Some("before".to_string()));

        let proceed = parked.lock().unwrap().take().unwrap();
        proceed.proceed();
        assert_eq!(router.current_fragment(), Some("after".to_string()));
    }

    #[test]
    fn test_dropped_handle_removes_guard() {
        let router = MemoryRouter::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        let handle = router.before_each(Arc::new(move |_target, proceed| {
            count_clone.fetch_add(1, Ordering::SeqCst);
            proceed.proceed();
        }));

        router.navigate(NavigationTarget::parse("/a"));
        drop(handle);
        router.navigate(NavigationTarget::parse("/b"));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropped_proceed_leaves_navigation_suspended() {
        let router = MemoryRouter::with_fragment("before");
        let _handle = router.before_each(Arc::new(|_target, proceed| {
            drop(proceed);
        }));

        router.navigate(NavigationTarget::parse("/guide#after"));
        assert_eq!(router.current_fragment(), Some("before".to_string()));
    }
}
