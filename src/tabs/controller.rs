//! Selection-state controller for one tab group
//!
//! The controller is the single source of truth for which tab is active in
//! one group instance. User interaction (click, keyboard) moves the
//! selection and persists it; route changes and external store updates move
//! the selection without persisting it, so restoring a deep link can never
//! silently overwrite another group's last-chosen tab.

use std::sync::{Arc, Mutex};

use crate::component::{ComponentError, Context, LifecyclePhase, RenderHost};
use crate::events::{Dispatcher, KeyCode, KeyboardEvent};
use crate::router::{GuardHandle, Proceed, Router};
use crate::state::{Subscription, TabStore};

use super::anchor::AnchorIndex;
use super::{TabDescriptor, TabGroupConfig};

/// What caused a selection change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    /// Click or keyboard on a header control; persisted
    Interaction,
    /// Fragment of an intercepted route change; never persisted
    Navigation,
    /// Another group wrote the shared store key; never persisted
    Store,
}

/// Event published after the active tab of a group changed
#[derive(Debug, Clone)]
pub struct SelectionChanged {
    /// Group whose selection changed
    pub group_id: String,
    /// New active index
    pub index: usize,
    /// What caused the change
    pub source: SelectionSource,
}

// Mutable state shared with the route-guard and store-subscriber closures
struct GroupState {
    tabs: Vec<TabDescriptor>,
    active_index: usize,
    anchors: AnchorIndex,
    // Navigations waiting for one render pass before they continue
    pending: Vec<Proceed>,
    phase: LifecyclePhase,
}

impl GroupState {
    /// Map a URL fragment to a tab index; `nav_id` matches win over
    /// content-anchor matches because they name the tab itself
    fn resolve_fragment(&self, fragment: &str) -> Option<usize> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.is_empty() {
            return None;
        }

        if let Some(index) = self
            .tabs
            .iter()
            .position(|tab| tab.nav_id() == Some(fragment))
        {
            return Some(index);
        }

        self.anchors.lookup(fragment)
    }

    fn tab_index_of(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == id)
    }
}

/// Selection-state controller for one tab group instance
///
/// Create it with [`TabSelectionController::new`], call
/// [`mount`](TabSelectionController::mount) once the group enters the tree
/// and [`unmount`](TabSelectionController::unmount) when it leaves. In
/// between, forward clicks, key events and panel-mount notifications, and
/// report finished render passes through
/// [`render_complete`](TabSelectionController::render_complete).
pub struct TabSelectionController {
    group_id: String,
    store_key: Option<String>,
    default_index: usize,
    // Current fragment for hosts without a router
    fallback_fragment: Option<String>,

    state: Arc<Mutex<GroupState>>,
    store: TabStore,
    router: Option<Arc<dyn Router>>,
    host: Arc<dyn RenderHost>,
    events: Dispatcher<SelectionChanged>,

    // Held while mounted; dropping them releases the router guard and the
    // store subscriber
    guard: Option<GuardHandle>,
    store_subscription: Option<Subscription>,
}

impl TabSelectionController {
    /// Create a controller for `config`, wired to the context's collaborators
    pub fn new(config: TabGroupConfig, context: &Context) -> Self {
        let tab_count = config.tabs.len();
        debug_assert!(
            tab_count == 0 || config.default_active_index < tab_count,
            "default_active_index {} out of range for group {}",
            config.default_active_index,
            config.group_id
        );
        let default_index = if config.default_active_index < tab_count {
            config.default_active_index
        } else {
            if tab_count > 0 {
                log::error!(
                    "group {}: default_active_index {} out of range, falling back to 0",
                    config.group_id,
                    config.default_active_index
                );
            }
            0
        };

        Self {
            group_id: config.group_id,
            store_key: config.store_key.filter(|key| !key.is_empty()),
            default_index,
            fallback_fragment: config.fragment,
            state: Arc::new(Mutex::new(GroupState {
                anchors: AnchorIndex::new(tab_count),
                tabs: config.tabs,
                active_index: default_index,
                pending: Vec::new(),
                phase: LifecyclePhase::Created,
            })),
            store: context.store().clone(),
            router: context.router().cloned(),
            host: context.host().clone(),
            events: Dispatcher::new(),
            guard: None,
            store_subscription: None,
        }
    }

    /// Get the group identifier
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Index of the currently active tab
    pub fn active_index(&self) -> usize {
        match self.state.lock() {
            Ok(state) => state.active_index,
            Err(_) => 0,
        }
    }

    /// Number of tabs in the group
    pub fn tab_count(&self) -> usize {
        match self.state.lock() {
            Ok(state) => state.tabs.len(),
            Err(_) => 0,
        }
    }

    /// Whether the controller is currently mounted
    pub fn is_mounted(&self) -> bool {
        matches!(self.state.lock(), Ok(state) if state.phase == LifecyclePhase::Mounted)
    }

    /// Dispatcher publishing [`SelectionChanged`] events
    pub fn events(&self) -> &Dispatcher<SelectionChanged> {
        &self.events
    }

    /// Activate the tab at `index` as a user-driven selection
    ///
    /// Persists the choice when a store key is configured. Passing an
    /// out-of-range index is a caller bug: debug builds assert, release
    /// builds log an error and leave the selection unchanged.
    pub fn set_active(&self, index: usize) {
        let id = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            debug_assert!(
                index < state.tabs.len(),
                "tab index {} out of range for group {}",
                index,
                self.group_id
            );
            if index >= state.tabs.len() {
                log::error!(
                    "group {}: ignoring activation of out-of-range tab {}",
                    self.group_id,
                    index
                );
                return;
            }
            state.active_index = index;
            state.tabs[index].id().to_string()
        };

        self.write_store(&id);
        self.host.request_render();
        self.emit(index, SelectionSource::Interaction);
    }

    /// Activate the next tab, wrapping around, and focus its header
    pub fn next(&self) {
        self.step(true);
    }

    /// Activate the previous tab, wrapping around, and focus its header
    pub fn prev(&self) {
        self.step(false);
    }

    fn step(&self, forward: bool) {
        let (index, id) = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            let len = state.tabs.len();
            if len == 0 {
                return;
            }
            let index = if forward {
                (state.active_index + 1) % len
            } else {
                (state.active_index + len - 1) % len
            };
            state.active_index = index;
            (index, state.tabs[index].id().to_string())
        };

        self.write_store(&id);
        self.host.request_render();
        self.host.focus_header(index);
        self.emit(index, SelectionSource::Interaction);
    }

    /// Handle a click on the header at `index`
    pub fn handle_click(&self, index: usize) {
        self.set_active(index);
    }

    /// Handle a key event delivered to the header at `index`
    ///
    /// Space and Enter activate that header's tab; the arrow keys move the
    /// selection. Handled keys mark the event default-prevented; anything
    /// else passes through untouched.
    pub fn handle_keydown(&self, event: &mut KeyboardEvent, index: usize) {
        match event.code() {
            KeyCode::Space | KeyCode::Enter => {
                event.prevent_default();
                self.set_active(index);
            }
            KeyCode::ArrowRight => {
                event.prevent_default();
                self.next();
            }
            KeyCode::ArrowLeft => {
                event.prevent_default();
                self.prev();
            }
            KeyCode::Other => {}
        }
    }

    /// Map a URL fragment to a tab index without changing the selection
    pub fn find_anchor_index(&self, fragment: &str) -> Option<usize> {
        self.state.lock().ok()?.resolve_fragment(fragment)
    }

    /// Record the rendered content of the panel at `index` for anchor
    /// resolution; called by the render layer once per panel mount
    pub fn panel_mounted(&self, index: usize, content: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.anchors.record(index, content);
        }
    }

    /// Bring the group online
    ///
    /// Resolves the initial selection - persisted store value first, then
    /// the current fragment, then the configured default - and starts
    /// observing the router and the store.
    pub fn mount(&mut self) -> Result<(), ComponentError> {
        let fragment = self
            .router
            .as_ref()
            .and_then(|router| router.current_fragment())
            .or_else(|| self.fallback_fragment.clone());

        {
            let mut state = self.lock_state("mount")?;
            match state.phase {
                LifecyclePhase::Created | LifecyclePhase::Unmounted => {}
                phase => {
                    return Err(ComponentError::InvalidLifecycleTransition(
                        phase,
                        "mount".to_string(),
                    ))
                }
            }
            state.phase = LifecyclePhase::Mounting;
            // Fresh scan ledger for this mount
            state.anchors = AnchorIndex::new(state.tabs.len());

            if !state.tabs.is_empty() {
                let initial = self
                    .preferred_index(&state)
                    .or_else(|| {
                        fragment
                            .as_deref()
                            .and_then(|fragment| state.resolve_fragment(fragment))
                    })
                    .unwrap_or(self.default_index);
                state.active_index = initial;
            }
            state.phase = LifecyclePhase::Mounted;
        }

        self.install_route_guard();
        self.subscribe_store();
        Ok(())
    }

    /// Take the group offline
    ///
    /// Releases the router guard and the store subscription, and lets any
    /// navigation still waiting on a render pass continue; the flushed
    /// continuations no longer touch this instance.
    pub fn unmount(&mut self) -> Result<(), ComponentError> {
        let pending = {
            let mut state = self.lock_state("unmount")?;
            if state.phase != LifecyclePhase::Mounted {
                return Err(ComponentError::InvalidLifecycleTransition(
                    state.phase,
                    "unmount".to_string(),
                ));
            }
            state.phase = LifecyclePhase::BeforeUnmount;
            std::mem::take(&mut state.pending)
        };

        self.guard = None;
        self.store_subscription = None;
        for proceed in pending {
            proceed.proceed();
        }

        if let Ok(mut state) = self.state.lock() {
            state.phase = LifecyclePhase::Unmounted;
        }
        Ok(())
    }

    /// Report that the host committed one render pass
    ///
    /// Navigations deferred by the route guard continue here, so the host's
    /// scroll-to-anchor behavior targets content that is already visible.
    pub fn render_complete(&self) {
        let pending = match self.state.lock() {
            Ok(mut state) => std::mem::take(&mut state.pending),
            Err(_) => Vec::new(),
        };
        for proceed in pending {
            proceed.proceed();
        }
    }

    // Look up the persisted selection for this group's store key
    fn preferred_index(&self, state: &GroupState) -> Option<usize> {
        let key = self.store_key.as_deref()?;
        let value = self.store.get(key)?;
        state.tab_index_of(&value)
    }

    // Persist `id` as this group's selection; interaction-driven paths only
    fn write_store(&self, id: &str) {
        if let Some(key) = self.store_key.as_deref() {
            self.store.insert(key, id);
        }
    }

    fn install_route_guard(&mut self) {
        let Some(router) = self.router.clone() else {
            return;
        };

        let state = Arc::downgrade(&self.state);
        let host = self.host.clone();
        let events = self.events.clone();
        let group_id = self.group_id.clone();

        self.guard = Some(router.before_each(Arc::new(move |target, proceed| {
            let Some(fragment) = target.fragment() else {
                proceed.proceed();
                return;
            };
            // A navigation snapshot can outlive this instance; a dead or
            // unmounted group lets the navigation pass untouched
            let Some(state) = state.upgrade() else {
                proceed.proceed();
                return;
            };
            let Ok(mut state) = state.lock() else {
                proceed.proceed();
                return;
            };
            if state.phase != LifecyclePhase::Mounted {
                drop(state);
                proceed.proceed();
                return;
            }

            let Some(index) = state.resolve_fragment(fragment) else {
                drop(state);
                proceed.proceed();
                return;
            };

            state.active_index = index;
            // Hold the navigation until one render pass committed, so the
            // host's scroll-to-anchor lands on visible content
            state.pending.push(proceed);
            drop(state);

            log::debug!(
                "group {}: fragment \"{}\" resolves to tab {}, deferring navigation",
                group_id,
                fragment,
                index
            );
            host.request_render();
            let event = SelectionChanged {
                group_id: group_id.clone(),
                index,
                source: SelectionSource::Navigation,
            };
            if let Err(err) = events.dispatch(&event) {
                log::warn!("group {}: selection handler failed: {}", group_id, err);
            }
        })));
    }

    fn subscribe_store(&mut self) {
        let Some(key) = self.store_key.clone() else {
            return;
        };

        let state = Arc::downgrade(&self.state);
        let host = self.host.clone();
        let events = self.events.clone();
        let group_id = self.group_id.clone();

        self.store_subscription = Some(self.store.subscribe(&key, move |value| {
            let adopted = state.upgrade().and_then(|state| {
                let Ok(mut state) = state.lock() else {
                    return None;
                };
                if state.phase != LifecyclePhase::Mounted {
                    return None;
                }
                let index = state.tab_index_of(value)?;
                if index == state.active_index {
                    return None;
                }
                // Adopt without writing back, so two groups sharing a key
                // cannot feed each other updates forever
                state.active_index = index;
                Some(index)
            });

            if let Some(index) = adopted {
                log::debug!("group {}: adopting shared selection {:?}", group_id, value);
                host.request_render();
                let event = SelectionChanged {
                    group_id: group_id.clone(),
                    index,
                    source: SelectionSource::Store,
                };
                if let Err(err) = events.dispatch(&event) {
                    log::warn!("group {}: selection handler failed: {}", group_id, err);
                }
            }
        }));
    }

    fn lock_state(&self, operation: &str) -> Result<std::sync::MutexGuard<'_, GroupState>, ComponentError> {
        self.state.lock().map_err(|_| {
            ComponentError::LockError(format!(
                "failed to lock state of group {} during {}",
                self.group_id, operation
            ))
        })
    }

    fn emit(&self, index: usize, source: SelectionSource) {
        let event = SelectionChanged {
            group_id: self.group_id.clone(),
            index,
            source,
        };
        if let Err(err) = self.events.dispatch(&event) {
            log::warn!("group {}: selection handler failed: {}", self.group_id, err);
        }
    }
}

impl std::fmt::Debug for TabSelectionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabSelectionController")
            .field("group_id", &self.group_id)
            .field("store_key", &self.store_key)
            .field("active_index", &self.active_index())
            .finish()
    }
}
