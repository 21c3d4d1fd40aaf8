//! Discovery -> layout -> routing pipeline around a focal entity.

use crate::collapse::{CollapseState, RootChangePolicy};
use crate::config::Config;
use crate::discovery::{Discovery, DiscoveryMode, discover};
use crate::layout::{Layout, LayoutEngine};
use crate::store::{EvolutionStore, UnknownRootError};

/// Notifications raised by user interaction. The explorer never acts on
/// them beyond updating its own collapse state.
pub trait ExplorerEvents {
    fn on_toggle_collapse(&mut self, _id: &str, _collapsed: bool) {}
    fn on_node_click(&mut self, _id: &str) {}
}

/// Explorer state: the data, the focal root and the collapsed set.
///
/// Every call to [`Explorer::layout`] reruns discovery, placement and
/// routing from scratch; nothing is cached between calls.
pub struct Explorer {
    store: EvolutionStore,
    engine: LayoutEngine,
    mode: DiscoveryMode,
    root_change: RootChangePolicy,
    root: Option<String>,
    collapse: CollapseState,
    listener: Option<Box<dyn ExplorerEvents>>,
}

impl Explorer {
    pub fn new(store: EvolutionStore, config: &Config) -> Self {
        let root = store.default_root().map(|e| e.id.clone());
        Self {
            store,
            engine: LayoutEngine::new(config.layout.clone()),
            mode: config.discovery,
            root_change: config.root_change,
            root,
            collapse: CollapseState::new(),
            listener: None,
        }
    }

    pub fn store(&self) -> &EvolutionStore {
        &self.store
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn collapse_state(&self) -> &CollapseState {
        &self.collapse
    }

    pub fn set_listener(&mut self, listener: Box<dyn ExplorerEvents>) {
        self.listener = Some(listener);
    }

    pub fn discovery_mode(&self) -> DiscoveryMode {
        self.mode
    }

    /// Switch between the connected tree and the lineage view. Root and
    /// collapse state are kept.
    pub fn set_discovery_mode(&mut self, mode: DiscoveryMode) {
        self.mode = mode;
    }

    /// Focus on `id`. Unknown ids leave the current root untouched.
    pub fn set_root(&mut self, id: &str) -> Result<(), UnknownRootError> {
        self.store.require(id)?;
        if self.root.as_deref() != Some(id) {
            self.collapse.on_root_change(self.root_change);
            self.root = Some(id.to_string());
        }
        Ok(())
    }

    /// Flip the collapsed flag of `id` and notify the listener.
    pub fn toggle_collapse(&mut self, id: &str) -> bool {
        if !self.store.contains(id) {
            log::warn!("Ignoring collapse toggle for unknown entity {}", id);
            return false;
        }
        let collapsed = self.collapse.toggle(id);
        if let Some(listener) = self.listener.as_mut() {
            listener.on_toggle_collapse(id, collapsed);
        }
        collapsed
    }

    pub fn expand_children_of(&mut self, parent: &str) -> usize {
        self.collapse.expand_children_of(&self.store, parent)
    }

    pub fn node_click(&mut self, id: &str) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_node_click(id);
        }
    }

    pub fn discover(&self) -> Discovery {
        match &self.root {
            Some(root) => discover(&self.store, root, self.collapse.collapsed(), self.mode),
            None => Discovery::default(),
        }
    }

    pub fn layout(&self) -> Layout {
        let discovery = self.discover();
        self.engine.layout(&self.store, &discovery, &self.collapse)
    }
}
