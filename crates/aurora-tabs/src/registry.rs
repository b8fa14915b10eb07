//! Tab Registry
//!
//! Owns every browsing context in display order. It is created with one tab
//! and refuses to close the last one, so there is always an active context.

use tokio::sync::mpsc;

use aurora_navigation::InputResolver;

use crate::context::{BrowsingContext, ContextId};
use crate::engine::{ContextEvent, Engine, ViewEventSink};
use crate::error::TabError;
use crate::profile::ProfilePolicy;
use crate::Result;

#[derive(Debug)]
pub struct TabEntry {
    pub context: BrowsingContext,
    pub label: String,
}

pub struct TabRegistry {
    engine: Box<dyn Engine>,
    profiles: ProfilePolicy,
    resolver: InputResolver,
    events: mpsc::UnboundedSender<ContextEvent>,
    entries: Vec<TabEntry>,
    /// Index into `entries`, always valid
    active: usize,
}

impl TabRegistry {
    /// Create the registry with its first tab loading `url`.
    pub fn new(
        engine: Box<dyn Engine>,
        profiles: ProfilePolicy,
        resolver: InputResolver,
        events: mpsc::UnboundedSender<ContextEvent>,
        url: &str,
        label: impl Into<String>,
    ) -> Self {
        let mut registry = Self {
            engine,
            profiles,
            resolver,
            events,
            entries: Vec::new(),
            active: 0,
        };
        registry.open(url, label);
        registry
    }

    /// Open a tab loading `url`, append it and make it active.
    pub fn open(&mut self, url: &str, label: impl Into<String>) -> ContextId {
        let id = ContextId::new();
        let profile = self.profiles.profile_for(id);
        let sink = ViewEventSink::new(id, self.events.clone());
        let view = self.engine.create_view(id, &profile, sink);

        let mut context = BrowsingContext::new(id, profile, view, self.resolver.clone());
        context.load(url);

        self.entries.push(TabEntry {
            context,
            label: label.into(),
        });
        self.active = self.entries.len() - 1;

        tracing::info!(
            context_id = %id,
            url = %url,
            isolated = self.profiles.is_isolated(),
            "Opened tab"
        );

        id
    }

    /// Close a tab. The last remaining tab cannot be closed.
    pub fn close(&mut self, id: ContextId) -> Result<()> {
        let index = self.require_index(id)?;

        if self.entries.len() == 1 {
            return Err(TabError::InvariantViolation(
                "cannot close the last tab".to_string(),
            ));
        }

        // Dropping the entry drops the view, detaching its event sink.
        self.entries.remove(index);

        if index < self.active {
            self.active -= 1;
        } else if index == self.active {
            // The neighbour that slid into this slot, or the new last tab
            self.active = index.min(self.entries.len() - 1);
            self.entries[self.active].context.touch();
        }

        tracing::info!(context_id = %id, remaining = self.entries.len(), "Closed tab");

        Ok(())
    }

    pub fn activate(&mut self, id: ContextId) -> Result<&mut BrowsingContext> {
        let index = self.require_index(id)?;
        self.active = index;

        let context = &mut self.entries[index].context;
        context.touch();

        tracing::debug!(context_id = %id, "Activated tab");

        Ok(context)
    }

    /// Activate the tab at a display position.
    pub fn activate_at(&mut self, index: usize) -> Result<&mut BrowsingContext> {
        let id = self
            .entries
            .get(index)
            .map(|entry| entry.context.id())
            .ok_or_else(|| TabError::NotFound(format!("tab index {}", index)))?;
        self.activate(id)
    }

    pub fn active(&self) -> Result<&BrowsingContext> {
        self.entries
            .get(self.active)
            .map(|entry| &entry.context)
            .ok_or(TabError::EmptyRegistry)
    }

    pub fn active_mut(&mut self) -> Result<&mut BrowsingContext> {
        self.entries
            .get_mut(self.active)
            .map(|entry| &mut entry.context)
            .ok_or(TabError::EmptyRegistry)
    }

    pub fn active_id(&self) -> Result<ContextId> {
        self.active().map(BrowsingContext::id)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn get(&self, id: ContextId) -> Result<&BrowsingContext> {
        let index = self.require_index(id)?;
        Ok(&self.entries[index].context)
    }

    pub fn contains(&self, id: ContextId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: ContextId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.context.id() == id)
    }

    pub fn label(&self, id: ContextId) -> Result<&str> {
        let index = self.require_index(id)?;
        Ok(self.entries[index].label.as_str())
    }

    /// The context together with its tab label
    pub fn entry_mut(&mut self, id: ContextId) -> Result<&mut TabEntry> {
        let index = self.require_index(id)?;
        Ok(&mut self.entries[index])
    }

    /// Tabs in display order
    pub fn iter(&self) -> impl Iterator<Item = &TabEntry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<ContextId> {
        self.entries.iter().map(|entry| entry.context.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn require_index(&self, id: ContextId) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| TabError::NotFound(id.to_string()))
    }
}

impl std::fmt::Debug for TabRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabRegistry")
            .field("entries", &self.entries)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::view_event_channel;
    use crate::profile::ProfileConfig;
    use crate::testing::FakeEngine;
    use std::path::PathBuf;

    fn registry(engine: &FakeEngine) -> TabRegistry {
        let (tx, _rx) = view_event_channel();
        TabRegistry::new(
            Box::new(engine.clone()),
            ProfilePolicy::Shared(ProfileConfig::default()),
            InputResolver::new(),
            tx,
            "https://home.example",
            "Home",
        )
    }

    #[test]
    fn test_new_registry_has_one_active_tab() {
        let engine = FakeEngine::new();
        let registry = registry(&engine);

        assert_eq!(registry.len(), 1);
        let active = registry.active().unwrap();
        assert_eq!(engine.loads(active.id()), vec!["https://home.example"]);
        assert_eq!(registry.label(active.id()).unwrap(), "Home");
    }

    #[test]
    fn test_open_appends_and_activates() {
        let engine = FakeEngine::new();
        let mut registry = registry(&engine);
        let first = registry.active_id().unwrap();

        let second = registry.open("https://a.com", "A");
        let third = registry.open("https://b.com", "B");

        assert_eq!(registry.ids(), vec![first, second, third]);
        assert_eq!(registry.active_id().unwrap(), third);
        assert_eq!(engine.view_count(), 3);

        let labels: Vec<&str> = registry.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["Home", "A", "B"]);
    }

    #[test]
    fn test_entry_mut_updates_label() {
        let engine = FakeEngine::new();
        let mut registry = registry(&engine);
        let id = registry.active_id().unwrap();

        registry.entry_mut(id).unwrap().label = "Renamed".to_string();
        assert_eq!(registry.label(id).unwrap(), "Renamed");
        assert!(matches!(
            registry.entry_mut(ContextId::new()),
            Err(TabError::NotFound(_))
        ));
    }

    #[test]
    fn test_close_last_tab_is_refused() {
        let engine = FakeEngine::new();
        let mut registry = registry(&engine);
        let only = registry.active_id().unwrap();

        assert!(matches!(
            registry.close(only),
            Err(TabError::InvariantViolation(_))
        ));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_id().unwrap(), only);
    }

    #[test]
    fn test_close_unknown_tab() {
        let engine = FakeEngine::new();
        let mut registry = registry(&engine);

        assert!(matches!(
            registry.close(ContextId::new()),
            Err(TabError::NotFound(_))
        ));
    }

    #[test]
    fn test_close_active_prefers_same_index() {
        let engine = FakeEngine::new();
        let mut registry = registry(&engine);
        let first = registry.active_id().unwrap();
        let second = registry.open("https://a.com", "A");
        let third = registry.open("https://b.com", "B");

        registry.activate(second).unwrap();
        registry.close(second).unwrap();
        assert_eq!(registry.active_id().unwrap(), third);

        // Closing the active last tab falls back to the new last one
        registry.close(third).unwrap();
        assert_eq!(registry.active_id().unwrap(), first);
        assert!(engine.is_dropped(second));
        assert!(engine.is_dropped(third));
    }

    #[test]
    fn test_close_before_active_keeps_selection() {
        let engine = FakeEngine::new();
        let mut registry = registry(&engine);
        let first = registry.active_id().unwrap();
        let second = registry.open("https://a.com", "A");

        registry.close(first).unwrap();
        assert_eq!(registry.active_id().unwrap(), second);
        assert_eq!(registry.active_index(), 0);
    }

    #[test]
    fn test_activate() {
        let engine = FakeEngine::new();
        let mut registry = registry(&engine);
        let first = registry.active_id().unwrap();
        registry.open("https://a.com", "A");

        let ctx = registry.activate(first).unwrap();
        assert_eq!(ctx.id(), first);
        assert!(ctx.last_accessed_at() >= ctx.created_at());
        assert_eq!(registry.active().unwrap().id(), first);

        assert!(matches!(
            registry.activate(ContextId::new()),
            Err(TabError::NotFound(_))
        ));
        assert_eq!(registry.active_id().unwrap(), first);
    }

    #[test]
    fn test_activate_at_index() {
        let engine = FakeEngine::new();
        let mut registry = registry(&engine);
        let first = registry.active_id().unwrap();
        registry.open("https://a.com", "A");

        assert_eq!(registry.activate_at(0).unwrap().id(), first);
        assert_eq!(registry.active_index(), 0);
        assert!(matches!(
            registry.activate_at(2),
            Err(TabError::NotFound(_))
        ));
        assert_eq!(registry.active_id().unwrap(), first);
    }

    #[test]
    fn test_open_close_sequences_never_empty() {
        let engine = FakeEngine::new();
        let mut registry = registry(&engine);

        // Deterministic mix of opens and closes, including attempts on the
        // last tab.
        for step in 0..60usize {
            if step % 3 == 0 {
                registry.open(&format!("https://site{}.example", step), "tab");
            } else {
                let ids = registry.ids();
                let victim = ids[step % ids.len()];
                let _ = registry.close(victim);
            }
            assert!(registry.len() >= 1);
            assert!(registry.active_index() < registry.len());
            assert!(registry.active().is_ok());
        }
    }

    #[test]
    fn test_isolated_profiles_per_tab() {
        let engine = FakeEngine::new();
        let (tx, _rx) = view_event_channel();
        let mut registry = TabRegistry::new(
            Box::new(engine.clone()),
            ProfilePolicy::Isolated {
                root: PathBuf::from("/tmp/aurora-tabs"),
                template: ProfileConfig::default(),
            },
            InputResolver::new(),
            tx,
            "https://home.example",
            "Home",
        );
        let first = registry.active_id().unwrap();
        let second = registry.open("https://a.com", "A");

        let a = engine.profile(first).unwrap();
        let b = engine.profile(second).unwrap();
        assert_ne!(a.storage_path, b.storage_path);
        assert_eq!(registry.get(second).unwrap().profile(), &b);
    }

    #[test]
    fn test_views_report_with_their_context_id() {
        let engine = FakeEngine::new();
        let (tx, mut rx) = view_event_channel();
        let mut registry = TabRegistry::new(
            Box::new(engine.clone()),
            ProfilePolicy::Shared(ProfileConfig::default()),
            InputResolver::new(),
            tx,
            "https://home.example",
            "Home",
        );
        let second = registry.open("https://a.com", "A");

        let sink = engine.sink(second).unwrap();
        assert_eq!(sink.context_id(), second);
        sink.title_changed("A page");

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        let last = last.unwrap();
        assert_eq!(last.context_id, second);
        assert_eq!(last.event, crate::ViewEvent::TitleChanged("A page".into()));
    }
}
