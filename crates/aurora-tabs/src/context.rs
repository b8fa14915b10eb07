//! Browsing context
//!
//! One tab's browsing session: its profile, its engine view and the state the
//! shell displays for it. `current_url` and `current_title` change only when
//! the engine reports them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aurora_navigation::InputResolver;

use crate::engine::{ViewEvent, WebView};
use crate::error::TabError;
use crate::profile::ProfileConfig;
use crate::state::LoadState;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(Uuid);

impl ContextId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct BrowsingContext {
    id: ContextId,
    profile: ProfileConfig,
    view: Box<dyn WebView>,
    resolver: InputResolver,
    current_url: String,
    current_title: String,
    load_state: LoadState,
    load_progress: u8,
    created_at: DateTime<Utc>,
    last_accessed_at: DateTime<Utc>,
}

impl BrowsingContext {
    pub(crate) fn new(
        id: ContextId,
        profile: ProfileConfig,
        view: Box<dyn WebView>,
        resolver: InputResolver,
    ) -> Self {
        let now = Utc::now();
        // A view may come up already showing a page
        let current_url = view.url().unwrap_or_default();
        let current_title = view.title();

        Self {
            id,
            profile,
            view,
            resolver,
            current_url,
            current_title,
            load_state: LoadState::Idle,
            load_progress: 0,
            created_at: now,
            last_accessed_at: now,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn profile(&self) -> &ProfileConfig {
        &self.profile
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    pub fn current_title(&self) -> &str {
        &self.current_title
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn load_progress(&self) -> u8 {
        self.load_progress
    }

    pub fn can_go_back(&self) -> bool {
        self.view.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.view.can_go_forward()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_accessed_at(&self) -> DateTime<Utc> {
        self.last_accessed_at
    }

    /// Title if the page has one, URL otherwise
    pub fn display_title(&self) -> &str {
        if self.current_title.is_empty() {
            &self.current_url
        } else {
            &self.current_title
        }
    }

    /// Hand an already normalized URL to the engine.
    pub fn load(&mut self, url: &str) {
        tracing::debug!(context_id = %self.id, url = %url, "Loading URL");
        self.begin_loading();
        self.view.load(url);
    }

    /// Normalize address bar text and load it. Returns the URL handed to the
    /// engine. Load failures are reported later through
    /// [`ViewEvent::LoadFinished`], never here.
    pub fn navigate(&mut self, raw_text: &str) -> String {
        let url = self.resolver.resolve(raw_text);
        self.load(&url);
        url
    }

    pub fn back(&mut self) {
        if !self.view.can_go_back() {
            tracing::debug!(context_id = %self.id, "No back history");
            return;
        }
        self.begin_loading();
        self.view.back();
    }

    pub fn forward(&mut self) {
        if !self.view.can_go_forward() {
            tracing::debug!(context_id = %self.id, "No forward history");
            return;
        }
        self.begin_loading();
        self.view.forward();
    }

    pub fn reload(&mut self) {
        self.begin_loading();
        self.view.reload();
    }

    pub fn clear_cookies(&mut self) {
        tracing::info!(context_id = %self.id, profile = %self.profile.name, "Clearing cookies");
        self.view.clear_cookies();
    }

    /// Record that the user looked at this context.
    pub fn touch(&mut self) {
        self.last_accessed_at = Utc::now();
    }

    pub fn on_url_changed(&mut self, url: impl Into<String>) {
        self.current_url = url.into();
    }

    pub fn on_title_changed(&mut self, title: impl Into<String>) {
        self.current_title = title.into();
    }

    pub fn on_load_started(&mut self) {
        self.begin_loading();
    }

    pub fn on_load_progress(&mut self, percent: u8) {
        self.load_progress = percent.min(100);
    }

    pub fn on_load_finished(&mut self, ok: bool) -> Result<()> {
        let target = if ok {
            LoadState::Loaded
        } else {
            LoadState::Failed
        };
        self.transition_to(target)?;
        if ok {
            self.load_progress = 100;
        }
        Ok(())
    }

    /// Apply one engine event to this context.
    pub fn apply(&mut self, event: &ViewEvent) -> Result<()> {
        match event {
            ViewEvent::UrlChanged(url) => self.on_url_changed(url.as_str()),
            ViewEvent::TitleChanged(title) => self.on_title_changed(title.as_str()),
            ViewEvent::LoadStarted => self.on_load_started(),
            ViewEvent::LoadProgress(percent) => self.on_load_progress(*percent),
            ViewEvent::LoadFinished { ok } => self.on_load_finished(*ok)?,
        }
        Ok(())
    }

    fn begin_loading(&mut self) {
        // Loading is reachable from every state.
        self.load_state = LoadState::Loading;
        self.load_progress = 0;
    }

    fn transition_to(&mut self, new_state: LoadState) -> Result<()> {
        if !self.load_state.can_transition_to(new_state) {
            return Err(TabError::InvalidTransition {
                from: self.load_state.to_string(),
                to: new_state.to_string(),
            });
        }

        tracing::debug!(
            context_id = %self.id,
            from = %self.load_state,
            to = %new_state,
            "Load state transition"
        );

        self.load_state = new_state;
        Ok(())
    }
}

impl std::fmt::Debug for BrowsingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowsingContext")
            .field("id", &self.id)
            .field("profile", &self.profile.name)
            .field("current_url", &self.current_url)
            .field("current_title", &self.current_title)
            .field("load_state", &self.load_state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{view_event_channel, Engine, ViewEventSink};
    use crate::testing::FakeEngine;

    fn context(engine: &mut FakeEngine) -> BrowsingContext {
        let id = ContextId::new();
        let (tx, _rx) = view_event_channel();
        let profile = ProfileConfig::default();
        let view = engine.create_view(id, &profile, ViewEventSink::new(id, tx));
        BrowsingContext::new(id, profile, view, InputResolver::new())
    }

    #[test]
    fn test_navigate_normalizes_before_loading() {
        let mut engine = FakeEngine::new();
        let mut ctx = context(&mut engine);

        let url = ctx.navigate("example.com");

        assert_eq!(url, "https://example.com");
        assert_eq!(engine.loads(ctx.id()), vec!["https://example.com"]);
        assert_eq!(ctx.load_state(), LoadState::Loading);
    }

    #[test]
    fn test_unparseable_input_still_reaches_engine() {
        let mut engine = FakeEngine::new();
        let mut ctx = context(&mut engine);

        assert_eq!(ctx.navigate("two words"), "https://two words");
        assert_eq!(engine.loads(ctx.id()), vec!["https://two words"]);
        assert_eq!(ctx.load_state(), LoadState::Loading);

        // The engine's failure event is what ends the load
        ctx.apply(&ViewEvent::LoadFinished { ok: false }).unwrap();
        assert_eq!(ctx.load_state(), LoadState::Failed);
    }

    #[test]
    fn test_new_context_starts_from_view_state() {
        let mut engine = FakeEngine::new();
        let id = ContextId::new();
        let (tx, _rx) = view_event_channel();
        let profile = ProfileConfig::default();
        let mut view = engine.create_view(id, &profile, ViewEventSink::new(id, tx));
        view.load("https://restored.example");

        let ctx = BrowsingContext::new(id, profile, view, InputResolver::new());
        assert_eq!(ctx.current_url(), "https://restored.example");
        assert_eq!(ctx.current_title(), "");
        assert_eq!(ctx.load_state(), LoadState::Idle);
        assert_eq!(ctx.created_at(), ctx.last_accessed_at());
    }

    #[test]
    fn test_back_and_forward_without_history_are_noops() {
        let mut engine = FakeEngine::new();
        let mut ctx = context(&mut engine);
        ctx.load("https://a.com");
        ctx.on_url_changed("https://a.com");
        ctx.on_load_finished(true).unwrap();

        ctx.back();
        ctx.forward();

        assert_eq!(ctx.current_url(), "https://a.com");
        assert_eq!(ctx.load_state(), LoadState::Loaded);
        assert_eq!(engine.history_moves(ctx.id()), 0);
    }

    #[test]
    fn test_load_state_follows_events() {
        let mut engine = FakeEngine::new();
        let mut ctx = context(&mut engine);

        ctx.apply(&ViewEvent::LoadStarted).unwrap();
        ctx.apply(&ViewEvent::LoadProgress(140)).unwrap();
        assert_eq!(ctx.load_progress(), 100);

        ctx.apply(&ViewEvent::LoadFinished { ok: false }).unwrap();
        assert_eq!(ctx.load_state(), LoadState::Failed);

        // A second finish has no load to end
        assert!(matches!(
            ctx.apply(&ViewEvent::LoadFinished { ok: true }),
            Err(TabError::InvalidTransition { .. })
        ));

        ctx.reload();
        assert_eq!(ctx.load_state(), LoadState::Loading);
    }

    #[test]
    fn test_title_and_url_events() {
        let mut engine = FakeEngine::new();
        let mut ctx = context(&mut engine);

        ctx.apply(&ViewEvent::UrlChanged("https://rust-lang.org/".into()))
            .unwrap();
        assert_eq!(ctx.display_title(), "https://rust-lang.org/");

        ctx.apply(&ViewEvent::TitleChanged("Rust".into())).unwrap();
        assert_eq!(ctx.current_title(), "Rust");
        assert_eq!(ctx.display_title(), "Rust");
    }

    #[test]
    fn test_clear_cookies_reaches_engine() {
        let mut engine = FakeEngine::new();
        let mut ctx = context(&mut engine);

        ctx.clear_cookies();
        assert_eq!(engine.cookie_clears(ctx.id()), 1);
    }
}
