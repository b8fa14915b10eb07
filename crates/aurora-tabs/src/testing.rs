//! In-memory engine for tests
//!
//! Views keep a simple back/forward list and echo `LoadStarted` and
//! `UrlChanged` for every navigation. Finishing a load is left to the test,
//! through [`FakeEngine::sink`].

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ContextId;
use crate::engine::{Engine, ViewEventSink, WebView};
use crate::profile::ProfileConfig;

struct ViewRecord {
    profile: ProfileConfig,
    sink: ViewEventSink,
    history: Vec<String>,
    position: Option<usize>,
    loads: Vec<String>,
    history_moves: usize,
    reloads: usize,
    cookie_clears: usize,
    dropped: bool,
}

/// Cloning shares the recorded state, so a test can keep one handle and give
/// the other to the registry.
#[derive(Clone, Default)]
pub struct FakeEngine {
    views: Arc<Mutex<HashMap<ContextId, ViewRecord>>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs passed to `load` for a view, in order.
    pub fn loads(&self, id: ContextId) -> Vec<String> {
        self.views
            .lock()
            .get(&id)
            .map(|view| view.loads.clone())
            .unwrap_or_default()
    }

    pub fn history_moves(&self, id: ContextId) -> usize {
        self.views.lock().get(&id).map_or(0, |view| view.history_moves)
    }

    pub fn reloads(&self, id: ContextId) -> usize {
        self.views.lock().get(&id).map_or(0, |view| view.reloads)
    }

    pub fn cookie_clears(&self, id: ContextId) -> usize {
        self.views.lock().get(&id).map_or(0, |view| view.cookie_clears)
    }

    pub fn profile(&self, id: ContextId) -> Option<ProfileConfig> {
        self.views.lock().get(&id).map(|view| view.profile.clone())
    }

    /// The sink given to a view, for emitting engine events by hand.
    pub fn sink(&self, id: ContextId) -> Option<ViewEventSink> {
        self.views.lock().get(&id).map(|view| view.sink.clone())
    }

    pub fn is_dropped(&self, id: ContextId) -> bool {
        self.views.lock().get(&id).is_some_and(|view| view.dropped)
    }

    pub fn view_count(&self) -> usize {
        self.views.lock().len()
    }
}

impl Engine for FakeEngine {
    fn create_view(
        &mut self,
        id: ContextId,
        profile: &ProfileConfig,
        events: ViewEventSink,
    ) -> Box<dyn WebView> {
        self.views.lock().insert(
            id,
            ViewRecord {
                profile: profile.clone(),
                sink: events,
                history: Vec::new(),
                position: None,
                loads: Vec::new(),
                history_moves: 0,
                reloads: 0,
                cookie_clears: 0,
                dropped: false,
            },
        );

        Box::new(FakeView {
            id,
            views: Arc::clone(&self.views),
        })
    }
}

struct FakeView {
    id: ContextId,
    views: Arc<Mutex<HashMap<ContextId, ViewRecord>>>,
}

impl FakeView {
    fn with_record<T>(&self, f: impl FnOnce(&mut ViewRecord) -> T) -> Option<T> {
        self.views.lock().get_mut(&self.id).map(f)
    }

    fn move_by(&mut self, forward: bool) {
        self.with_record(|view| {
            let Some(position) = view.position else {
                return;
            };
            let target = if forward {
                position + 1
            } else {
                match position.checked_sub(1) {
                    Some(p) => p,
                    None => return,
                }
            };
            if let Some(url) = view.history.get(target).cloned() {
                view.position = Some(target);
                view.history_moves += 1;
                view.sink.load_started();
                view.sink.url_changed(url);
            }
        });
    }
}

impl WebView for FakeView {
    fn load(&mut self, url: &str) {
        self.with_record(|view| {
            let keep = view.position.map_or(0, |p| p + 1);
            view.history.truncate(keep);
            view.history.push(url.to_string());
            view.position = Some(view.history.len() - 1);
            view.loads.push(url.to_string());
            view.sink.load_started();
            view.sink.url_changed(url);
        });
    }

    fn back(&mut self) {
        self.move_by(false);
    }

    fn forward(&mut self) {
        self.move_by(true);
    }

    fn reload(&mut self) {
        self.with_record(|view| {
            view.reloads += 1;
            view.sink.load_started();
        });
    }

    fn can_go_back(&self) -> bool {
        self.with_record(|view| view.position.is_some_and(|p| p > 0))
            .unwrap_or(false)
    }

    fn can_go_forward(&self) -> bool {
        self.with_record(|view| {
            view.position
                .is_some_and(|p| p + 1 < view.history.len())
        })
        .unwrap_or(false)
    }

    fn url(&self) -> Option<String> {
        self.with_record(|view| view.position.and_then(|p| view.history.get(p).cloned()))
            .flatten()
    }

    fn title(&self) -> String {
        String::new()
    }

    fn clear_cookies(&mut self) {
        self.with_record(|view| view.cookie_clears += 1);
    }
}

impl Drop for FakeView {
    fn drop(&mut self) {
        self.with_record(|view| view.dropped = true);
    }
}
