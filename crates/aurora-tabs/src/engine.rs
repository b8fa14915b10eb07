//! Embedded engine seam
//!
//! The web engine renders, runs scripts, talks to the network and keeps each
//! view's page history. The shell only drives it through [`WebView`] and
//! hears back through the [`ViewEventSink`] it hands over when the view is
//! created.

use tokio::sync::mpsc;

use crate::context::ContextId;
use crate::profile::ProfileConfig;

/// Creates views for new browsing contexts.
pub trait Engine {
    /// Create a view configured with `profile`. The view reports url, title
    /// and load changes through `events` from then on.
    fn create_view(
        &mut self,
        id: ContextId,
        profile: &ProfileConfig,
        events: ViewEventSink,
    ) -> Box<dyn WebView>;
}

/// One navigable document view owned by the engine.
///
/// Every method returns immediately. Results arrive later as [`ViewEvent`]s.
pub trait WebView {
    fn load(&mut self, url: &str);
    fn back(&mut self);
    fn forward(&mut self);
    fn reload(&mut self);
    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    fn url(&self) -> Option<String>;
    fn title(&self) -> String;
    /// Drop every cookie stored by this view's profile.
    fn clear_cookies(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    UrlChanged(String),
    TitleChanged(String),
    LoadStarted,
    /// Percentage, 0-100
    LoadProgress(u8),
    LoadFinished { ok: bool },
}

/// A view event tagged with the context it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEvent {
    pub context_id: ContextId,
    pub event: ViewEvent,
}

/// Sending half handed to a single view.
#[derive(Debug, Clone)]
pub struct ViewEventSink {
    context_id: ContextId,
    tx: mpsc::UnboundedSender<ContextEvent>,
}

impl ViewEventSink {
    pub fn new(context_id: ContextId, tx: mpsc::UnboundedSender<ContextEvent>) -> Self {
        Self { context_id, tx }
    }

    pub fn context_id(&self) -> ContextId {
        self.context_id
    }

    /// Queue `event` for the shell. Returns `false` once the shell is gone.
    pub fn emit(&self, event: ViewEvent) -> bool {
        self.tx
            .send(ContextEvent {
                context_id: self.context_id,
                event,
            })
            .is_ok()
    }

    pub fn url_changed(&self, url: impl Into<String>) -> bool {
        self.emit(ViewEvent::UrlChanged(url.into()))
    }

    pub fn title_changed(&self, title: impl Into<String>) -> bool {
        self.emit(ViewEvent::TitleChanged(title.into()))
    }

    pub fn load_started(&self) -> bool {
        self.emit(ViewEvent::LoadStarted)
    }

    pub fn load_progress(&self, percent: u8) -> bool {
        self.emit(ViewEvent::LoadProgress(percent))
    }

    pub fn load_finished(&self, ok: bool) -> bool {
        self.emit(ViewEvent::LoadFinished { ok })
    }
}

pub fn view_event_channel() -> (
    mpsc::UnboundedSender<ContextEvent>,
    mpsc::UnboundedReceiver<ContextEvent>,
) {
    mpsc::unbounded_channel()
}
