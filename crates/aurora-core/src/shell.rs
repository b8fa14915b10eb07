//! Shell window
//!
//! Composes the tab registry, address bar, downloads dialog and history into
//! one top-level window. Toolbar actions go to the active context. Engine
//! events come back over two channels and are applied on the UI thread,
//! either drained synchronously or awaited one at a time.

use tokio::sync::mpsc;

use aurora_download::{
    download_event_channel, DownloadId, DownloadHandle, DownloadRecord, DownloadTracker,
    FilePicker, HandleEvent,
};
use aurora_navigation::{AddressBar, HistoryStore, InputResolver};
use aurora_tabs::{
    view_event_channel, BrowsingContext, ContextEvent, ContextId, Engine, TabError, TabRegistry,
    ViewEvent,
};

use crate::config::Config;
use crate::Result;

pub const APP_NAME: &str = "Aurora Browser";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Back,
    Forward,
    Reload,
    Home,
    NewTab,
    CloseTab,
    ShowDownloads,
}

pub struct ShellWindow {
    config: Config,
    tabs: TabRegistry,
    address_bar: AddressBar,
    downloads: DownloadTracker,
    history: HistoryStore,
    /// Status bar text, `None` when cleared
    status: Option<String>,
    title: String,
    downloads_visible: bool,
    view_events: mpsc::UnboundedReceiver<ContextEvent>,
    download_events: mpsc::UnboundedReceiver<HandleEvent>,
}

impl ShellWindow {
    /// Build the window: restore history and open the homepage tab.
    pub fn new(config: Config, engine: Box<dyn Engine>, picker: Box<dyn FilePicker>) -> Self {
        let resolver = InputResolver::with_default_scheme(config.default_scheme);
        let homepage = resolver.resolve(&config.homepage);

        let mut history = HistoryStore::load(config.history_path());

        let (view_tx, view_events) = view_event_channel();
        let tabs = TabRegistry::new(
            engine,
            config.profile_policy(),
            resolver.clone(),
            view_tx,
            &homepage,
            homepage.clone(),
        );
        history.append(homepage.as_str());

        let (download_tx, download_events) = download_event_channel();
        let downloads = DownloadTracker::new(picker, config.download_dir.clone(), download_tx);

        let mut shell = Self {
            config,
            tabs,
            address_bar: AddressBar::new(resolver),
            downloads,
            history,
            status: None,
            title: APP_NAME.to_string(),
            downloads_visible: false,
            view_events,
            download_events,
        };
        shell.refresh_chrome();

        tracing::info!(homepage = %homepage, "Shell window ready");

        shell
    }

    // === Toolbar and address bar ===

    pub fn trigger(&mut self, action: ToolbarAction) -> Result<()> {
        tracing::debug!(action = ?action, "Toolbar action");

        match action {
            ToolbarAction::Back => self.tabs.active_mut()?.back(),
            ToolbarAction::Forward => self.tabs.active_mut()?.forward(),
            ToolbarAction::Reload => self.tabs.active_mut()?.reload(),
            ToolbarAction::Home => self.navigate_home()?,
            ToolbarAction::NewTab => {
                let homepage = self.config.homepage.clone();
                self.open_tab(&homepage)?;
            }
            ToolbarAction::CloseTab => {
                let id = self.tabs.active_id()?;
                self.close_tab(id)?;
            }
            ToolbarAction::ShowDownloads => self.downloads_visible = true,
        }

        Ok(())
    }

    /// The user pressed enter in the address bar.
    pub fn submit_address(&mut self, text: &str) -> Result<()> {
        let url = self.address_bar.submit(text);
        self.tabs.active_mut()?.load(&url);
        self.history.append(url);
        Ok(())
    }

    pub fn navigate_home(&mut self) -> Result<()> {
        let homepage = self.config.homepage.clone();
        let url = self.tabs.active_mut()?.navigate(&homepage);
        self.history.append(url);
        Ok(())
    }

    // === Tabs ===

    /// Open a tab for address bar style input and switch to it.
    pub fn open_tab(&mut self, text: &str) -> Result<ContextId> {
        let url = self.address_bar.resolver().resolve(text);
        let id = self.tabs.open(&url, url.clone());
        self.history.append(url);
        self.refresh_chrome();
        Ok(id)
    }

    pub fn close_tab(&mut self, id: ContextId) -> Result<()> {
        let was_active = self.tabs.active_id()? == id;
        self.tabs.close(id)?;
        if was_active {
            self.refresh_chrome();
        }
        Ok(())
    }

    pub fn activate_tab(&mut self, id: ContextId) -> Result<()> {
        self.tabs.activate(id)?;
        self.refresh_chrome();
        Ok(())
    }

    // === Downloads ===

    /// Engine callback for a new download. Decides before returning.
    pub fn on_download_requested(&mut self, handle: &mut dyn DownloadHandle) -> Option<DownloadId> {
        let id = self.downloads.on_download_requested(handle)?;
        self.downloads_visible = true;
        Some(id)
    }

    pub fn hide_downloads(&mut self) {
        self.downloads_visible = false;
    }

    // === Engine events ===

    pub fn dispatch_view_event(&mut self, event: ContextEvent) {
        let ContextEvent { context_id, event } = event;

        // Late events for a closed tab
        let Ok(entry) = self.tabs.entry_mut(context_id) else {
            tracing::debug!(context_id = %context_id, event = ?event, "Dropping event for closed tab");
            return;
        };

        if let Err(e) = entry.context.apply(&event) {
            tracing::warn!(context_id = %context_id, error = %e, "Ignoring engine event");
            return;
        }

        if let ViewEvent::TitleChanged(title) = &event {
            if !title.is_empty() {
                entry.label = title.clone();
            }
        }

        if self.tabs.active_id().ok() != Some(context_id) {
            return;
        }

        match event {
            ViewEvent::UrlChanged(url) => self.address_bar.reflect(&url),
            ViewEvent::TitleChanged(title) => self.title = window_title(&title),
            ViewEvent::LoadStarted => self.status = Some(loading_status(0)),
            ViewEvent::LoadProgress(percent) => self.status = Some(loading_status(percent)),
            ViewEvent::LoadFinished { ok: true } => self.status = None,
            ViewEvent::LoadFinished { ok: false } => {
                let url = self
                    .tabs
                    .get(context_id)
                    .map(|ctx| ctx.current_url().to_string())
                    .unwrap_or_default();
                self.status = Some(format!("Failed to load {}", url));
            }
        }
    }

    pub fn dispatch_download_event(&mut self, event: HandleEvent) {
        self.downloads.apply(&event);
    }

    /// Apply every event already queued. Returns how many were handled.
    pub fn process_pending_events(&mut self) -> usize {
        let mut handled = 0;

        while let Ok(event) = self.view_events.try_recv() {
            self.dispatch_view_event(event);
            handled += 1;
        }
        while let Ok(event) = self.download_events.try_recv() {
            self.dispatch_download_event(event);
            handled += 1;
        }

        handled
    }

    /// Wait for the next engine event and apply it.
    ///
    /// The registry and the tracker hold the senders for the shell's whole
    /// lifetime, so neither channel closes while this can be called.
    pub async fn next_event(&mut self) {
        tokio::select! {
            event = self.view_events.recv() => {
                if let Some(event) = event {
                    self.dispatch_view_event(event);
                }
            }
            event = self.download_events.recv() => {
                if let Some(event) = event {
                    self.dispatch_download_event(event);
                }
            }
        }
    }

    // === Shutdown ===

    /// Persist history. A failed write leaves the in-memory history intact
    /// and is shown in the status bar.
    pub fn shutdown(&mut self) -> Result<()> {
        let path = self.config.history_path();

        if let Err(e) = self.history.save(&path) {
            tracing::error!(path = %path.display(), error = %e, "Failed to save history");
            self.status = Some(format!("History was not saved: {}", e));
            return Err(e.into());
        }

        tracing::info!("Shell window closed");
        Ok(())
    }

    // === Accessors ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tabs(&self) -> &TabRegistry {
        &self.tabs
    }

    pub fn active(&self) -> Result<&BrowsingContext> {
        Ok(self.tabs.active()?)
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn downloads(&self) -> &[DownloadRecord] {
        self.downloads.records()
    }

    pub fn download_tracker(&self) -> &DownloadTracker {
        &self.downloads
    }

    pub fn downloads_visible(&self) -> bool {
        self.downloads_visible
    }

    pub fn address_text(&self) -> &str {
        self.address_bar.text()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Point the address bar, title and status at the active context.
    fn refresh_chrome(&mut self) {
        let Ok(context) = self.tabs.active() else {
            tracing::error!(error = %TabError::EmptyRegistry, "No active tab to display");
            return;
        };

        self.address_bar.reflect(context.current_url());
        self.title = window_title(context.current_title());
        self.status = if context.load_state().is_loading() {
            Some(loading_status(context.load_progress()))
        } else {
            None
        };
    }
}

fn loading_status(percent: u8) -> String {
    match percent.min(100) {
        0 => "Loading...".to_string(),
        percent => format!("Loading... {}%", percent),
    }
}

fn window_title(page_title: &str) -> String {
    if page_title.is_empty() {
        APP_NAME.to_string()
    } else {
        format!("{} - {}", page_title, APP_NAME)
    }
}
