//! Shell state: the dashboard, its persisted documents, and pending writes.
//!
//! DESIGN
//! ======
//! `Shell` is the single owner of the [`DashboardState`]. Host input goes
//! through [`Shell::handle`], which dispatches into the engine and carries
//! out the returned actions. Document saves are fire-and-forget tasks in a
//! `JoinSet`; nothing waits on them except [`Shell::flush`] at shutdown.
//!
//! SYSTEM CONTEXT
//! ==============
//! Bootstrap order matters. Style settings are read before modules load so
//! providers see them; the registry is pruned before layout so the
//! clock-only fallback sees the final widget set; visibility runs after
//! layout so hidden widgets keep their restored geometry.
//!
//! ```text
//! styles -> registry -> modules (prune missing) -> mount
//!        -> positions -> visibility -> flags -> app config -> feed plan
//! ```

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::sync::Arc;

use dashboard::geometry::Size;
use dashboard::layout::LayoutMap;
use dashboard::registry::Registry;
use dashboard::styles::StyleSettingsMap;
use dashboard::visibility::VisibilityMap;
use dashboard::widget::ProviderRegistry;
use dashboard::input::InputEvent;
use dashboard::{Action, DashboardState};
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::WIDGETS_ROOT;
use crate::error::ShellError;
use crate::net::Backend;
use crate::services::flags::{self, TELEMETRY_CONTAINERS};
use crate::services::modules::ModuleLoader;
use crate::services::panels::{FeedStatus, NetworkPanels};
use crate::services::persistence::{self, DocumentStore};
use crate::services::registry::load_registry;

/// What to do about the telemetry feed after bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPlan {
    /// Flags are off or unreadable.
    Disabled,
    /// Telemetry is on but no port is configured.
    NoPort,
    Connect(u16),
}

/// Outcome of [`Shell::bootstrap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootReport {
    /// Container ids rendered into the widget layer.
    pub mounted: Vec<String>,
    /// Widget ids whose assets could not be loaded.
    pub pruned: Vec<String>,
    pub feed: FeedPlan,
}

/// Outcome of [`Shell::flush`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub saved: usize,
    pub failed: usize,
}

pub struct Shell {
    dashboard: DashboardState,
    backend: Arc<dyn Backend>,
    loader: ModuleLoader,
    layout_store: DocumentStore<LayoutMap>,
    visibility_store: DocumentStore<VisibilityMap>,
    styles_store: DocumentStore<StyleSettingsMap>,
    panels: Arc<RwLock<NetworkPanels>>,
    pending: JoinSet<Result<(), ShellError>>,
}

impl Shell {
    #[must_use]
    pub fn new(viewport: Size, backend: Arc<dyn Backend>, providers: ProviderRegistry) -> Self {
        Self {
            dashboard: DashboardState::new(viewport),
            loader: ModuleLoader::new(WIDGETS_ROOT, providers),
            layout_store: persistence::layout_store(backend.clone()),
            visibility_store: persistence::visibility_store(backend.clone()),
            styles_store: persistence::styles_store(backend.clone()),
            backend,
            panels: Arc::new(RwLock::new(NetworkPanels::new())),
            pending: JoinSet::new(),
        }
    }

    #[must_use]
    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }

    /// Telemetry panels shared with the feed bridge.
    #[must_use]
    pub fn panels(&self) -> Arc<RwLock<NetworkPanels>> {
        self.panels.clone()
    }

    /// Number of saves not yet reaped.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Load everything and bring the dashboard up. Never fails; each step
    /// falls back on its own.
    pub async fn bootstrap(&mut self) -> BootReport {
        if let Some(styles) = self.styles_store.load().await {
            self.dashboard.set_styles(styles);
        }

        let mut entries = load_registry(self.backend.as_ref()).await;
        let mut loaded = Vec::new();
        for entry in &mut entries {
            let saved = self.dashboard.saved_styles(&entry.id);
            match self.loader.load(self.backend.as_ref(), self.dashboard.doc_mut(), entry, &saved).await {
                Ok(descriptor) => loaded.push((entry.id.clone(), descriptor)),
                Err(e) => warn!(widget = %entry.id, error = %e, "widget unavailable"),
            }
        }
        let mut registry = Registry::new(entries);
        let pruned = registry.prune_missing();
        if !pruned.is_empty() {
            info!(?pruned, "pruned widgets with missing assets");
        }
        self.dashboard.set_registry(registry);

        let mut mounted = Vec::new();
        for (widget_id, descriptor) in loaded {
            match self.dashboard.mount(&widget_id, descriptor) {
                Ok(container_id) => mounted.push(container_id),
                Err(e) => error!(widget = %widget_id, error = %e, "widget render failed"),
            }
        }

        let skipped = match self.layout_store.load().await {
            Some(stored) => self.dashboard.apply_layout(&stored),
            None => self.dashboard.apply_default_layout(),
        };
        if !skipped.is_empty() {
            debug!(?skipped, "layout entries without a container");
        }

        let stored = self.visibility_store.load().await;
        if let Some(action) = self.dashboard.apply_visibility(stored.as_ref()) {
            self.perform(&[action]);
        }

        let feed = self.plan_feed().await;
        info!(mounted = mounted.len(), pruned = pruned.len(), ?feed, "dashboard ready");
        BootReport { mounted, pruned, feed }
    }

    async fn plan_feed(&mut self) -> FeedPlan {
        let Some(flags) = flags::load_flags(self.backend.as_ref()).await else {
            return FeedPlan::Disabled;
        };
        if !flags.telemetry_enabled() {
            info!("telemetry widgets disabled by config; hiding panels");
            self.dashboard.suppress(&TELEMETRY_CONTAINERS);
            return FeedPlan::Disabled;
        }
        match flags::load_feed_port(self.backend.as_ref()).await {
            Some(port) => FeedPlan::Connect(port),
            None => {
                self.panels.write().await.set_status(FeedStatus::NoPort);
                FeedPlan::NoPort
            }
        }
    }

    /// Dispatch one host event and carry out its actions.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Action> {
        self.reap();
        let actions = self.dashboard.dispatch(event);
        self.perform(&actions);
        actions
    }

    fn perform(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::SavePositions(doc) => self.spawn_save(self.layout_store.clone(), doc.clone()),
                Action::SaveVisibility(doc) => self.spawn_save(self.visibility_store.clone(), doc.clone()),
                Action::SaveStyles(doc) => self.spawn_save(self.styles_store.clone(), doc.clone()),
                other => debug!(action = ?other, "action"),
            }
        }
    }

    fn spawn_save<V>(&mut self, store: DocumentStore<V>, doc: V)
    where
        V: serde::Serialize + serde::de::DeserializeOwned + Send + Sync + 'static,
    {
        self.pending.spawn(async move { store.save(&doc).await });
    }

    /// Drop finished saves without waiting.
    fn reap(&mut self) {
        while let Some(done) = self.pending.try_join_next() {
            if let Err(e) = done {
                error!(error = %e, "save task panicked");
            }
        }
    }

    /// Wait for every pending save.
    pub async fn flush(&mut self) -> FlushSummary {
        let mut summary = FlushSummary::default();
        while let Some(done) = self.pending.join_next().await {
            match done {
                Ok(Ok(())) => summary.saved += 1,
                Ok(Err(_)) => summary.failed += 1,
                Err(e) => {
                    error!(error = %e, "save task panicked");
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}
