//! The navigation pipeline.
//!
//! One navigation runs strictly in order: fetch -> parse -> swap -> scripts ->
//! lifecycle -> commit. Every attempt carries a [`NavToken`]; the router checks it
//! before touching the DOM and again before lifecycle/commit, so the content left
//! on screen is always that of the last-issued navigation.

use std::cell::RefCell;

use tracing::{debug, error, info};

use crate::config::RouterConfig;
use crate::error::NavError;
use crate::lifecycle::{LifecycleHost, plan_lifecycle, run_lifecycle};
use crate::page::PageFetcher;
use crate::reconcile::{Dom, reconcile};
use crate::scripts::{ScriptHost, ScriptReport, load_scripts};
use crate::state::{HistoryMode, NavToken, NavigationState};
use crate::widget::{Widget, WidgetRegistry};

/// Browser history and the full-page fallback.
pub trait HistoryHost {
    /// Push `{ path }` as a new history entry.
    fn push_history(&self, path: &str);
    /// Abandon the SPA flow and let the browser load `path` for real.
    fn hard_navigate(&self, path: &str);
}

/// Everything the router needs from its environment.
pub trait Host: PageFetcher + Dom + ScriptHost + LifecycleHost + HistoryHost {}

impl<T: PageFetcher + Dom + ScriptHost + LifecycleHost + HistoryHost> Host for T {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    /// Requested page is already displayed (or already loading); nothing fetched.
    Unchanged,
    Completed { scripts: ScriptReport },
    /// A later navigation took over; this one stopped without further effects.
    Superseded,
    /// Fetch/parse/swap failed; a full browser navigation was requested.
    FellBack(NavError),
}

pub struct Router<H> {
    host: H,
    config: RouterConfig,
    state: RefCell<NavigationState>,
    widgets: RefCell<WidgetRegistry>,
}

impl<H: Host> Router<H> {
    pub fn new(host: H, config: RouterConfig, initial_path: &str) -> Self {
        Self {
            host,
            config,
            state: RefCell::new(NavigationState::new(initial_path)),
            widgets: RefCell::new(WidgetRegistry::new()),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn current_path(&self) -> String {
        self.state.borrow().current_path().to_string()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().pending().is_some()
    }

    pub fn register_widget(&self, widget: Box<dyn Widget>, pages: impl IntoIterator<Item = String>) {
        let current = self.current_path();
        self.widgets.borrow_mut().register(widget, pages, &current);
    }

    /// User-initiated navigation (link click or the global navigate hook).
    pub async fn navigate_to(&self, path: &str) -> NavOutcome {
        let mode = {
            let mut state = self.state.borrow_mut();
            if state.pending().is_some_and(|p| p.path == path) {
                debug!(%path, "navigation already in flight");
                return NavOutcome::Unchanged;
            }
            if state.displays(path) {
                if state.pending().is_some() {
                    debug!(%path, "returning to displayed page; in-flight navigation dropped");
                    state.supersede();
                }
                return NavOutcome::Unchanged;
            }
            // Content of an uncommitted load is on screen but the URL never changed.
            if state.current_path() == path {
                HistoryMode::Replay
            } else {
                HistoryMode::Push
            }
        };
        self.load_page(path, mode).await
    }

    /// Back/forward: the browser has already moved to `location_path`.
    /// Fragment-only history moves keep the path and fetch nothing.
    pub async fn on_pop_state(&self, location_path: &str) -> NavOutcome {
        {
            let mut state = self.state.borrow_mut();
            if state.displays(location_path) {
                if state.pending().is_some() {
                    state.supersede();
                }
                return NavOutcome::Unchanged;
            }
        }
        self.load_page(location_path, HistoryMode::Replay).await
    }

    async fn load_page(&self, path: &str, mode: HistoryMode) -> NavOutcome {
        let token = self.state.borrow_mut().begin(path, mode);
        debug!(%path, token = token.get(), ?mode, "navigation started");

        if !self.host.has_content_container() {
            let err = NavError::LiveContainerMissing {
                container: self.config.content_container_id.clone(),
            };
            return self.fall_back(token, path, err);
        }

        let page = match self.host.fetch_page(path).await {
            Ok(page) => page,
            Err(err) => return self.fall_back(token, path, err),
        };
        if !self.is_latest(token) {
            debug!(%path, token = token.get(), "stale response discarded");
            return NavOutcome::Superseded;
        }

        if let Err(err) = reconcile(&self.host, &page, path, &self.config) {
            return self.fall_back(token, path, err);
        }
        self.state.borrow_mut().mark_swapped(token);

        let scripts = load_scripts(&page.scripts, &self.host).await;
        if !self.is_latest(token) {
            debug!(%path, token = token.get(), "superseded while loading scripts");
            return NavOutcome::Superseded;
        }

        run_lifecycle(&self.host, &plan_lifecycle(path, &self.config.lifecycle));
        self.widgets.borrow_mut().remount(path);

        if !self.state.borrow_mut().commit(token, path) {
            return NavOutcome::Superseded;
        }
        if mode == HistoryMode::Push {
            self.host.push_history(path);
        }
        info!(%path, "navigated");
        NavOutcome::Completed { scripts }
    }

    fn is_latest(&self, token: NavToken) -> bool {
        self.state.borrow().is_latest(token)
    }

    fn fall_back(&self, token: NavToken, path: &str, err: NavError) -> NavOutcome {
        if !self.is_latest(token) {
            debug!(%path, error = %err, "superseded navigation failed; ignored");
            return NavOutcome::Superseded;
        }
        self.state.borrow_mut().abandon(token);
        error!(%path, stage = %err.stage(), error = %err, "navigation failed; loading page directly");
        self.host.hard_navigate(path);
        NavOutcome::FellBack(err)
    }
}
