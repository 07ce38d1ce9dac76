//! Post-navigation notifications for the independent page widgets.
//!
//! The router's only integration contract with the rest of the site: after a
//! page is swapped in and its scripts have settled, configured hooks run and
//! interactive pages get exactly one lifecycle event carrying the new path.

use tracing::{debug, error};

use crate::config::LifecycleConfig;
use crate::error::NavError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Call a registered page hook (e.g. the home-page carousel).
    InvokeHook(String),
    /// Broadcast `event` on the document with detail `{ path }`.
    Dispatch { event: String, path: String },
}

pub trait LifecycleHost {
    /// Run the hook named `name`. Returns false when no such hook is registered.
    fn invoke_hook(&self, name: &str) -> bool;
    fn dispatch_lifecycle(&self, event: &str, path: &str) -> Result<(), NavError>;
}

pub fn plan_lifecycle(path: &str, config: &LifecycleConfig) -> Vec<LifecycleAction> {
    let mut actions: Vec<LifecycleAction> = config
        .page_hooks
        .get(path)
        .into_iter()
        .flatten()
        .map(|name| LifecycleAction::InvokeHook(name.clone()))
        .collect();
    if config.interactive_pages.contains(path) {
        actions.push(LifecycleAction::Dispatch {
            event: config.event_name.clone(),
            path: path.to_string(),
        });
    }
    actions
}

/// Execute `actions` in order. A missing hook or a failed dispatch is logged and
/// does not stop the remaining actions.
pub fn run_lifecycle<H: LifecycleHost + ?Sized>(host: &H, actions: &[LifecycleAction]) {
    for action in actions {
        match action {
            LifecycleAction::InvokeHook(name) => {
                if !host.invoke_hook(name) {
                    debug!(hook = %name, "page hook not registered; skipped");
                }
            }
            LifecycleAction::Dispatch { event, path } => {
                if let Err(err) = host.dispatch_lifecycle(event, path) {
                    error!(%path, %event, error = %err, "lifecycle dispatch failed");
                }
            }
        }
    }
}
