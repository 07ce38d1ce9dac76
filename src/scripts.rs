//! Loading the external scripts a fetched page depends on, each at most once.

use std::collections::HashSet;

use futures_util::future::{LocalBoxFuture, join_all};
use tracing::{debug, warn};

use crate::error::ScriptError;
use crate::page::ScriptRef;

pub trait ScriptHost {
    /// Whether a script with this exact source has already been loaded into the document.
    fn has_script(&self, src: &str) -> bool;

    /// Append a `<script src>` now and return a future for its load result.
    /// The element must be in the document when this returns.
    fn inject_script(&self, src: &str) -> LocalBoxFuture<'static, Result<(), ScriptError>>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptPlan {
    pub present: Vec<String>,
    pub missing: Vec<String>,
}

/// Partition the page's scripts into already-loaded and missing, dropping repeats.
pub fn plan_scripts<H: ScriptHost + ?Sized>(scripts: &[ScriptRef], host: &H) -> ScriptPlan {
    let mut seen = HashSet::new();
    let mut plan = ScriptPlan::default();
    for script in scripts {
        if !seen.insert(script.src.as_str()) {
            continue;
        }
        if host.has_script(&script.src) {
            plan.present.push(script.src.clone());
        } else {
            plan.missing.push(script.src.clone());
        }
    }
    plan
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub loaded: Vec<String>,
    pub already_present: Vec<String>,
    pub failed: Vec<ScriptError>,
}

/// Inject every missing script, then wait for all of them to settle.
///
/// Injection happens for the whole batch before the first suspension point, so
/// the presence check and the append cannot interleave with another navigation.
/// Load failures are logged and reported but never abort the navigation.
pub async fn load_scripts<H: ScriptHost + ?Sized>(scripts: &[ScriptRef], host: &H) -> ScriptReport {
    let plan = plan_scripts(scripts, host);
    if !plan.present.is_empty() {
        debug!(count = plan.present.len(), "scripts already present");
    }

    let loads: Vec<_> = plan.missing.iter().map(|src| host.inject_script(src)).collect();
    let results = join_all(loads).await;

    let mut report = ScriptReport { already_present: plan.present, ..ScriptReport::default() };
    for (src, result) in plan.missing.into_iter().zip(results) {
        match result {
            Ok(()) => {
                debug!(%src, "script loaded");
                report.loaded.push(src);
            }
            Err(err) => {
                warn!(src = %err.src(), error = %err, "script failed to load; continuing");
                report.failed.push(err);
            }
        }
    }
    report
}
