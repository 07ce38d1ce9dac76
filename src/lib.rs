//! SPA navigation router for the portfolio site.
//!
//! Intercepts in-site link clicks, fetches the target page out of band, swaps the
//! content and modal regions, loads the page's scripts once, and signals the
//! independent widgets (games, carousel) through a lifecycle event. Browser
//! history is only touched after a navigation completed; any fetch or swap
//! failure falls back to a normal page load.
//!
//! The pipeline in [`router`] is written against small host traits so it runs
//! natively under `cargo test`; [`browser`] provides the `web-sys` host.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod page;
pub mod reconcile;
pub mod router;
pub mod scope;
pub mod scripts;
pub mod state;
pub mod widget;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use config::{LifecycleConfig, RouterConfig};
pub use error::{NavError, NavStage, RouterError, ScriptError, WidgetError};
pub use page::{PageDocument, PageFetcher, ScriptRef};
pub use router::{Host, HistoryHost, NavOutcome, Router};
pub use state::{HistoryMode, NavToken, NavigationState};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}
