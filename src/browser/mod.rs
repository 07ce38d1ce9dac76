//! Browser bindings (wasm32 only).
//!
//! [`BrowserHost`] implements the router's host traits on top of `web-sys`;
//! this module owns the single router instance and the JS-facing exports.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{error, info, warn};
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Window};

use crate::config::RouterConfig;
use crate::error::{RouterError, WidgetError};
use crate::router::Router;
use crate::widget::Widget;

mod dom;
mod events;
mod fetch;

pub use fetch::parse_page;

pub type BrowserRouter = Router<BrowserHost>;

thread_local! {
    static ROUTER: RefCell<Option<Rc<BrowserRouter>>> = const { RefCell::new(None) };
    static PAGE_HOOKS: RefCell<HashMap<String, js_sys::Function>> = RefCell::new(HashMap::new());
    // Widgets registered before the router started.
    static PENDING_WIDGETS: RefCell<Vec<(JsWidget, Vec<String>)>> = const { RefCell::new(Vec::new()) };
    static READY_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
}

pub struct BrowserHost {
    window: Window,
    document: Document,
    config: RouterConfig,
    /// Sources that have run in this document. Markup swapped in later may carry
    /// inert copies of the same tags, so the live DOM alone cannot answer this.
    executed_scripts: RefCell<HashSet<String>>,
}

impl BrowserHost {
    pub fn new(config: RouterConfig) -> Result<Self, RouterError> {
        let window = web_sys::window().ok_or(RouterError::NoWindow)?;
        let document = window.document().ok_or(RouterError::NoDocument)?;
        let host = Self { window, document, config, executed_scripts: RefCell::new(HashSet::new()) };
        host.record_document_scripts();
        Ok(host)
    }

    /// Record every `<script src>` currently in the document as executed.
    /// Only valid before the first swap, while all of them came from the parser.
    pub(crate) fn record_document_scripts(&self) {
        let Ok(scripts) = self.document.query_selector_all("script[src]") else {
            return;
        };
        let mut executed = self.executed_scripts.borrow_mut();
        for index in 0..scripts.length() {
            let src = scripts
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute("src"));
            if let Some(src) = src {
                executed.insert(src);
            }
        }
    }

    pub(crate) fn mark_script_executed(&self, src: &str) {
        self.executed_scripts.borrow_mut().insert(src.to_string());
    }

    pub(crate) fn script_executed(&self, src: &str) -> bool {
        self.executed_scripts.borrow().contains(src)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn content_container(&self) -> Option<Element> {
        self.document.get_element_by_id(&self.config.content_container_id)
    }

    pub(crate) fn modal_container(&self) -> Option<Element> {
        self.document.get_element_by_id(&self.config.modal_container_id)
    }

    /// Path plus query of the current location, the form navigation paths take.
    pub fn location_path(&self) -> String {
        let location = self.window.location();
        let pathname = location
            .pathname()
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "/".to_string());
        let search = location.search().unwrap_or_default();
        format!("{pathname}{search}")
    }

    /// URL relative hrefs resolve against (honours `<base href>`).
    pub fn base_url(&self) -> Option<Url> {
        let raw = self
            .document
            .base_uri()
            .ok()
            .flatten()
            .or_else(|| self.document.url().ok())?;
        Url::parse(&raw).ok()
    }
}

pub(crate) fn router() -> Option<Rc<BrowserRouter>> {
    ROUTER.with(|slot| slot.borrow().clone())
}

pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

fn to_js(err: RouterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Start the router with the default configuration.
///
/// Returns `false` when the page has no content container; links then keep
/// their native behaviour.
#[wasm_bindgen]
pub fn start_router() -> Result<bool, JsValue> {
    start(RouterConfig::default()).map_err(to_js)
}

/// Start the router with a JSON config override, e.g. `{"activeClass":"current"}`.
#[wasm_bindgen]
pub fn start_router_with_config(json: &str) -> Result<bool, JsValue> {
    let config = RouterConfig::from_json(json).map_err(to_js)?;
    start(config).map_err(to_js)
}

fn start(config: RouterConfig) -> Result<bool, RouterError> {
    if router().is_some() || READY_HANDLER.with(|slot| slot.borrow().is_some()) {
        return Err(RouterError::AlreadyStarted);
    }
    let host = BrowserHost::new(config)?;
    if host.document.ready_state() != "loading" {
        return install(host);
    }

    let document = host.document.clone();
    let mut host = Some(host);
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
        if let Some(host) = host.take() {
            if let Err(err) = install(host) {
                error!(error = %err, "router start failed");
            }
        }
    }));
    document
        .add_event_listener_with_callback("DOMContentLoaded", callback.as_ref().unchecked_ref())
        .map_err(|err| RouterError::Js(js_message(&err)))?;
    READY_HANDLER.with(|slot| *slot.borrow_mut() = Some(callback));
    Ok(true)
}

fn install(host: BrowserHost) -> Result<bool, RouterError> {
    if host.content_container().is_none() {
        let err = RouterError::MissingContainer { id: host.config.content_container_id.clone() };
        error!(error = %err, "router not installed");
        return Ok(false);
    }
    // Scripts parsed after a deferred start are picked up here.
    host.record_document_scripts();
    let initial_path = host.location_path();
    let config = host.config.clone();
    let router = Rc::new(Router::new(host, config, &initial_path));

    events::install(&router)?;
    // Installed before draining so widget init can navigate or register more widgets.
    ROUTER.with(|slot| *slot.borrow_mut() = Some(router.clone()));
    for (widget, pages) in PENDING_WIDGETS.with(|pending| std::mem::take(&mut *pending.borrow_mut())) {
        router.register_widget(Box::new(widget), pages);
    }
    info!(path = %initial_path, "router initialized");
    Ok(true)
}

/// Programmatic navigation, equivalent to clicking an in-scope link.
/// Before the router is running this is a plain page load.
#[wasm_bindgen]
pub fn navigate(path: &str) {
    match router() {
        Some(router) => events::spawn_navigation(router, path.to_string()),
        None => {
            if let Some(window) = web_sys::window() {
                if let Err(err) = window.location().set_href(path) {
                    warn!(%path, error = %js_message(&err), "direct navigation failed");
                }
            }
        }
    }
}

#[wasm_bindgen]
pub fn current_path() -> Option<String> {
    router().map(|r| r.current_path())
}

/// Register a named post-navigation hook (e.g. `initCarousel`).
#[wasm_bindgen]
pub fn register_page_hook(name: &str, hook: js_sys::Function) {
    PAGE_HOOKS.with(|hooks| hooks.borrow_mut().insert(name.to_string(), hook));
}

pub(crate) fn page_hook(name: &str) -> Option<js_sys::Function> {
    PAGE_HOOKS.with(|hooks| hooks.borrow().get(name).cloned())
}

/// Register a widget for `pages`. It is torn down before every navigation's
/// widgets are initialized and initialized whenever one of its pages loads.
#[wasm_bindgen]
pub fn register_widget(
    name: &str,
    pages: js_sys::Array,
    init: js_sys::Function,
    teardown: js_sys::Function,
) {
    let pages: Vec<String> = pages.iter().filter_map(|p| p.as_string()).collect();
    let widget = JsWidget { name: name.to_string(), init, teardown };
    match router() {
        // Deferred: widgets may register from inside another widget's init.
        Some(router) => wasm_bindgen_futures::spawn_local(async move {
            router.register_widget(Box::new(widget), pages);
        }),
        None => PENDING_WIDGETS.with(|pending| pending.borrow_mut().push((widget, pages))),
    }
}

struct JsWidget {
    name: String,
    init: js_sys::Function,
    teardown: js_sys::Function,
}

impl Widget for JsWidget {
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, path: &str) -> Result<(), WidgetError> {
        self.init
            .call1(&JsValue::NULL, &JsValue::from_str(path))
            .map(|_| ())
            .map_err(|err| WidgetError { name: self.name.clone(), message: js_message(&err) })
    }

    fn teardown(&mut self) {
        if let Err(err) = self.teardown.call0(&JsValue::NULL) {
            warn!(widget = %self.name, error = %js_message(&err), "widget teardown threw");
        }
    }
}
