use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, MouseEvent, Node};

use super::{BrowserRouter, js_message, router};
use crate::error::RouterError;
use crate::scope::{LinkInfo, LinkScope, classify};

thread_local! {
    static LINK_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(Event)>>> = const { RefCell::new(None) };
    static POPSTATE_HANDLER: RefCell<Option<Closure<dyn FnMut(Event)>>> = const { RefCell::new(None) };
    static NAVIGATE_FN: RefCell<Option<Closure<dyn Fn(String)>>> = const { RefCell::new(None) };
}

pub(super) fn spawn_navigation(router: Rc<BrowserRouter>, path: String) {
    spawn_local(async move {
        router.navigate_to(&path).await;
    });
}

/// Capture-phase click interception, `popstate`, and the global navigate function.
pub(super) fn install(instance: &Rc<BrowserRouter>) -> Result<(), RouterError> {
    let host = instance.host();
    let js_err = |err: JsValue| RouterError::Js(js_message(&err));

    let on_click = Closure::<dyn FnMut(Event)>::wrap(Box::new(intercept_link_click));
    host.document()
        .add_event_listener_with_callback_and_bool("click", on_click.as_ref().unchecked_ref(), true)
        .map_err(js_err)?;
    LINK_CLICK_HANDLER.with(|slot| *slot.borrow_mut() = Some(on_click));

    let window = web_sys::window().ok_or(RouterError::NoWindow)?;
    let on_popstate = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_event: Event| {
        let Some(router) = router() else {
            return;
        };
        let path = router.host().location_path();
        spawn_local(async move {
            router.on_pop_state(&path).await;
        });
    }));
    window
        .add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())
        .map_err(js_err)?;
    POPSTATE_HANDLER.with(|slot| *slot.borrow_mut() = Some(on_popstate));

    let navigate_fn = Closure::<dyn Fn(String)>::wrap(Box::new(|path: String| super::navigate(&path)));
    js_sys::Reflect::set(
        &window,
        &JsValue::from_str(&instance.config().global_navigate_fn),
        navigate_fn.as_ref(),
    )
    .map_err(js_err)?;
    NAVIGATE_FN.with(|slot| *slot.borrow_mut() = Some(navigate_fn));
    Ok(())
}

fn intercept_link_click(event: Event) {
    if event.default_prevented() {
        return;
    }
    let Some(router) = router() else {
        return;
    };
    let Some(anchor) = enclosing_anchor(&event) else {
        return;
    };

    let modified_click = event.dyn_ref::<MouseEvent>().is_some_and(|click| {
        click.button() != 0 || click.meta_key() || click.ctrl_key() || click.shift_key() || click.alt_key()
    });
    let link = LinkInfo {
        href: anchor.get_attribute("href"),
        target: anchor.get_attribute("target"),
        has_download: anchor.has_attribute("download"),
        has_opt_out: anchor.has_attribute(&router.config().opt_out_attribute),
        modified_click,
    };
    let Some(base) = router.host().base_url() else {
        return;
    };

    match classify(&link, &base) {
        LinkScope::Intercept { path } => {
            event.prevent_default();
            spawn_navigation(router, path);
        }
        LinkScope::Passthrough(reason) => {
            debug!(href = ?link.href, ?reason, "link left to the browser");
        }
    }
}

fn enclosing_anchor(event: &Event) -> Option<Element> {
    let target = event.target()?;
    let element = match target.dyn_into::<Element>() {
        Ok(element) => element,
        // Text node targets: start from their parent element.
        Err(target) => target.dyn_into::<Node>().ok()?.parent_element()?,
    };
    element.closest("a").ok().flatten()
}
