use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, ready};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CustomEvent, CustomEventInit, Element, HtmlScriptElement, ScrollBehavior, ScrollToOptions,
};

use super::{BrowserHost, js_message, page_hook};
use crate::error::{NavError, ScriptError};
use crate::lifecycle::LifecycleHost;
use crate::reconcile::Dom;
use crate::router::HistoryHost;
use crate::scripts::ScriptHost;

fn dom_error(err: JsValue) -> NavError {
    NavError::Dom(js_message(&err))
}

impl Dom for BrowserHost {
    fn has_content_container(&self) -> bool {
        self.content_container().is_some()
    }

    fn has_modal_container(&self) -> bool {
        self.modal_container().is_some()
    }

    fn set_content_html(&self, html: &str) -> Result<(), NavError> {
        let container = self.content_container().ok_or_else(|| NavError::LiveContainerMissing {
            container: self.config.content_container_id.clone(),
        })?;
        container.set_inner_html(html);
        Ok(())
    }

    fn set_modal_html(&self, html: &str) -> Result<(), NavError> {
        let container = self.modal_container().ok_or_else(|| NavError::LiveContainerMissing {
            container: self.config.modal_container_id.clone(),
        })?;
        container.set_inner_html(html);
        Ok(())
    }

    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn set_page_kind(&self, kind: Option<&str>) -> Result<(), NavError> {
        let body = self.document.body().ok_or_else(|| NavError::Dom("document has no body".into()))?;
        let attribute = &self.config.page_kind_attribute;
        match kind {
            Some(kind) => body.set_attribute(attribute, kind).map_err(dom_error),
            None => body.remove_attribute(attribute).map_err(dom_error),
        }
    }

    fn update_nav_links(&self, is_active: &dyn Fn(Option<&str>) -> bool) {
        let Ok(links) = self.document.query_selector_all(&self.config.nav_link_selector) else {
            warn!(selector = %self.config.nav_link_selector, "invalid nav link selector");
            return;
        };
        for index in 0..links.length() {
            let Some(link) = links.item(index).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let href = link.get_attribute("href");
            let active = is_active(href.as_deref());
            if let Err(err) = link.class_list().toggle_with_force(&self.config.active_class, active) {
                warn!(href = ?href, error = %js_message(&err), "nav link class update failed");
            }
        }
    }

    fn scroll_to_top(&self) {
        let options = ScrollToOptions::new();
        options.set_left(0.0);
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Instant);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

impl ScriptHost for BrowserHost {
    fn has_script(&self, src: &str) -> bool {
        self.script_executed(src)
    }

    fn inject_script(&self, src: &str) -> LocalBoxFuture<'static, Result<(), ScriptError>> {
        let inject_error = |err: JsValue| ScriptError::Inject {
            src: src.to_string(),
            message: js_message(&err),
        };
        let script: HtmlScriptElement = match self.document.create_element("script") {
            Ok(el) => el.unchecked_into(),
            Err(err) => return ready(Err(inject_error(err))).boxed_local(),
        };
        script.set_src(src);
        let loaded = js_sys::Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });

        let Some(body) = self.document.body() else {
            return ready(Err(ScriptError::Inject {
                src: src.to_string(),
                message: "document has no body".to_string(),
            }))
            .boxed_local();
        };
        if let Err(err) = body.append_child(&script) {
            return ready(Err(inject_error(err))).boxed_local();
        }
        // A failed load still leaves the element in place; never append it twice.
        self.mark_script_executed(src);

        let src = src.to_string();
        async move {
            JsFuture::from(loaded)
                .await
                .map(|_| ())
                .map_err(|_| ScriptError::LoadFailed { src })
        }
        .boxed_local()
    }
}

impl LifecycleHost for BrowserHost {
    fn invoke_hook(&self, name: &str) -> bool {
        let hook = page_hook(name).or_else(|| {
            js_sys::Reflect::get(&self.window, &JsValue::from_str(name))
                .ok()
                .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
        });
        let Some(hook) = hook else {
            return false;
        };
        if let Err(err) = hook.call0(&JsValue::NULL) {
            warn!(hook = %name, error = %js_message(&err), "page hook threw");
        }
        true
    }

    fn dispatch_lifecycle(&self, event: &str, path: &str) -> Result<(), NavError> {
        let detail = js_sys::Object::new();
        js_sys::Reflect::set(&detail, &JsValue::from_str("path"), &JsValue::from_str(path))
            .map_err(dom_error)?;
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        let event = CustomEvent::new_with_event_init_dict(event, &init).map_err(dom_error)?;
        self.document.dispatch_event(&event).map_err(dom_error)?;
        Ok(())
    }
}

impl HistoryHost for BrowserHost {
    fn push_history(&self, path: &str) {
        let state = js_sys::Object::new();
        if let Err(err) = js_sys::Reflect::set(&state, &JsValue::from_str("path"), &JsValue::from_str(path)) {
            warn!(%path, error = %js_message(&err), "history state not populated");
        }
        let pushed = self
            .window
            .history()
            .and_then(|history| history.push_state_with_url(&state, "", Some(path)));
        if let Err(err) = pushed {
            warn!(%path, error = %js_message(&err), "history push failed");
        }
    }

    fn hard_navigate(&self, path: &str) {
        if let Err(err) = self.window.location().set_href(path) {
            warn!(%path, error = %js_message(&err), "full navigation failed");
        }
    }
}
