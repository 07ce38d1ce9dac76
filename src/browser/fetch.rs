use gloo_net::http::Request;
use wasm_bindgen::JsCast;
use web_sys::{DomParser, Element, SupportedType};

use super::{BrowserHost, js_message};
use crate::config::RouterConfig;
use crate::error::NavError;
use crate::page::{PageDocument, PageFetcher};

impl PageFetcher for BrowserHost {
    async fn fetch_page(&self, path: &str) -> Result<PageDocument, NavError> {
        let mut request = Request::get(path);
        for (name, value) in &self.config.request_headers {
            request = request.header(name, value);
        }
        let network = |err: gloo_net::Error| NavError::Network {
            path: path.to_string(),
            message: err.to_string(),
        };

        let response = request.send().await.map_err(network)?;
        if !response.ok() {
            return Err(NavError::Status { path: path.to_string(), status: response.status() });
        }
        let html = response.text().await.map_err(network)?;
        parse_page(path, &html, &self.config)
    }
}

/// Parse fetched HTML with the browser's `DOMParser` and pull out the parts the
/// router swaps in.
pub fn parse_page(path: &str, html: &str, config: &RouterConfig) -> Result<PageDocument, NavError> {
    let parse_error = |err: wasm_bindgen::JsValue| NavError::Parse {
        path: path.to_string(),
        message: js_message(&err),
    };
    let parser = DomParser::new().map_err(parse_error)?;
    let doc = parser
        .parse_from_string(html, SupportedType::TextHtml)
        .map_err(parse_error)?;

    let content = doc.get_element_by_id(&config.content_container_id).map(|el| el.inner_html());
    let modal = doc.get_element_by_id(&config.modal_container_id).map(|el| el.inner_html());
    let title = doc
        .query_selector("title")
        .ok()
        .flatten()
        .and_then(|el| el.text_content());
    let page_kind = doc.body().and_then(|body| body.get_attribute(&config.page_kind_attribute));

    let mut scripts = Vec::new();
    if let Ok(list) = doc.query_selector_all("script[src]") {
        for index in 0..list.length() {
            let src = list
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute("src"));
            if let Some(src) = src {
                scripts.push(src);
            }
        }
    }

    PageDocument::from_parts(
        path,
        &config.content_container_id,
        content,
        modal,
        title,
        page_kind,
        scripts,
    )
}
