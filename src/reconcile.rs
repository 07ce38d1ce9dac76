//! Swapping a fetched page into the live document.

use crate::config::RouterConfig;
use crate::error::NavError;
use crate::page::PageDocument;

/// Mutations the reconciler performs on the live document.
pub trait Dom {
    fn has_content_container(&self) -> bool;
    fn has_modal_container(&self) -> bool;
    fn set_content_html(&self, html: &str) -> Result<(), NavError>;
    fn set_modal_html(&self, html: &str) -> Result<(), NavError>;
    fn set_title(&self, title: &str);
    /// Set (`Some`) or remove (`None`) the page-kind attribute.
    fn set_page_kind(&self, kind: Option<&str>) -> Result<(), NavError>;
    /// Toggle the active class on every nav link according to `is_active(href)`.
    fn update_nav_links(&self, is_active: &dyn Fn(Option<&str>) -> bool);
    /// Instant jump to (0, 0), no smooth scrolling.
    fn scroll_to_top(&self);
}

pub fn is_active_link(href: Option<&str>, path: &str) -> bool {
    href == Some(path)
}

/// Apply `page` to the live document. Synchronous, so no frame shows a mix of
/// old and new content.
pub fn reconcile<D: Dom + ?Sized>(
    dom: &D,
    page: &PageDocument,
    path: &str,
    config: &RouterConfig,
) -> Result<(), NavError> {
    if !dom.has_content_container() {
        return Err(NavError::LiveContainerMissing {
            container: config.content_container_id.clone(),
        });
    }
    dom.set_content_html(&page.content_html)?;

    if dom.has_modal_container() {
        dom.set_modal_html(page.modal_html.as_deref().unwrap_or(""))?;
    }
    if let Some(title) = page.title.as_deref() {
        dom.set_title(title);
    }
    dom.set_page_kind(page.page_kind.as_deref())?;
    dom.update_nav_links(&|href| is_active_link(href, path));
    dom.scroll_to_top();
    Ok(())
}
