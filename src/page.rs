//! Parsed replacement page.

use crate::error::NavError;

/// External script reference declared by a fetched page (`<script src>`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScriptRef {
    pub src: String,
}

impl ScriptRef {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

/// Everything the reconciler and script loader need from one fetched page.
/// Created per navigation and consumed by it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDocument {
    pub content_html: String,
    pub modal_html: Option<String>,
    pub title: Option<String>,
    pub page_kind: Option<String>,
    pub scripts: Vec<ScriptRef>,
}

impl PageDocument {
    pub fn new(content_html: impl Into<String>) -> Self {
        Self {
            content_html: content_html.into(),
            modal_html: None,
            title: None,
            page_kind: None,
            scripts: Vec::new(),
        }
    }

    /// Build from extracted parts. A page without the content fragment is a
    /// server/template defect and is rejected.
    pub fn from_parts(
        path: &str,
        container: &str,
        content_html: Option<String>,
        modal_html: Option<String>,
        title: Option<String>,
        page_kind: Option<String>,
        script_srcs: impl IntoIterator<Item = String>,
    ) -> Result<Self, NavError> {
        let content_html = content_html.ok_or_else(|| NavError::MissingContent {
            path: path.to_string(),
            container: container.to_string(),
        })?;
        Ok(Self {
            content_html,
            modal_html,
            title,
            page_kind: page_kind.filter(|k| !k.is_empty()),
            scripts: script_srcs
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(ScriptRef::new)
                .collect(),
        })
    }

    pub fn with_modal(mut self, html: impl Into<String>) -> Self {
        self.modal_html = Some(html.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_page_kind(mut self, kind: impl Into<String>) -> Self {
        self.page_kind = Some(kind.into());
        self
    }

    pub fn with_script(mut self, src: impl Into<String>) -> Self {
        self.scripts.push(ScriptRef::new(src));
        self
    }
}

/// Out-of-band retrieval of a page by path.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    async fn fetch_page(&self, path: &str) -> Result<PageDocument, NavError>;
}
