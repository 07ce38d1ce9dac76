//! Click classification: which anchors the router handles and which it leaves to
//! the browser.

use url::Url;

/// What the interceptor knows about a clicked anchor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkInfo {
    pub href: Option<String>,
    pub target: Option<String>,
    pub has_download: bool,
    pub has_opt_out: bool,
    /// Non-primary button or a modifier key (meta/ctrl/shift/alt) was held.
    pub modified_click: bool,
}

impl LinkInfo {
    pub fn href(href: &str) -> Self {
        Self { href: Some(href.to_string()), ..Self::default() }
    }
}

/// Why a click falls through to native browser navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassReason {
    ModifiedClick,
    NoHref,
    External,
    Fragment,
    Scheme,
    Download,
    OptOut,
    NewContext,
    CrossOrigin,
    Unresolvable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkScope {
    /// Handled by the router; `path` is path + query, fragment dropped.
    Intercept { path: String },
    Passthrough(PassReason),
}

impl LinkScope {
    pub fn is_intercepted(&self) -> bool {
        matches!(self, LinkScope::Intercept { .. })
    }
}

/// Classify a clicked anchor relative to the document URL `base`.
pub fn classify(link: &LinkInfo, base: &Url) -> LinkScope {
    use PassReason::*;

    if link.modified_click {
        return LinkScope::Passthrough(ModifiedClick);
    }
    let href = match link.href.as_deref().map(str::trim) {
        Some(h) if !h.is_empty() => h,
        _ => return LinkScope::Passthrough(NoHref),
    };
    if href.starts_with("http://") || href.starts_with("https://") {
        return LinkScope::Passthrough(External);
    }
    if href.starts_with('#') {
        return LinkScope::Passthrough(Fragment);
    }
    if href.starts_with("mailto:") || href.starts_with("tel:") {
        return LinkScope::Passthrough(Scheme);
    }
    if link.has_download {
        return LinkScope::Passthrough(Download);
    }
    if link.has_opt_out {
        return LinkScope::Passthrough(OptOut);
    }
    if let Some(target) = link.target.as_deref() {
        if !target.is_empty() && !target.eq_ignore_ascii_case("_self") {
            return LinkScope::Passthrough(NewContext);
        }
    }

    let Ok(resolved) = base.join(href) else {
        return LinkScope::Passthrough(Unresolvable);
    };
    if resolved.origin() != base.origin() {
        return LinkScope::Passthrough(CrossOrigin);
    }

    let mut path = resolved.path().to_string();
    if let Some(query) = resolved.query() {
        path.push('?');
        path.push_str(query);
    }
    LinkScope::Intercept { path }
}
