//! Router configuration.
//!
//! Defaults match the markup the site's templates render (`#spa-content`,
//! `#spa-modals`, `data-page` on `<body>`, `data-no-spa` opt-out). Any subset of
//! fields can be overridden from JS with `start_router_with_config(json)`.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::error::RouterError;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    pub content_container_id: String,
    pub modal_container_id: String,
    /// Attribute on `<body>` naming the logical page type.
    pub page_kind_attribute: String,
    /// Anchors carrying this attribute are never intercepted.
    pub opt_out_attribute: String,
    pub nav_link_selector: String,
    pub active_class: String,
    /// Extra request headers marking the fetch as programmatic.
    pub request_headers: Vec<(String, String)>,
    /// Name of the `window` function other scripts call to navigate.
    pub global_navigate_fn: String,
    pub lifecycle: LifecycleConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            content_container_id: "spa-content".to_string(),
            modal_container_id: "spa-modals".to_string(),
            page_kind_attribute: "data-page".to_string(),
            opt_out_attribute: "data-no-spa".to_string(),
            nav_link_selector: "nav a".to_string(),
            active_class: "active".to_string(),
            request_headers: vec![
                ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
                ("X-SPA-Request".to_string(), "true".to_string()),
            ],
            global_navigate_fn: "spaNavigate".to_string(),
            lifecycle: LifecycleConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LifecycleConfig {
    /// Name of the `CustomEvent` dispatched on `document`.
    pub event_name: String,
    /// Script-driven pages whose widgets listen for the lifecycle event.
    pub interactive_pages: BTreeSet<String>,
    /// Path -> hook names invoked after a navigation to that path.
    pub page_hooks: BTreeMap<String, Vec<String>>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            event_name: "spa-page-loaded".to_string(),
            interactive_pages: ["/games", "/cat-cafe"]
                .into_iter()
                .map(String::from)
                .collect(),
            page_hooks: BTreeMap::from([("/".to_string(), vec!["initCarousel".to_string()])]),
        }
    }
}

impl RouterConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, RouterError> {
        let config: RouterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RouterError> {
        let required = [
            ("contentContainerId", &self.content_container_id),
            ("modalContainerId", &self.modal_container_id),
            ("pageKindAttribute", &self.page_kind_attribute),
            ("optOutAttribute", &self.opt_out_attribute),
            ("activeClass", &self.active_class),
            ("globalNavigateFn", &self.global_navigate_fn),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(RouterError::Config(format!("{field} must not be empty")));
            }
        }
        if self.lifecycle.event_name.trim().is_empty() {
            return Err(RouterError::Config("lifecycle.eventName must not be empty".to_string()));
        }
        if self.content_container_id == self.modal_container_id {
            return Err(RouterError::Config(
                "content and modal containers must differ".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site_markup() {
        let cfg = RouterConfig::default();
        assert_eq!(cfg.content_container_id, "spa-content");
        assert_eq!(cfg.modal_container_id, "spa-modals");
        assert!(cfg.lifecycle.interactive_pages.contains("/games"));
        assert!(cfg.lifecycle.interactive_pages.contains("/cat-cafe"));
        assert_eq!(cfg.lifecycle.page_hooks["/"], vec!["initCarousel".to_string()]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = RouterConfig::from_json(
            r#"{"activeClass":"is-current","lifecycle":{"interactivePages":["/lab"]}}"#,
        )
        .unwrap();
        assert_eq!(cfg.active_class, "is-current");
        assert_eq!(cfg.content_container_id, "spa-content");
        assert_eq!(cfg.lifecycle.event_name, "spa-page-loaded");
        assert_eq!(cfg.lifecycle.interactive_pages.len(), 1);
        assert!(cfg.lifecycle.interactive_pages.contains("/lab"));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = RouterConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, RouterError::InvalidConfig(_)));
    }

    #[test]
    fn empty_container_id_is_rejected() {
        let err = RouterConfig::from_json(r#"{"contentContainerId":"  "}"#).unwrap_err();
        assert!(err.to_string().contains("contentContainerId"));
    }

    #[test]
    fn identical_containers_are_rejected() {
        let err = RouterConfig::from_json(r#"{"modalContainerId":"spa-content"}"#).unwrap_err();
        assert!(matches!(err, RouterError::Config(_)));
    }
}
