//! Error types for navigation, script loading, widgets and router startup.

use std::fmt;

use thiserror::Error;

/// Pipeline stage a navigation failed in, used as log context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavStage {
    Fetch,
    Parse,
    Swap,
}

impl fmt::Display for NavStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NavStage::Fetch => "fetch",
            NavStage::Parse => "parse",
            NavStage::Swap => "swap",
        })
    }
}

/// Failure of a single navigation. Every variant triggers the full-page fallback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    #[error("request for {path} failed with HTTP status {status}")]
    Status { path: String, status: u16 },

    #[error("network failure while fetching {path}: {message}")]
    Network { path: String, message: String },

    #[error("response for {path} has no #{container} element")]
    MissingContent { path: String, container: String },

    #[error("failed to parse response for {path}: {message}")]
    Parse { path: String, message: String },

    #[error("live document has no #{container} element")]
    LiveContainerMissing { container: String },

    #[error("dom update failed: {0}")]
    Dom(String),
}

impl NavError {
    pub fn stage(&self) -> NavStage {
        match self {
            NavError::Status { .. } | NavError::Network { .. } => NavStage::Fetch,
            NavError::MissingContent { .. } | NavError::Parse { .. } => NavStage::Parse,
            NavError::LiveContainerMissing { .. } | NavError::Dom(_) => NavStage::Swap,
        }
    }
}

/// An external script that could not be injected or loaded. Never fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("failed to load script {src}")]
    LoadFailed { src: String },

    #[error("could not inject script {src}: {message}")]
    Inject { src: String, message: String },
}

impl ScriptError {
    pub fn src(&self) -> &str {
        match self {
            ScriptError::LoadFailed { src } | ScriptError::Inject { src, .. } => src,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("widget {name} failed to initialize: {message}")]
pub struct WidgetError {
    pub name: String,
    pub message: String,
}

/// Startup / configuration failures.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("content container #{id} not found; SPA navigation disabled")]
    MissingContainer { id: String },

    #[error("invalid router config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("router config rejected: {0}")]
    Config(String),

    #[error("no window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("router already started")]
    AlreadyStarted,

    #[error("javascript error: {0}")]
    Js(String),
}
