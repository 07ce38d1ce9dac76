//! Navigation state owned by the router.
//!
//! `current_path` only ever names the page that is actually on screen. Each load
//! attempt is tagged with a [`NavToken`]; a token that is no longer the latest one
//! issued belongs to a superseded navigation and must not touch the DOM or commit.

/// Sequence number of one navigation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavToken(u64);

impl NavToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Whether a completed navigation adds a browser history entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryMode {
    /// User-initiated: push a new entry on commit.
    Push,
    /// Back/forward: the browser already moved, never push.
    Replay,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingNavigation {
    pub token: NavToken,
    pub path: String,
    pub mode: HistoryMode,
}

#[derive(Debug)]
pub struct NavigationState {
    current_path: String,
    issued: u64,
    pending: Option<PendingNavigation>,
    /// The DOM holds content from an attempt that has not committed (yet).
    uncommitted_swap: bool,
}

impl NavigationState {
    pub fn new(initial_path: impl Into<String>) -> Self {
        let initial_path = initial_path.into();
        Self {
            current_path: if initial_path.is_empty() { "/".to_string() } else { initial_path },
            issued: 0,
            pending: None,
            uncommitted_swap: false,
        }
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }

    /// Issue a fresh token for a load of `path`; any earlier attempt becomes stale.
    pub fn begin(&mut self, path: &str, mode: HistoryMode) -> NavToken {
        self.issued += 1;
        let token = NavToken(self.issued);
        self.pending = Some(PendingNavigation { token, path: path.to_string(), mode });
        token
    }

    /// True when `path` is what the user currently sees. Content swapped in by
    /// an attempt that never committed hides `current_path`.
    pub fn displays(&self, path: &str) -> bool {
        self.current_path == path && !self.uncommitted_swap
    }

    pub fn mark_swapped(&mut self, token: NavToken) {
        if self.is_latest(token) {
            self.uncommitted_swap = true;
        }
    }

    pub fn is_latest(&self, token: NavToken) -> bool {
        token.0 == self.issued
    }

    /// Invalidate whatever is in flight without starting a new load.
    pub fn supersede(&mut self) {
        self.issued += 1;
        self.pending = None;
    }

    /// Record `path` as displayed. Returns false (and changes nothing) for a stale token.
    pub fn commit(&mut self, token: NavToken, path: &str) -> bool {
        if !self.is_latest(token) {
            return false;
        }
        self.current_path = path.to_string();
        self.pending = None;
        self.uncommitted_swap = false;
        true
    }

    /// Drop the pending record of a failed attempt, if it is still the pending one.
    pub fn abandon(&mut self, token: NavToken) {
        if self.pending.as_ref().is_some_and(|p| p.token == token) {
            self.pending = None;
        }
    }
}
