// In-memory host used by the native router tests: a fake DOM, history and
// script registry, plus fetches that can be answered immediately or held open.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use spa_router::lifecycle::LifecycleHost;
use spa_router::reconcile::Dom;
use spa_router::scripts::ScriptHost;
use spa_router::{HistoryHost, NavError, PageDocument, PageFetcher, ScriptError};

type FetchResult = Result<PageDocument, NavError>;

pub struct FakeHost {
    pages: RefCell<HashMap<String, FetchResult>>,
    held: RefCell<HashMap<String, oneshot::Receiver<FetchResult>>>,
    held_scripts: RefCell<HashMap<String, oneshot::Receiver<Result<(), ScriptError>>>>,
    pub fetches: RefCell<Vec<String>>,

    pub content: RefCell<Option<String>>,
    pub modal: RefCell<Option<String>>,
    pub title: RefCell<String>,
    pub page_kind: RefCell<Option<String>>,
    pub nav_links: RefCell<Vec<(String, bool)>>,
    pub scroll: Cell<(f64, f64)>,

    pub scripts: RefCell<Vec<String>>,
    pub broken_scripts: RefCell<HashSet<String>>,
    pub hooks: RefCell<HashSet<String>>,

    pub history: RefCell<Vec<String>>,
    pub hard_navigations: RefCell<Vec<String>>,
    /// Ordered record of script settlements, hook calls and dispatches.
    pub timeline: Rc<RefCell<Vec<String>>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            pages: RefCell::new(HashMap::new()),
            held: RefCell::new(HashMap::new()),
            held_scripts: RefCell::new(HashMap::new()),
            fetches: RefCell::new(Vec::new()),
            content: RefCell::new(Some("<h1>Home</h1>".to_string())),
            modal: RefCell::new(Some(String::new())),
            title: RefCell::new("Home".to_string()),
            page_kind: RefCell::new(Some("home".to_string())),
            nav_links: RefCell::new(
                ["/", "/about", "/games", "/cat-cafe"]
                    .iter()
                    .map(|href| (href.to_string(), *href == "/"))
                    .collect(),
            ),
            scroll: Cell::new((0.0, 0.0)),
            scripts: RefCell::new(vec!["/static/js/spa-router.js".to_string()]),
            broken_scripts: RefCell::new(HashSet::new()),
            hooks: RefCell::new(HashSet::new()),
            history: RefCell::new(Vec::new()),
            hard_navigations: RefCell::new(Vec::new()),
            timeline: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn serve(&self, path: &str, page: PageDocument) {
        self.pages.borrow_mut().insert(path.to_string(), Ok(page));
    }

    pub fn fail(&self, path: &str, err: NavError) {
        self.pages.borrow_mut().insert(path.to_string(), Err(err));
    }

    /// The next fetch of `path` waits until the returned sender is used.
    pub fn hold(&self, path: &str) -> oneshot::Sender<FetchResult> {
        let (tx, rx) = oneshot::channel();
        self.held.borrow_mut().insert(path.to_string(), rx);
        tx
    }

    /// The next injection of `src` stays loading until the returned sender is used.
    pub fn hold_script(&self, src: &str) -> oneshot::Sender<Result<(), ScriptError>> {
        let (tx, rx) = oneshot::channel();
        self.held_scripts.borrow_mut().insert(src.to_string(), rx);
        tx
    }

    pub fn content(&self) -> String {
        self.content.borrow().clone().unwrap_or_default()
    }

    pub fn modal(&self) -> String {
        self.modal.borrow().clone().unwrap_or_default()
    }

    pub fn script_count(&self, src: &str) -> usize {
        self.scripts.borrow().iter().filter(|s| *s == src).count()
    }

    pub fn active_links(&self) -> Vec<String> {
        self.nav_links
            .borrow()
            .iter()
            .filter(|(_, active)| *active)
            .map(|(href, _)| href.clone())
            .collect()
    }
}

impl PageFetcher for FakeHost {
    async fn fetch_page(&self, path: &str) -> Result<PageDocument, NavError> {
        self.fetches.borrow_mut().push(path.to_string());
        let held = self.held.borrow_mut().remove(path);
        if let Some(rx) = held {
            return rx.await.unwrap_or_else(|_| {
                Err(NavError::Network { path: path.to_string(), message: "dropped".into() })
            });
        }
        self.pages
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or_else(|| Err(NavError::Status { path: path.to_string(), status: 404 }))
    }
}

impl Dom for FakeHost {
    fn has_content_container(&self) -> bool {
        self.content.borrow().is_some()
    }

    fn has_modal_container(&self) -> bool {
        self.modal.borrow().is_some()
    }

    fn set_content_html(&self, html: &str) -> Result<(), NavError> {
        *self.content.borrow_mut() = Some(html.to_string());
        Ok(())
    }

    fn set_modal_html(&self, html: &str) -> Result<(), NavError> {
        *self.modal.borrow_mut() = Some(html.to_string());
        Ok(())
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn set_page_kind(&self, kind: Option<&str>) -> Result<(), NavError> {
        *self.page_kind.borrow_mut() = kind.map(String::from);
        Ok(())
    }

    fn update_nav_links(&self, is_active: &dyn Fn(Option<&str>) -> bool) {
        for (href, active) in self.nav_links.borrow_mut().iter_mut() {
            *active = is_active(Some(href.as_str()));
        }
    }

    fn scroll_to_top(&self) {
        self.scroll.set((0.0, 0.0));
    }
}

impl ScriptHost for FakeHost {
    fn has_script(&self, src: &str) -> bool {
        self.scripts.borrow().iter().any(|s| s == src)
    }

    fn inject_script(&self, src: &str) -> LocalBoxFuture<'static, Result<(), ScriptError>> {
        self.scripts.borrow_mut().push(src.to_string());
        let broken = self.broken_scripts.borrow().contains(src);
        let held = self.held_scripts.borrow_mut().remove(src);
        let timeline = self.timeline.clone();
        let src = src.to_string();
        async move {
            let result = match held {
                Some(rx) => rx.await.unwrap_or_else(|_| Err(ScriptError::LoadFailed { src: src.clone() })),
                None if broken => Err(ScriptError::LoadFailed { src: src.clone() }),
                None => Ok(()),
            };
            timeline.borrow_mut().push(format!("settled {src}"));
            result
        }
        .boxed_local()
    }
}

impl LifecycleHost for FakeHost {
    fn invoke_hook(&self, name: &str) -> bool {
        if !self.hooks.borrow().contains(name) {
            return false;
        }
        self.timeline.borrow_mut().push(format!("hook {name}"));
        true
    }

    fn dispatch_lifecycle(&self, event: &str, path: &str) -> Result<(), NavError> {
        self.timeline.borrow_mut().push(format!("{event} {path}"));
        Ok(())
    }
}

impl HistoryHost for FakeHost {
    fn push_history(&self, path: &str) {
        self.history.borrow_mut().push(path.to_string());
    }

    fn hard_navigate(&self, path: &str) {
        self.hard_navigations.borrow_mut().push(path.to_string());
    }
}
