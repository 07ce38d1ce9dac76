//! Per-widget lifecycle: every mounted widget is torn down before the next page's
//! widgets are initialized, so repeated navigations never stack listeners.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::WidgetError;

pub trait Widget {
    fn name(&self) -> &str;
    fn init(&mut self, path: &str) -> Result<(), WidgetError>;
    fn teardown(&mut self);
}

struct Entry {
    pages: BTreeSet<String>,
    widget: Box<dyn Widget>,
    mounted: bool,
}

#[derive(Default)]
pub struct WidgetRegistry {
    entries: Vec<Entry>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `widget` for `pages`. If one of them is on screen now, it is
    /// mounted right away.
    pub fn register(
        &mut self,
        widget: Box<dyn Widget>,
        pages: impl IntoIterator<Item = String>,
        current_path: &str,
    ) {
        let mut entry = Entry { pages: pages.into_iter().collect(), widget, mounted: false };
        debug!(widget = %entry.widget.name(), pages = ?entry.pages, "widget registered");
        if entry.pages.contains(current_path) {
            mount(&mut entry, current_path);
        }
        self.entries.push(entry);
    }

    /// Tear everything down, then initialize the widgets that apply to `path`.
    pub fn remount(&mut self, path: &str) {
        for entry in self.entries.iter_mut().filter(|e| e.mounted) {
            entry.widget.teardown();
            entry.mounted = false;
        }
        for entry in self.entries.iter_mut().filter(|e| e.pages.contains(path)) {
            mount(entry, path);
        }
    }

    pub fn mounted(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter(|e| e.mounted).map(|e| e.widget.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn mount(entry: &mut Entry, path: &str) {
    match entry.widget.init(path) {
        Ok(()) => entry.mounted = true,
        Err(err) => warn!(%path, error = %err, "widget init failed; left unmounted"),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl Widget for Probe {
        fn name(&self) -> &str {
            self.name
        }
        fn init(&mut self, path: &str) -> Result<(), WidgetError> {
            self.log.borrow_mut().push(format!("init {} {}", self.name, path));
            if self.fail {
                return Err(WidgetError { name: self.name.into(), message: "no canvas".into() });
            }
            Ok(())
        }
        fn teardown(&mut self) {
            self.log.borrow_mut().push(format!("teardown {}", self.name));
        }
    }

    fn probe(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn Widget> {
        Box::new(Probe { name, log: log.clone(), fail: false })
    }

    #[test]
    fn teardown_precedes_init_on_repeat_navigation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = WidgetRegistry::new();
        reg.register(probe("typing", &log), ["/games".to_string()], "/");
        assert!(log.borrow().is_empty());

        reg.remount("/games");
        reg.remount("/games");
        reg.remount("/about");
        assert_eq!(
            *log.borrow(),
            vec!["init typing /games", "teardown typing", "init typing /games", "teardown typing"]
        );
        assert_eq!(reg.mounted().count(), 0);
    }

    #[test]
    fn registering_on_current_page_mounts_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = WidgetRegistry::new();
        reg.register(probe("cafe", &log), ["/cat-cafe".to_string()], "/cat-cafe");
        assert_eq!(reg.mounted().collect::<Vec<_>>(), vec!["cafe"]);
    }

    #[test]
    fn failed_init_stays_unmounted() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut reg = WidgetRegistry::new();
        reg.register(
            Box::new(Probe { name: "nn", log: log.clone(), fail: true }),
            ["/games".to_string()],
            "/",
        );
        reg.remount("/games");
        reg.remount("/");
        assert_eq!(*log.borrow(), vec!["init nn /games"]);
    }
}
