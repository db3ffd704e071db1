//! In-memory stand-ins for the browser seams.

use crate::{
    card::PageNode,
    debounce::Scheduler,
    interactivity::{Opener, VisibilityTracker},
    log::{EventLog, LogLevel, UrlLogMode},
};
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

#[derive(Clone)]
pub struct TestNode(Rc<NodeData>);

struct NodeData {
    classes: Vec<String>,
    parent: Option<TestNode>,
    data: HashMap<String, String>,
    styles: RefCell<HashMap<String, String>>,
}

impl TestNode {
    pub fn element(parent: Option<&TestNode>, classes: &[&str], data: &[(&str, &str)]) -> Self {
        Self(Rc::new(NodeData {
            classes: classes.iter().map(ToString::to_string).collect(),
            parent: parent.cloned(),
            data: data
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            styles: RefCell::new(HashMap::new()),
        }))
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.styles.borrow().get(property).cloned()
    }

    pub fn has_styles(&self) -> bool {
        !self.0.styles.borrow().is_empty()
    }

    pub fn same(&self, other: &TestNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PageNode for TestNode {
    fn enclosing(&self) -> Option<Self> {
        self.0.parent.clone()
    }

    fn matches_selector(&self, selector: &str) -> bool {
        selector
            .strip_prefix('.')
            .is_some_and(|class| self.0.classes.iter().any(|candidate| candidate == class))
    }

    fn data_attribute(&self, name: &str) -> Option<String> {
        self.0.data.get(name).cloned()
    }

    fn set_style(&self, property: &str, value: &str) {
        self.0
            .styles
            .borrow_mut()
            .insert(property.to_string(), value.to_string());
    }
}

/// Scheduler driven by an explicit clock.
#[derive(Clone, Default)]
pub struct ManualScheduler(Rc<Timeline>);

#[derive(Default)]
struct Timeline {
    now: Cell<u64>,
    next_id: Cell<u64>,
    queue: RefCell<Vec<QueuedTask>>,
}

struct QueuedTask {
    id: u64,
    due: u64,
    task: Box<dyn FnOnce()>,
}

pub struct ManualTimer {
    id: u64,
    timeline: Rc<Timeline>,
    armed: bool,
}

impl Drop for ManualTimer {
    fn drop(&mut self) {
        if self.armed {
            self.timeline.queue.borrow_mut().retain(|queued| queued.id != self.id);
        }
    }
}

impl ManualScheduler {
    pub fn now(&self) -> u64 {
        self.0.now.get()
    }

    pub fn pending(&self) -> usize {
        self.0.queue.borrow().len()
    }

    /// Moves the clock forward, running due tasks in order.
    pub fn advance(&self, milliseconds: u64) {
        let target = self.0.now.get() + milliseconds;

        loop {
            let next = {
                let mut queue = self.0.queue.borrow_mut();
                let Some(position) = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, queued)| queued.due <= target)
                    .min_by_key(|(_, queued)| (queued.due, queued.id))
                    .map(|(position, _)| position)
                else {
                    break;
                };
                queue.remove(position)
            };

            self.0.now.set(next.due);
            (next.task)();
        }

        self.0.now.set(target);
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualTimer;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> ManualTimer {
        let id = self.0.next_id.get();
        self.0.next_id.set(id + 1);
        self.0.queue.borrow_mut().push(QueuedTask {
            id,
            due: self.0.now.get() + u64::from(delay_ms),
            task,
        });

        ManualTimer {
            id,
            timeline: Rc::clone(&self.0),
            armed: true,
        }
    }

    fn detach(&self, mut handle: ManualTimer) {
        handle.armed = false;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OpenCall {
    pub url: String,
    pub target: String,
    pub features: String,
    pub at: u64,
}

/// Records every open request along with the scheduler time it happened at.
#[derive(Clone)]
pub struct RecordingOpener {
    clock: ManualScheduler,
    calls: Rc<RefCell<Vec<OpenCall>>>,
}

impl RecordingOpener {
    pub fn new(clock: &ManualScheduler) -> Self {
        Self {
            clock: clock.clone(),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<OpenCall> {
        self.calls.borrow().clone()
    }
}

impl Opener for RecordingOpener {
    fn open(&self, url: &str, target: &str, features: &str) {
        self.calls.borrow_mut().push(OpenCall {
            url: url.to_string(),
            target: target.to_string(),
            features: features.to_string(),
            at: self.clock.now(),
        });
    }
}

#[derive(Default)]
pub struct RecordingTracker {
    pub observed: RefCell<Vec<TestNode>>,
    pub unobserved: RefCell<Vec<TestNode>>,
}

impl VisibilityTracker<TestNode> for RecordingTracker {
    fn observe(&self, card: &TestNode) {
        self.observed.borrow_mut().push(card.clone());
    }

    fn unobserve(&self, card: &TestNode) {
        self.unobserved.borrow_mut().push(card.clone());
    }
}

pub fn capturing_log(min_level: LogLevel) -> (EventLog, Rc<RefCell<Vec<String>>>) {
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lines);
    let log = EventLog::new(min_level, UrlLogMode::Host, move |line| {
        sink.borrow_mut().push(line.to_string());
    });
    (log, lines)
}
