use crate::{
    card::PageNode,
    config::{InteractivityConfig, CONFIG_ATTRIBUTE},
    debounce::Scheduler,
    interactivity::{
        layout_debouncer, Hover, Opener, PageInteractivity, PreloadHint, VisibilityTracker,
    },
    log::EventLog,
};
use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo_timers::callback::Timeout;
use js_sys::{Array, Reflect};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Element, Event, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit,
};

type DomInteractivity = PageInteractivity<Element, TimerScheduler, WindowOpener>;

impl PageNode for Element {
    fn enclosing(&self) -> Option<Self> {
        self.parent_element()
    }

    fn matches_selector(&self, selector: &str) -> bool {
        self.matches(selector).unwrap_or(false)
    }

    fn data_attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(&format!("data-{name}"))
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Some(element) = self.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property(property, value);
        }
    }
}

#[derive(Clone, Copy)]
struct TimerScheduler;

impl Scheduler for TimerScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }

    fn detach(&self, handle: Timeout) {
        let _ = handle.forget();
    }
}

#[derive(Clone, Copy)]
struct WindowOpener;

impl Opener for WindowOpener {
    fn open(&self, url: &str, target: &str, features: &str) {
        if let Some(win) = window() {
            let _ = win.open_with_url_and_target_and_features(url, target, features);
        }
    }
}

struct ObserverTracker(IntersectionObserver);

impl VisibilityTracker<Element> for ObserverTracker {
    fn observe(&self, card: &Element) {
        self.0.observe(card);
    }

    fn unobserve(&self, card: &Element) {
        self.0.unobserve(card);
    }
}

fn passive() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: true,
    }
}

fn read_config(document: &Document) -> InteractivityConfig {
    let raw = document
        .document_element()
        .and_then(|root| root.get_attribute(CONFIG_ATTRIBUTE));
    InteractivityConfig::resolve(raw.as_deref())
}

fn inject_preload_hint(document: &Document, hint: &PreloadHint) {
    let Some(head) = document.head() else {
        return;
    };
    let Ok(link) = document.create_element("link") else {
        return;
    };

    for (name, value) in hint.attributes() {
        let _ = link.set_attribute(name, value);
    }
    let _ = head.append_child(&link);
}

fn watch_layout(config: &InteractivityConfig, log: EventLog) {
    let Some(win) = window() else {
        return;
    };

    let debouncer = layout_debouncer(config, log, TimerScheduler);
    EventListener::new_with_options(&win, "resize", passive(), move |_event: &Event| {
        debouncer.trigger();
    })
    .forget();
}

fn query_cards(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn supports_visibility_tracking() -> bool {
    let Some(win) = window() else {
        return false;
    };

    let window_js: JsValue = win.into();
    Reflect::has(&window_js, &JsValue::from_str("IntersectionObserver")).unwrap_or(false)
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn start_visibility_tracking(
    page: &Rc<DomInteractivity>,
    config: &InteractivityConfig,
) -> Option<ObserverTracker> {
    if !supports_visibility_tracking() {
        return None;
    }

    let page = Rc::clone(page);
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            let entries = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| (entry.target(), entry.is_intersecting()));
            page.handle_intersections(entries, &ObserverTracker(observer));
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    options.set_root_margin(&config.reveal_root_margin);

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options).ok()?;
    // The observer calls back for as long as the page lives.
    callback.forget();

    Some(ObserverTracker(observer))
}

fn attach_hover(page: &Rc<DomInteractivity>) {
    for card in page.cards() {
        for (event_type, hover) in [("mouseenter", Hover::Enter), ("mouseleave", Hover::Leave)] {
            let page = Rc::clone(page);
            let target = card.clone();
            EventListener::new_with_options(card, event_type, passive(), move |_event: &Event| {
                page.handle_hover(&target, hover);
            })
            .forget();
        }
    }
}

fn wire_cards(document: &Document, config: &InteractivityConfig, log: EventLog) {
    let cards = query_cards(document, &config.card_selector);
    let page = Rc::new(PageInteractivity::new(
        config,
        log,
        TimerScheduler,
        WindowOpener,
        cards,
    ));

    let grid = document.query_selector(&config.grid_selector).ok().flatten();
    let tracker = start_visibility_tracking(&page, config);
    let wiring = page.initialize(grid.as_ref(), tracker.as_ref(), prefers_reduced_motion());

    if let Some(grid) = grid.filter(|_| wiring.click_delegation) {
        let page = Rc::clone(&page);
        EventListener::new(&grid, "click", move |event: &Event| {
            let Some(target) = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
            else {
                return;
            };
            page.handle_click(target);
        })
        .forget();
    }

    attach_hover(&page);
}

pub fn run() {
    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };

    let config = read_config(&document);
    let log = EventLog::console(config.log_level, config.log_url_mode);

    inject_preload_hint(&document, &PreloadHint::from_config(&config));
    watch_layout(&config, log.clone());

    if document.ready_state() == "loading" {
        let ready_document = document.clone();
        EventListener::once(&document, "DOMContentLoaded", move |_event: &Event| {
            wire_cards(&ready_document, &config, log);
        })
        .forget();
    } else {
        wire_cards(&document, &config, log);
    }
}
