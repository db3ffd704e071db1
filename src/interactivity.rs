use crate::{
    card::{self, PageNode, Visibility},
    config::InteractivityConfig,
    debounce::{Debouncer, Scheduler},
    log::{EventLog, LogLevel},
};
use serde_json::json;

pub const NEW_CONTEXT_TARGET: &str = "_blank";
pub const DETACHED_FEATURES: &str = "noopener,noreferrer";

/// Opens a URL in another browsing context.
pub trait Opener: Clone + 'static {
    fn open(&self, url: &str, target: &str, features: &str);
}

pub trait VisibilityTracker<N> {
    fn observe(&self, card: &N);
    fn unobserve(&self, card: &N);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hover {
    Enter,
    Leave,
}

/// What `initialize` set up. Hover feedback is always wired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wiring {
    pub tracked: usize,
    pub click_delegation: bool,
}

/// Card behavior for one page: delegated clicks, entrance reveal and hover.
pub struct PageInteractivity<N, S, O> {
    config: InteractivityConfig,
    log: EventLog,
    scheduler: S,
    opener: O,
    cards: Vec<N>,
}

impl<N: PageNode, S: Scheduler, O: Opener> PageInteractivity<N, S, O> {
    pub fn new(
        config: &InteractivityConfig,
        log: EventLog,
        scheduler: S,
        opener: O,
        cards: Vec<N>,
    ) -> Self {
        Self {
            config: config.clone(),
            log,
            scheduler,
            opener,
            cards,
        }
    }

    pub fn cards(&self) -> &[N] {
        &self.cards
    }

    /// Runs once the document is parsed. A missing grid only disables click
    /// delegation; reduced motion, when respected, disables entrance tracking.
    pub fn initialize<T: VisibilityTracker<N>>(
        &self,
        grid: Option<&N>,
        tracker: Option<&T>,
        prefers_reduced_motion: bool,
    ) -> Wiring {
        let skip_entrances = self.config.respect_reduced_motion && prefers_reduced_motion;
        let wiring = Wiring {
            tracked: self.track_entrances(tracker.filter(|_| !skip_entrances)),
            click_delegation: grid.is_some(),
        };

        self.log.emit(
            LogLevel::Debug,
            "interactivity_ready",
            json!({
                "cards": self.cards.len(),
                "tracked": wiring.tracked,
                "click_delegation": wiring.click_delegation,
            }),
        );
        wiring
    }

    /// Hides every card behind a staggered transition and starts tracking it.
    /// Without a tracker the cards are left untouched, so they stay visible.
    pub fn track_entrances<T: VisibilityTracker<N>>(&self, tracker: Option<&T>) -> usize {
        let Some(tracker) = tracker else {
            return 0;
        };

        for (index, card) in self.cards.iter().enumerate() {
            Visibility::Hidden.apply(card);
            card.set_style("transition", &card::entrance_transition(index, &self.config));
            tracker.observe(card);
        }

        self.cards.len()
    }

    pub fn handle_intersections<T: VisibilityTracker<N>>(
        &self,
        entries: impl IntoIterator<Item = (N, bool)>,
        tracker: &T,
    ) {
        for (card, intersecting) in entries {
            if !intersecting {
                continue;
            }

            Visibility::Visible.apply(&card);
            tracker.unobserve(&card);
        }
    }

    /// Returns whether the click schedules a navigation.
    pub fn handle_click(&self, target: N) -> bool {
        let Some(card) = card::nearest_card(target, &self.config.card_selector) else {
            return false;
        };
        let Some(url) = card::navigation_url(&card, &self.config.url_attribute) else {
            return false;
        };

        card::press(&card);
        self.log.emit(
            LogLevel::Debug,
            "card_activated",
            json!({
                "url": self.log.url_value(&url),
                "delay_ms": self.config.press_delay_ms,
            }),
        );

        let opener = self.opener.clone();
        let handle = self.scheduler.schedule(
            self.config.press_delay_ms,
            Box::new(move || {
                opener.open(&url, NEW_CONTEXT_TARGET, DETACHED_FEATURES);
                card::release(&card);
            }),
        );
        self.scheduler.detach(handle);
        true
    }

    pub fn handle_hover(&self, card: &N, hover: Hover) {
        match hover {
            Hover::Enter => card::raise(card),
            Hover::Leave => card::lower(card),
        }
    }
}

/// Debouncer that logs a diagnostic once resizing settles.
pub fn layout_debouncer<S: Scheduler>(
    config: &InteractivityConfig,
    log: EventLog,
    scheduler: S,
) -> Debouncer<S> {
    Debouncer::new(scheduler, config.resize_debounce_ms, move || {
        log.emit(
            LogLevel::Info,
            "layout_adjusted",
            json!({ "message": "Layout adjusted" }),
        );
    })
}

/// `<link rel="preload">` for the icon stylesheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreloadHint {
    href: String,
}

impl PreloadHint {
    pub fn from_config(config: &InteractivityConfig) -> Self {
        Self {
            href: config.preload_href.clone(),
        }
    }

    pub fn attributes(&self) -> [(&'static str, &str); 3] {
        [("rel", "preload"), ("href", &self.href), ("as", "style")]
    }
}
