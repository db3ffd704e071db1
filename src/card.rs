//! Project cards: how they are found in the page and which style values
//! express each visual state.

use crate::config::InteractivityConfig;

const PRESSED_TRANSFORM: &str = "scale(0.98)";
const HOVER_SHADOW: &str = "0 20px 40px rgba(99, 102, 241, 0.15)";

/// The slice of an element the page behavior needs.
pub trait PageNode: Clone + 'static {
    /// Parent element, if any.
    fn enclosing(&self) -> Option<Self>;
    fn matches_selector(&self, selector: &str) -> bool;
    /// Value of `data-{name}`.
    fn data_attribute(&self, name: &str) -> Option<String>;
    /// Writes an inline style property by its CSS name.
    fn set_style(&self, property: &str, value: &str);
}

/// Entrance state of a card. Cards only ever move from `Hidden` to `Visible`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

impl Visibility {
    fn opacity(self) -> &'static str {
        match self {
            Self::Hidden => "0",
            Self::Visible => "1",
        }
    }

    fn transform(self) -> &'static str {
        match self {
            Self::Hidden => "translateY(20px)",
            Self::Visible => "translateY(0)",
        }
    }

    pub fn apply<N: PageNode>(self, card: &N) {
        card.set_style("opacity", self.opacity());
        card.set_style("transform", self.transform());
    }
}

/// Nearest element at or above `target` matching the card selector.
pub fn nearest_card<N: PageNode>(target: N, card_selector: &str) -> Option<N> {
    std::iter::successors(Some(target), PageNode::enclosing)
        .find(|node| node.matches_selector(card_selector))
}

pub fn navigation_url<N: PageNode>(card: &N, url_attribute: &str) -> Option<String> {
    card.data_attribute(url_attribute)
        .filter(|url| !url.is_empty())
}

pub fn press<N: PageNode>(card: &N) {
    card.set_style("transform", PRESSED_TRANSFORM);
}

pub fn release<N: PageNode>(card: &N) {
    card.set_style("transform", "");
}

pub fn raise<N: PageNode>(card: &N) {
    card.set_style("box-shadow", HOVER_SHADOW);
}

pub fn lower<N: PageNode>(card: &N) {
    card.set_style("box-shadow", "");
}

/// Transition for the card at `index`, staggered by its position.
pub fn entrance_transition(index: usize, config: &InteractivityConfig) -> String {
    let offset = config
        .reveal_stagger_ms
        .saturating_mul(u64::try_from(index).unwrap_or(u64::MAX));
    let delay = css_seconds(offset);
    let duration = css_seconds(config.reveal_duration_ms);

    format!("opacity {duration} ease {delay}, transform {duration} ease {delay}")
}

fn css_seconds(milliseconds: u64) -> String {
    let whole = milliseconds / 1_000;
    let fraction = milliseconds % 1_000;

    if fraction == 0 {
        format!("{whole}s")
    } else {
        let digits = format!("{fraction:03}");
        format!("{whole}.{}s", digits.trim_end_matches('0'))
    }
}
