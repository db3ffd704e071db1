use crate::log::{LogLevel, UrlLogMode};
use serde::Deserialize;
use url::Url;

/// Attribute on the root element holding JSON overrides.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub const CONFIG_ATTRIBUTE: &str = "data-interactivity";

const DEFAULT_GRID_SELECTOR: &str = ".projects-grid";
const DEFAULT_CARD_SELECTOR: &str = ".project-card";
const DEFAULT_URL_ATTRIBUTE: &str = "url";
const DEFAULT_PRESS_DELAY_MS: u32 = 100;
const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 250;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
const DEFAULT_REVEAL_ROOT_MARGIN: &str = "0px 0px -20px 0px";
const DEFAULT_REVEAL_STAGGER_MS: u64 = 100;
const DEFAULT_REVEAL_DURATION_MS: u64 = 600;
const DEFAULT_PRELOAD_HREF: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css";
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const DEFAULT_LOG_URL_MODE: UrlLogMode = UrlLogMode::Host;

const PRESS_DELAY_MS_BOUNDS: (u32, u32) = (0, 2_000);
const RESIZE_DEBOUNCE_MS_BOUNDS: (u32, u32) = (16, 5_000);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);
const REVEAL_STAGGER_MS_BOUNDS: (u64, u64) = (0, 1_000);
const REVEAL_DURATION_MS_BOUNDS: (u64, u64) = (0, 5_000);

#[derive(Clone, Debug, PartialEq)]
pub struct InteractivityConfig {
    pub grid_selector: String,
    pub card_selector: String,
    pub url_attribute: String,
    pub press_delay_ms: u32,
    pub resize_debounce_ms: u32,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_stagger_ms: u64,
    pub reveal_duration_ms: u64,
    pub preload_href: String,
    pub respect_reduced_motion: bool,
    pub log_level: LogLevel,
    pub log_url_mode: UrlLogMode,
}

impl Default for InteractivityConfig {
    fn default() -> Self {
        Self {
            grid_selector: DEFAULT_GRID_SELECTOR.to_string(),
            card_selector: DEFAULT_CARD_SELECTOR.to_string(),
            url_attribute: DEFAULT_URL_ATTRIBUTE.to_string(),
            press_delay_ms: DEFAULT_PRESS_DELAY_MS,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            reveal_root_margin: DEFAULT_REVEAL_ROOT_MARGIN.to_string(),
            reveal_stagger_ms: DEFAULT_REVEAL_STAGGER_MS,
            reveal_duration_ms: DEFAULT_REVEAL_DURATION_MS,
            preload_href: DEFAULT_PRELOAD_HREF.to_string(),
            respect_reduced_motion: false,
            log_level: DEFAULT_LOG_LEVEL,
            log_url_mode: DEFAULT_LOG_URL_MODE,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigOverrides {
    grid_selector: Option<String>,
    card_selector: Option<String>,
    url_attribute: Option<String>,
    press_delay_ms: Option<u32>,
    resize_debounce_ms: Option<u32>,
    reveal_threshold: Option<f64>,
    reveal_root_margin: Option<String>,
    reveal_stagger_ms: Option<u64>,
    reveal_duration_ms: Option<u64>,
    preload_href: Option<String>,
    respect_reduced_motion: Option<bool>,
    log_level: Option<String>,
    log_url_mode: Option<String>,
}

impl InteractivityConfig {
    /// Defaults unless `raw` holds a well-formed JSON override object.
    pub fn resolve(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| Self::from_json(value).ok())
            .unwrap_or_default()
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let overrides: ConfigOverrides = serde_json::from_str(raw)?;
        Ok(Self::from_overrides(overrides))
    }

    fn from_overrides(overrides: ConfigOverrides) -> Self {
        let defaults = Self::default();

        Self {
            grid_selector: non_empty(overrides.grid_selector).unwrap_or(defaults.grid_selector),
            card_selector: non_empty(overrides.card_selector).unwrap_or(defaults.card_selector),
            url_attribute: non_empty(overrides.url_attribute).unwrap_or(defaults.url_attribute),
            press_delay_ms: within_bounds(
                overrides.press_delay_ms,
                DEFAULT_PRESS_DELAY_MS,
                PRESS_DELAY_MS_BOUNDS,
            ),
            resize_debounce_ms: within_bounds(
                overrides.resize_debounce_ms,
                DEFAULT_RESIZE_DEBOUNCE_MS,
                RESIZE_DEBOUNCE_MS_BOUNDS,
            ),
            reveal_threshold: within_bounds(
                overrides.reveal_threshold,
                DEFAULT_REVEAL_THRESHOLD,
                REVEAL_THRESHOLD_BOUNDS,
            ),
            reveal_root_margin: non_empty(overrides.reveal_root_margin)
                .unwrap_or(defaults.reveal_root_margin),
            reveal_stagger_ms: within_bounds(
                overrides.reveal_stagger_ms,
                DEFAULT_REVEAL_STAGGER_MS,
                REVEAL_STAGGER_MS_BOUNDS,
            ),
            reveal_duration_ms: within_bounds(
                overrides.reveal_duration_ms,
                DEFAULT_REVEAL_DURATION_MS,
                REVEAL_DURATION_MS_BOUNDS,
            ),
            preload_href: overrides
                .preload_href
                .as_deref()
                .and_then(http_url_text)
                .unwrap_or(defaults.preload_href),
            respect_reduced_motion: overrides
                .respect_reduced_motion
                .unwrap_or(defaults.respect_reduced_motion),
            log_level: overrides
                .log_level
                .as_deref()
                .and_then(LogLevel::parse)
                .unwrap_or(DEFAULT_LOG_LEVEL),
            log_url_mode: overrides
                .log_url_mode
                .as_deref()
                .and_then(UrlLogMode::parse)
                .unwrap_or(DEFAULT_LOG_URL_MODE),
        }
    }
}

fn within_bounds<T: PartialOrd + Copy>(value: Option<T>, default: T, bounds: (T, T)) -> T {
    value
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Trimmed `value` if it parses as an absolute http(s) URL.
fn http_url_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let parsed = Url::parse(trimmed).ok()?;

    if parsed.scheme() == "http" || parsed.scheme() == "https" {
        Some(trimmed.to_string())
    } else {
        None
    }
}
