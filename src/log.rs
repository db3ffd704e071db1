use serde_json::{Map, Number, Value};
use std::rc::Rc;
use url::Url;

// Variant order is severity order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UrlLogMode {
    Host,
    Full,
}

impl UrlLogMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "host" => Some(Self::Host),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct EventLog {
    min_level: LogLevel,
    url_mode: UrlLogMode,
    sink: Rc<dyn Fn(&str)>,
}

impl EventLog {
    pub fn new(min_level: LogLevel, url_mode: UrlLogMode, sink: impl Fn(&str) + 'static) -> Self {
        Self {
            min_level,
            url_mode,
            sink: Rc::new(sink),
        }
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub fn console(min_level: LogLevel, url_mode: UrlLogMode) -> Self {
        Self::new(min_level, url_mode, write_line)
    }

    pub fn emit(&self, level: LogLevel, event: &str, fields: Value) {
        if level < self.min_level {
            return;
        }

        let mut payload = Map::new();
        payload.insert(
            "ts".to_string(),
            Value::Number(Number::from(now_unix_millis())),
        );
        payload.insert("level".to_string(), Value::String(level.as_str().to_string()));
        payload.insert("event".to_string(), Value::String(event.to_string()));

        if let Value::Object(extra) = fields {
            for (key, value) in extra {
                payload.insert(key, value);
            }
        }

        (self.sink)(&Value::Object(payload).to_string());
    }

    /// Navigation URL as it should appear in a log field.
    pub fn url_value(&self, raw: &str) -> String {
        let Ok(url) = Url::parse(raw) else {
            return match self.url_mode {
                UrlLogMode::Host => "relative".to_string(),
                UrlLogMode::Full => raw.to_string(),
            };
        };

        match self.url_mode {
            UrlLogMode::Host => match (url.host_str(), url.port()) {
                (Some(host), Some(port)) => format!("{host}:{port}"),
                (Some(host), None) => host.to_string(),
                (None, _) => "unknown".to_string(),
            },
            UrlLogMode::Full => url.to_string(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn write_line(line: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line));
}

#[cfg(not(target_arch = "wasm32"))]
fn write_line(line: &str) {
    println!("{line}");
}

#[cfg(target_arch = "wasm32")]
fn now_unix_millis() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_unix_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis() as u64)
        .unwrap_or(0)
}
