//! Browser glue shared by the fetch client and the clipboard.

use chrono::{DateTime, Local};
use shared::Clock;
use wasm_bindgen::{JsCast, JsValue};
use zoon::{Task, Timer};

/// Attribute marking each pane's DOM node for the selection-copy fallback.
pub const PANE_ATTRIBUTE: &str = "data-playground-pane";

/// Human-readable description of a rejected promise or thrown value.
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Some(text) = value.as_string() {
        return text;
    }
    format!("{value:?}")
}

pub fn window() -> Result<web_sys::Window, String> {
    web_sys::window().ok_or_else(|| "no global window".to_owned())
}

#[derive(Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        Task::start(async move {
            Timer::sleep(delay_ms).await;
            callback();
        });
    }
}
