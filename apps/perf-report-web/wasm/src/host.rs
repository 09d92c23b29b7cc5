//! `web-sys` implementation of the reporter's host traits

use perf_report_core::{
    EntryType, Host, NavigationTimingRecord, PageLifecycle, PaintTimingRecord,
    PerformanceTimeline, ReportError, ResourceTimingRecord, Transport, UnloadHandler,
};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, Performance, PerformanceEntry, Window, XmlHttpRequest};

const UNLOAD_EVENT: &str = "unload";

/// Browser window bound to the host traits
pub struct WebHost {
    window: Window,
}

impl WebHost {
    /// `None` outside a window context (workers, Node)
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }

    fn performance(&self) -> Option<Performance> {
        self.window.performance()
    }

    /// Read entries through `toJSON()`; the timing fields are prototype
    /// getters and would be invisible to a plain object walk
    fn entries<T: DeserializeOwned>(&self, entry_type: EntryType) -> Vec<T> {
        let Some(performance) = self.performance() else {
            return Vec::new();
        };

        performance
            .get_entries_by_type(entry_type.as_str())
            .iter()
            .filter_map(|value| {
                let entry: PerformanceEntry = value.dyn_into().ok()?;
                match serde_wasm_bindgen::from_value(entry.to_json().into()) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        web_sys::console::warn_1(
                            &format!("Skipping {} entry: {}", entry_type.as_str(), e).into(),
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

fn has_property(target: &JsValue, name: &str) -> bool {
    js_sys::Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

fn js_error(value: JsValue) -> ReportError {
    ReportError::Transport(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

impl PerformanceTimeline for WebHost {
    fn navigation_entries(&self) -> Vec<NavigationTimingRecord> {
        self.entries(EntryType::Navigation)
    }

    fn resource_entries(&self) -> Vec<ResourceTimingRecord> {
        self.entries(EntryType::Resource)
    }

    fn paint_entries(&self) -> Vec<PaintTimingRecord> {
        self.entries(EntryType::Paint)
    }
}

impl Transport for WebHost {
    fn supports_beacon(&self) -> bool {
        has_property(&self.window.navigator(), "sendBeacon")
    }

    fn send_beacon(&self, endpoint: &str, body: &str) -> bool {
        self.window
            .navigator()
            .send_beacon_with_opt_str(endpoint, Some(body))
            .unwrap_or(false)
    }

    fn send_sync(&self, endpoint: &str, body: &str) -> Result<(), ReportError> {
        let xhr = XmlHttpRequest::new().map_err(js_error)?;
        // Synchronous: the page is going away
        xhr.open_with_async("POST", endpoint, false)
            .map_err(js_error)?;
        xhr.send_with_opt_str(Some(body)).map_err(js_error)?;
        Ok(())
    }
}

impl PageLifecycle for WebHost {
    fn on_unload(&self, mut handler: UnloadHandler) {
        let slot: Rc<RefCell<Option<Closure<dyn FnMut(Event)>>>> = Rc::new(RefCell::new(None));
        let slot_for_listener = Rc::clone(&slot);
        let window = self.window.clone();

        let listener = Closure::wrap(Box::new(move |_event: Event| {
            handler();

            // Detach after the first fire; the closure is still on the stack
            if let Some(listener) = slot_for_listener.borrow_mut().take() {
                let _ = window.remove_event_listener_with_callback(
                    UNLOAD_EVENT,
                    listener.as_ref().unchecked_ref(),
                );
                listener.forget();
            }
        }) as Box<dyn FnMut(Event)>);

        if let Err(e) = self
            .window
            .add_event_listener_with_callback(UNLOAD_EVENT, listener.as_ref().unchecked_ref())
        {
            web_sys::console::warn_2(&"Failed to register unload listener".into(), &e);
            return;
        }

        *slot.borrow_mut() = Some(listener);
    }
}

impl Host for WebHost {
    fn has_timing_api(&self) -> bool {
        self.performance()
            .map(|performance| has_property(&performance, "getEntriesByType"))
            .unwrap_or(false)
    }

    fn user_agent(&self) -> Option<String> {
        self.window.navigator().user_agent().ok()
    }

    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}
