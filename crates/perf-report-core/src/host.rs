//! Host environment seam
//!
//! Everything the reporter needs from the browser goes through these traits.
//! The wasm crate binds them to `window.performance`, `navigator` and the
//! `unload` event; tests bind them to in-memory fakes.

use crate::error::ReportError;
use crate::timing::{NavigationTimingRecord, PaintTimingRecord, ResourceTimingRecord};

/// Entry types accepted by `performance.getEntriesByType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Navigation,
    Resource,
    Paint,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Navigation => "navigation",
            EntryType::Resource => "resource",
            EntryType::Paint => "paint",
        }
    }
}

/// Timing entries for the current page, in the order the browser lists them
pub trait PerformanceTimeline {
    fn navigation_entries(&self) -> Vec<NavigationTimingRecord>;
    fn resource_entries(&self) -> Vec<ResourceTimingRecord>;
    fn paint_entries(&self) -> Vec<PaintTimingRecord>;
}

/// Delivery primitives for the serialized payload
pub trait Transport {
    /// Whether a beacon-style sender exists at all
    fn supports_beacon(&self) -> bool;

    /// Queue the body for non-blocking delivery; `false` if the browser refused it
    fn send_beacon(&self, endpoint: &str, body: &str) -> bool;

    /// Blocking POST used when the beacon is unavailable or refused
    fn send_sync(&self, endpoint: &str, body: &str) -> Result<(), ReportError>;
}

/// Callback run when the page is being torn down
pub type UnloadHandler = Box<dyn FnMut()>;

/// Page lifecycle subscription
pub trait PageLifecycle {
    /// Register `handler` for the unload event
    ///
    /// Implementations should drop the subscription after the first fire.
    fn on_unload(&self, handler: UnloadHandler);
}

/// The full set of capabilities the initializer consumes
pub trait Host: PerformanceTimeline + Transport + PageLifecycle {
    /// Whether `performance.getEntriesByType` is available
    fn has_timing_api(&self) -> bool;

    fn user_agent(&self) -> Option<String>;

    /// Wall-clock time in milliseconds since the Unix epoch
    fn now_millis(&self) -> u64;
}
