//! In-memory browser stand-in for end-to-end reporter tests

use perf_report_core::{
    Host, NavigationTimingRecord, PageLifecycle, PaintTimingRecord, PerformanceTimeline,
    ReportError, ResourceTimingRecord, Transport, UnloadHandler,
};
use std::cell::RefCell;

pub const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Beacon { endpoint: String, body: String },
    Sync { endpoint: String, body: String },
}

impl Sent {
    pub fn body(&self) -> &str {
        match self {
            Sent::Beacon { body, .. } | Sent::Sync { body, .. } => body,
        }
    }
}

pub struct FakeHost {
    pub timing_api: bool,
    pub beacon_supported: bool,
    pub beacon_accepts: bool,
    pub now: u64,
    pub user_agent: Option<String>,
    pub navigation: Vec<NavigationTimingRecord>,
    pub resources: Vec<ResourceTimingRecord>,
    pub paint: Vec<PaintTimingRecord>,
    pub sends: RefCell<Vec<Sent>>,
    pub handlers: RefCell<Vec<UnloadHandler>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            timing_api: true,
            beacon_supported: true,
            beacon_accepts: true,
            now: 1_700_000_000_000,
            user_agent: Some(CHROME_UA.to_string()),
            navigation: Vec::new(),
            resources: Vec::new(),
            paint: Vec::new(),
            sends: RefCell::new(Vec::new()),
            handlers: RefCell::new(Vec::new()),
        }
    }
}

impl FakeHost {
    /// Deliver the unload event to every registered handler
    pub fn fire_unload(&self) {
        let mut handlers = self.handlers.take();
        for handler in handlers.iter_mut() {
            handler();
        }
        // Keep them registered so a second fire reaches them again
        self.handlers.borrow_mut().extend(handlers);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn sends(&self) -> Vec<Sent> {
        self.sends.borrow().clone()
    }
}

impl PerformanceTimeline for FakeHost {
    fn navigation_entries(&self) -> Vec<NavigationTimingRecord> {
        self.navigation.clone()
    }

    fn resource_entries(&self) -> Vec<ResourceTimingRecord> {
        self.resources.clone()
    }

    fn paint_entries(&self) -> Vec<PaintTimingRecord> {
        self.paint.clone()
    }
}

impl Transport for FakeHost {
    fn supports_beacon(&self) -> bool {
        self.beacon_supported
    }

    fn send_beacon(&self, endpoint: &str, body: &str) -> bool {
        self.sends.borrow_mut().push(Sent::Beacon {
            endpoint: endpoint.to_string(),
            body: body.to_string(),
        });
        self.beacon_accepts
    }

    fn send_sync(&self, endpoint: &str, body: &str) -> Result<(), ReportError> {
        self.sends.borrow_mut().push(Sent::Sync {
            endpoint: endpoint.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

impl PageLifecycle for FakeHost {
    fn on_unload(&self, handler: UnloadHandler) {
        self.handlers.borrow_mut().push(handler);
    }
}

impl Host for FakeHost {
    fn has_timing_api(&self) -> bool {
        self.timing_api
    }

    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn now_millis(&self) -> u64 {
        self.now
    }
}
