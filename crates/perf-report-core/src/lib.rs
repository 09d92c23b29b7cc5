//! Page-load performance reporting
//!
//! Collects Navigation, Resource and Paint Timing entries when the page
//! unloads, classifies every resource, attaches browser/OS metadata and sends
//! one JSON payload to a logging endpoint.
//!
//! The browser is reached only through the [`host`] traits, so everything here
//! runs and tests natively. The `perf-report-wasm` crate supplies the
//! `web-sys` implementation.
//!
//! # Example
//!
//! ```ignore
//! use perf_report_core::{init, ReportConfig};
//! use std::rc::Rc;
//!
//! let installed = init(ReportConfig::new("shop", "1.4.0"), Rc::new(host));
//! ```

pub mod classify;
pub mod config;
pub mod device;
pub mod error;
pub mod host;
pub mod init;
pub mod payload;
pub mod reporter;
pub mod timing;

pub use classify::{classify, Classifier, ResourceType};
pub use config::{ReportConfig, DEFAULT_ENDPOINT};
pub use device::DeviceInfo;
pub use error::ReportError;
pub use host::{EntryType, Host, PageLifecycle, PerformanceTimeline, Transport, UnloadHandler};
pub use init::init;
pub use payload::Payload;
pub use reporter::{collect_payload, Delivery, Reporter};
pub use timing::{
    bytes_to_kb, navigation_report, resource_reports, round, round_opt, NavigationReport,
    NavigationTimingRecord, NetworkTiming, PaintTimingRecord, ResourceReport,
    ResourceTimingRecord,
};
