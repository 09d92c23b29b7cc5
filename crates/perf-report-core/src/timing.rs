//! Timing extraction
//!
//! Converts raw Resource/Navigation/Paint Timing entries into rounded duration
//! metrics. Browsers leave fields at zero or omit them entirely when a
//! cross-origin resource does not send `Timing-Allow-Origin`, so every metric
//! goes through [`round`], which maps zero, missing, negative and NaN values to
//! `0` instead of letting them leak into the report.

use crate::classify::{Classifier, ResourceType};
use serde::{Deserialize, Serialize};

/// Decimal places kept by [`round`] when no precision is given
pub const DEFAULT_DIGITS: u32 = 2;

/// Name of the paint entry preferred for the first visual render metric
pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

/// Network phase timestamps shared by resource and navigation entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkTiming {
    pub domain_lookup_start: Option<f64>,
    pub domain_lookup_end: Option<f64>,
    pub connect_start: Option<f64>,
    pub connect_end: Option<f64>,
    pub request_start: Option<f64>,
    pub response_start: Option<f64>,
    pub response_end: Option<f64>,
    /// Bytes over the wire; absent when the browser withholds it
    pub transfer_size: Option<f64>,
}

/// One `resource` entry as reported by the browser
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceTimingRecord {
    pub name: String,
    pub initiator_type: String,
    #[serde(flatten)]
    pub timing: NetworkTiming,
}

/// The `navigation` entry for the document itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationTimingRecord {
    #[serde(flatten)]
    pub timing: NetworkTiming,
    pub dom_content_loaded_event_end: Option<f64>,
    pub dom_complete: Option<f64>,
}

/// A `paint` entry (`first-paint`, `first-contentful-paint`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaintTimingRecord {
    pub name: String,
    pub start_time: Option<f64>,
}

/// Derived metrics for one loaded resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReport {
    pub path: String,
    pub dns_duration: f64,
    pub tcp_connect_duration: f64,
    pub ttfb: f64,
    pub total_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_kb: Option<f64>,
    pub resource_type: ResourceType,
}

/// Derived metrics for the document load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_kb: Option<f64>,
    pub dns_duration: f64,
    pub tcp_connect_duration: f64,
    pub ttfb: f64,
    pub total_duration: f64,
    /// First contentful paint, or DOMContentLoaded end when FCP is unavailable
    pub first_visual_render: f64,
    pub load_complete: f64,
}

/// Round to `digits` decimals, flooring unusable values to zero
///
/// Zero, NaN, infinities and negative values all yield `0`.
pub fn round(value: f64, digits: u32) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }

    // Exact halves round up; everything else rounds the exact binary value,
    // so 2.675 (stored as 2.67499...) becomes 2.67
    if is_exact_half(value, digits) {
        let factor = 10f64.powi(digits as i32);
        return (value * factor).ceil() / factor;
    }

    format!("{:.*}", digits as usize, value)
        .parse()
        .unwrap_or(0.0)
}

/// Whether `value * 10^digits` is exactly `n + 0.5`
///
/// With `value = m * 2^e` and `m` odd, the product is `m * 5^d * 2^(d + e)`,
/// which is an odd multiple of one half only when `e == -(d + 1)`.
fn is_exact_half(value: f64, digits: u32) -> bool {
    let bits = value.to_bits();
    let biased_exponent = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & 0x000f_ffff_ffff_ffff;

    let (mantissa, exponent) = if biased_exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), biased_exponent - 1075)
    };
    if mantissa == 0 {
        return false;
    }

    let exponent = exponent + i64::from(mantissa.trailing_zeros());
    exponent == -(i64::from(digits) + 1)
}

/// [`round`] at [`DEFAULT_DIGITS`] for a field the browser may omit
pub fn round_opt(value: Option<f64>) -> f64 {
    value.map_or(0.0, |v| round(v, DEFAULT_DIGITS))
}

/// Convert bytes to kilobytes (1 KB = 1024 bytes), rounded
pub fn bytes_to_kb(bytes: f64) -> f64 {
    if !bytes.is_finite() || bytes <= 0.0 {
        return 0.0;
    }

    round(bytes / 1024.0, DEFAULT_DIGITS)
}

/// Rounded `end - start`; zero when either side is missing
fn span(end: Option<f64>, start: Option<f64>) -> f64 {
    match (end, start) {
        (Some(end), Some(start)) => round(end - start, DEFAULT_DIGITS),
        _ => 0.0,
    }
}

impl NetworkTiming {
    pub fn dns_duration(&self) -> f64 {
        span(self.domain_lookup_end, self.domain_lookup_start)
    }

    pub fn tcp_connect_duration(&self) -> f64 {
        span(self.connect_end, self.connect_start)
    }

    pub fn ttfb(&self) -> f64 {
        span(self.response_start, self.request_start)
    }

    pub fn total_duration(&self) -> f64 {
        span(self.response_end, self.request_start)
    }

    /// Size in KB, present only when the browser reported a transfer size
    pub fn size_kb(&self) -> Option<f64> {
        self.transfer_size.map(bytes_to_kb)
    }
}

impl ResourceReport {
    pub fn from_record(record: &ResourceTimingRecord, classifier: &Classifier) -> Self {
        let timing = &record.timing;
        Self {
            path: record.name.clone(),
            dns_duration: timing.dns_duration(),
            tcp_connect_duration: timing.tcp_connect_duration(),
            ttfb: timing.ttfb(),
            total_duration: timing.total_duration(),
            size_kb: timing.size_kb(),
            resource_type: classifier.classify(&record.name, &record.initiator_type),
        }
    }
}

impl NavigationReport {
    pub fn from_record(record: &NavigationTimingRecord, paint: &[PaintTimingRecord]) -> Self {
        let timing = &record.timing;

        let first_visual_render = match paint.iter().find(|p| p.name == FIRST_CONTENTFUL_PAINT) {
            Some(fcp) => round_opt(fcp.start_time),
            None => round_opt(record.dom_content_loaded_event_end),
        };

        Self {
            size_kb: timing.size_kb(),
            dns_duration: timing.dns_duration(),
            tcp_connect_duration: timing.tcp_connect_duration(),
            ttfb: timing.ttfb(),
            total_duration: timing.total_duration(),
            first_visual_render,
            load_complete: round_opt(record.dom_complete),
        }
    }
}

/// Build one report per resource entry, preserving the browser's order
pub fn resource_reports(
    records: &[ResourceTimingRecord],
    classifier: &Classifier,
) -> Vec<ResourceReport> {
    records
        .iter()
        .map(|record| ResourceReport::from_record(record, classifier))
        .collect()
}

/// Report for the first navigation entry, if the browser produced one
pub fn navigation_report(
    entries: &[NavigationTimingRecord],
    paint: &[PaintTimingRecord],
) -> Option<NavigationReport> {
    entries
        .first()
        .map(|record| NavigationReport::from_record(record, paint))
}
