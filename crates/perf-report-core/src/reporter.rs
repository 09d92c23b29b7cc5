//! Payload assembly and delivery
//!
//! The payload is sent from an unload handler, where asynchronous requests are
//! routinely cancelled. Delivery therefore tries the beacon first and, when the
//! beacon is missing or refuses the body, makes exactly one blocking request
//! with the same bytes. Nothing is retried and no response is read.

use crate::classify::Classifier;
use crate::config::ReportConfig;
use crate::device::DeviceInfo;
use crate::host::{Host, Transport};
use crate::payload::Payload;
use crate::timing::{navigation_report, resource_reports};
use tracing::{debug, instrument, warn};

/// How (or whether) a payload left the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by the beacon sender
    Beacon,
    /// Sent through the blocking fallback request
    Fallback,
    /// Neither path delivered it
    Failed,
}

pub struct Reporter<'a, T: Transport + ?Sized> {
    config: &'a ReportConfig,
    transport: &'a T,
}

impl<'a, T: Transport + ?Sized> Reporter<'a, T> {
    pub fn new(config: &'a ReportConfig, transport: &'a T) -> Self {
        Self { config, transport }
    }

    /// Serialize and transmit the payload; failures are logged, not returned
    #[instrument(skip_all, fields(endpoint = %self.config.endpoint))]
    pub fn send(&self, payload: &Payload) -> Delivery {
        let body = match payload.to_json() {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to serialize payload: {}", e);
                return Delivery::Failed;
            }
        };
        self.send_body(&body)
    }

    /// Transmit an already serialized body
    pub fn send_body(&self, body: &str) -> Delivery {
        let endpoint = self.config.endpoint.as_str();

        if self.transport.supports_beacon() {
            if self.transport.send_beacon(endpoint, body) {
                debug!(bytes = body.len(), "Payload queued via beacon");
                return Delivery::Beacon;
            }
            debug!("Beacon refused payload, falling back to blocking request");
        }

        match self.transport.send_sync(endpoint, body) {
            Ok(()) => {
                debug!(bytes = body.len(), "Payload sent via blocking request");
                Delivery::Fallback
            }
            Err(e) => {
                warn!("Failed to send payload: {}", e);
                Delivery::Failed
            }
        }
    }
}

/// Gather every report section from the host
pub fn collect_payload<H: Host + ?Sized>(
    host: &H,
    config: &ReportConfig,
    classifier: &Classifier,
    timestamp: u64,
) -> Payload {
    let device = host
        .user_agent()
        .map(|ua| DeviceInfo::from_user_agent(&ua))
        .unwrap_or_default();

    Payload {
        project: config.project.clone(),
        version: config.version.clone(),
        timestamp,
        device,
        resource: resource_reports(&host.resource_entries(), classifier),
        navigation: navigation_report(&host.navigation_entries(), &host.paint_entries()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingTransport {
        beacon_supported: bool,
        beacon_result: bool,
        sync_fails: bool,
        beacon_calls: RefCell<Vec<(String, String)>>,
        sync_calls: RefCell<Vec<(String, String)>>,
    }

    impl Transport for RecordingTransport {
        fn supports_beacon(&self) -> bool {
            self.beacon_supported
        }

        fn send_beacon(&self, endpoint: &str, body: &str) -> bool {
            self.beacon_calls
                .borrow_mut()
                .push((endpoint.to_string(), body.to_string()));
            self.beacon_result
        }

        fn send_sync(&self, endpoint: &str, body: &str) -> Result<(), ReportError> {
            self.sync_calls
                .borrow_mut()
                .push((endpoint.to_string(), body.to_string()));
            if self.sync_fails {
                Err(ReportError::Transport("network down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_beacon_success_skips_fallback() {
        let config = ReportConfig::new("shop", "1.0.0");
        let transport = RecordingTransport {
            beacon_supported: true,
            beacon_result: true,
            ..Default::default()
        };

        let delivery = Reporter::new(&config, &transport).send_body("{}");
        assert_eq!(delivery, Delivery::Beacon);
        assert_eq!(transport.beacon_calls.borrow().len(), 1);
        assert!(transport.sync_calls.borrow().is_empty());
    }

    #[test]
    fn test_refused_beacon_falls_back_once_with_same_body() {
        let config = ReportConfig::new("shop", "1.0.0").with_endpoint("https://logs.example.com");
        let transport = RecordingTransport {
            beacon_supported: true,
            beacon_result: false,
            ..Default::default()
        };

        let delivery = Reporter::new(&config, &transport).send_body(r#"{"a":1}"#);
        assert_eq!(delivery, Delivery::Fallback);

        let beacon = transport.beacon_calls.borrow();
        let sync = transport.sync_calls.borrow();
        assert_eq!(sync.len(), 1);
        assert_eq!(sync[0], beacon[0]);
        assert_eq!(sync[0].0, "https://logs.example.com");
    }

    #[test]
    fn test_missing_beacon_goes_straight_to_fallback() {
        let config = ReportConfig::new("shop", "1.0.0");
        let transport = RecordingTransport::default();

        let delivery = Reporter::new(&config, &transport).send_body("{}");
        assert_eq!(delivery, Delivery::Fallback);
        assert!(transport.beacon_calls.borrow().is_empty());
        assert_eq!(transport.sync_calls.borrow().len(), 1);
    }

    #[test]
    fn test_fallback_failure_is_not_retried() {
        let config = ReportConfig::new("shop", "1.0.0");
        let transport = RecordingTransport {
            beacon_supported: true,
            beacon_result: false,
            sync_fails: true,
            ..Default::default()
        };

        let delivery = Reporter::new(&config, &transport).send_body("{}");
        assert_eq!(delivery, Delivery::Failed);
        assert_eq!(transport.beacon_calls.borrow().len(), 1);
        assert_eq!(transport.sync_calls.borrow().len(), 1);
    }
}
