//! Reporter installation
//!
//! [`init`] arms a single unload handler. The start timestamp is captured at
//! install time, not when the handler fires, so it marks the page load rather
//! than the moment of departure.

use crate::config::ReportConfig;
use crate::host::Host;
use crate::reporter::{collect_payload, Reporter};
use std::rc::Rc;
use tracing::{debug, warn};

/// Install the unload reporter on `host`
///
/// Returns `false` (and registers nothing) when the host lacks the timing API
/// or the configuration is unusable. Errors never reach the caller.
pub fn init<H: Host + 'static>(config: ReportConfig, host: Rc<H>) -> bool {
    if !host.has_timing_api() {
        debug!("Timing API unavailable, reporter not installed");
        return false;
    }

    if let Err(e) = config.validate() {
        warn!("Reporter not installed: {}", e);
        return false;
    }

    let timestamp = host.now_millis();
    let classifier = config.classifier();
    let mut pending = Some((config, classifier));
    let target = Rc::clone(&host);

    host.on_unload(Box::new(move || {
        // Unload is terminal, but a host may still deliver it twice
        let Some((config, classifier)) = pending.take() else {
            return;
        };

        let payload = collect_payload(target.as_ref(), &config, &classifier, timestamp);
        let delivery = Reporter::new(&config, target.as_ref()).send(&payload);
        debug!(?delivery, resources = payload.resource.len(), "Unload report finished");
    }));

    debug!(timestamp, "Unload reporter installed");
    true
}
