//! WASM bindings for page-load performance reporting
//!
//! Installs a one-shot `unload` handler that sends navigation, resource and
//! paint timings plus device metadata to a logging endpoint.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import wasmInit, { init } from './pkg/perf_report_wasm.js';
//!
//! await wasmInit();
//! init({ project: 'shop', version: '1.4.0' });
//! ```

pub mod host;

use perf_report_core::ReportConfig;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

pub use host::WebHost;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
}

/// Install the unload reporter
///
/// `options` is `{ project, version, endpoint?, imageDenylist? }`. Missing
/// browser APIs or bad options leave the page untouched.
#[wasm_bindgen]
pub fn init(options: JsValue) {
    let config = match parse_options(options) {
        Ok(config) => config,
        Err(message) => {
            web_sys::console::warn_1(&format!("perf-report: {}", message).into());
            return;
        }
    };

    let Some(host) = WebHost::new() else {
        return;
    };

    if perf_report_core::init(config, Rc::new(host)) {
        web_sys::console::log_1(&"perf-report: unload reporter installed".into());
    }
}

fn parse_options(options: JsValue) -> Result<ReportConfig, String> {
    let config: ReportConfig = serde_wasm_bindgen::from_value(options)
        .map_err(|e| format!("Invalid options: {}", e))?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Classify a resource with the default denylist
#[wasm_bindgen(js_name = classifyResource)]
pub fn classify_resource(name: &str, initiator_type: &str) -> String {
    perf_report_core::classify(name, initiator_type).to_string()
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn test_classify_resource() {
        assert_eq!(classify_resource("app.v1.js", "link"), "javascript");
        assert_eq!(classify_resource("https://hm.baidu.com/x.gif", "img"), "other");
        assert_eq!(classify_resource("/api", "beacon"), "api");
    }
}
