//! Reporter configuration
//!
//! Built once at `init` and read-only afterwards. The web entry point
//! deserializes it from the options object passed to `init`:
//!
//! ```json
//! { "project": "shop", "version": "1.4.0" }
//! ```
//!
//! `endpoint` and `imageDenylist` are optional and fall back to
//! [`DEFAULT_ENDPOINT`] and the classifier's default denylist.

use crate::classify::{Classifier, DEFAULT_IMAGE_DENYLIST};
use crate::error::ReportError;
use serde::{Deserialize, Serialize};

/// Logging endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str =
    "https://easy-mock.com/mock/5940f4a28ac26d795f00537d/example/logging";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    /// Project identifier copied into every payload
    pub project: String,
    /// Project version; the payload omits the key when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// URL receiving the JSON payload
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Host fragments whose image-like requests are not counted as images
    #[serde(default = "default_image_denylist")]
    pub image_denylist: Vec<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_image_denylist() -> Vec<String> {
    DEFAULT_IMAGE_DENYLIST.iter().map(|s| s.to_string()).collect()
}

impl ReportConfig {
    pub fn new(project: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            version: Some(version.into()),
            endpoint: default_endpoint(),
            image_denylist: default_image_denylist(),
        }
    }

    pub fn without_version(mut self) -> Self {
        self.version = None;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_image_denylist<I, S>(mut self, denylist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_denylist = denylist.into_iter().map(Into::into).collect();
        self
    }

    /// Parse configuration from a JSON options string
    pub fn from_json(s: &str) -> Result<Self, ReportError> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| ReportError::InvalidOptions(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that could never deliver a report
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.project.trim().is_empty() {
            return Err(ReportError::InvalidOptions(
                "project must not be empty".to_string(),
            ));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ReportError::InvalidOptions(
                "endpoint must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.image_denylist.iter().cloned())
    }
}
