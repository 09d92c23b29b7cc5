//! Resource type inference
//!
//! Browsers report an `initiatorType` describing which construct started a
//! load (`<link>`, `<img>`, `fetch()`, ...). That category alone is too coarse:
//! a `<link>` may preload a script, a `<script>` may carry a JSONP call, and an
//! `<img>` may be a tracking pixel. The [`Classifier`] combines the initiator
//! with substring checks on the resource URL to pick a [`ResourceType`].

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hosts whose image-looking requests are analytics beacons, not images
pub const DEFAULT_IMAGE_DENYLIST: [&str; 2] = ["//pr.map.qq.com", "//hm.baidu.com"];

const SCRIPT_MARKER: &str = ".js";
const STYLE_MARKER: &str = ".css";
const JSONP_MARKER: &str = "output=jsonp";
const IMAGE_MARKERS: [&str; 5] = ["png", "jpg", "gif", "jpeg", "webp"];
const FONT_MARKERS: [&str; 5] = ["eot", "ttf", "woff", "woff2", "svg"];

/// Semantic category of a loaded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Javascript,
    Css,
    Image,
    Font,
    Api,
    Other,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Javascript => "javascript",
            ResourceType::Css => "css",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Api => "api",
            ResourceType::Other => "other",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL heuristics plus the initiator decision table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    image_denylist: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_DENYLIST.iter().map(|s| s.to_string()))
    }
}

impl Classifier {
    /// Create a classifier with a custom image denylist
    ///
    /// Any resource whose name contains one of the denylist fragments is never
    /// reported as an image, whatever extension it carries.
    pub fn new<I, S>(image_denylist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            image_denylist: image_denylist.into_iter().map(Into::into).collect(),
        }
    }

    pub fn image_denylist(&self) -> &[String] {
        &self.image_denylist
    }

    /// Pick a resource type from the URL and the browser's initiator type
    pub fn classify(&self, name: &str, initiator_type: &str) -> ResourceType {
        match initiator_type {
            // <link> also issues preload/prefetch requests, so look at the path
            "link" => {
                if is_script(name) {
                    ResourceType::Javascript
                } else if is_style(name) {
                    ResourceType::Css
                } else if self.is_image(name) {
                    ResourceType::Image
                } else if is_font(name) {
                    ResourceType::Font
                } else {
                    ResourceType::Other
                }
            }
            // Analytics pixels are fired through `new Image()`
            "img" => {
                if self.is_image(name) {
                    ResourceType::Image
                } else {
                    ResourceType::Other
                }
            }
            "script" => {
                if is_jsonp(name) {
                    ResourceType::Api
                } else {
                    ResourceType::Javascript
                }
            }
            // Stylesheets pull in images and fonts
            "css" => {
                if self.is_image(name) {
                    ResourceType::Image
                } else if is_font(name) {
                    ResourceType::Font
                } else {
                    ResourceType::Other
                }
            }
            "fetch" | "beacon" | "xmlhttprequest" => ResourceType::Api,
            _ => ResourceType::Other,
        }
    }

    /// Image extension present and no denylisted host in the name
    pub fn is_image(&self, name: &str) -> bool {
        IMAGE_MARKERS.iter().any(|marker| name.contains(marker))
            && !self
                .image_denylist
                .iter()
                .any(|fragment| name.contains(fragment.as_str()))
    }
}

lazy_static! {
    static ref DEFAULT_CLASSIFIER: Classifier = Classifier::default();
}

/// Classify with the default denylist
pub fn classify(name: &str, initiator_type: &str) -> ResourceType {
    DEFAULT_CLASSIFIER.classify(name, initiator_type)
}

pub fn is_script(name: &str) -> bool {
    name.contains(SCRIPT_MARKER)
}

pub fn is_style(name: &str) -> bool {
    name.contains(STYLE_MARKER)
}

pub fn is_font(name: &str) -> bool {
    FONT_MARKERS.iter().any(|marker| name.contains(marker))
}

pub fn is_jsonp(name: &str) -> bool {
    name.contains(JSONP_MARKER)
}


// Property tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: classify is total and deterministic
        #[test]
        fn classify_is_total(name in ".*", initiator in ".*") {
            let first = classify(&name, &initiator);
            let second = classify(&name, &initiator);
            prop_assert_eq!(first, second);
        }

        /// Property: fetch-like initiators are always api
        #[test]
        fn fetch_is_always_api(name in ".*") {
            prop_assert_eq!(classify(&name, "fetch"), ResourceType::Api);
            prop_assert_eq!(classify(&name, "xmlhttprequest"), ResourceType::Api);
        }

        /// Property: a denylisted host is never an image
        #[test]
        fn denylisted_never_image(path in "[a-z/]{0,20}", ext in "(png|jpg|gif|jpeg|webp)") {
            let name = format!("https://hm.baidu.com/{}.{}", path, ext);
            for initiator in ["link", "img", "css"] {
                prop_assert_ne!(classify(&name, initiator), ResourceType::Image);
            }
        }
    }
}
