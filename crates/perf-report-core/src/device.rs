//! Device metadata from the user-agent string
//!
//! A short ordered rule table per field; the first matching pattern names the
//! browser or OS and its first capture group (if any) is the version. Anything
//! the table does not recognize is left as `None` and dropped from the payload.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

struct Rule {
    pattern: Regex,
    name: &'static str,
}

fn rule(pattern: &str, name: &'static str) -> Rule {
    Rule {
        pattern: Regex::new(pattern).unwrap(),
        name,
    }
}

lazy_static! {
    /// Browser rules; vendors that also advertise "Chrome" or "Safari" come first
    static ref BROWSER_RULES: Vec<Rule> = vec![
        rule(r"Edg(?:e|A|iOS)?/([\d.]+)", "Edge"),
        rule(r"OPR/([\d.]+)", "Opera"),
        rule(r"Opera.+Version/([\d.]+)", "Opera"),
        rule(r"SamsungBrowser/([\d.]+)", "Samsung Browser"),
        rule(r"MicroMessenger/([\d.]+)", "WeChat"),
        rule(r"UCBrowser/([\d.]+)", "UCBrowser"),
        rule(r"(?:Firefox|FxiOS)/([\d.]+)", "Firefox"),
        rule(r"MSIE ([\d.]+)", "IE"),
        rule(r"Trident/.+rv:([\d.]+)", "IE"),
        rule(r"(?:Chrome|CriOS)/([\d.]+)", "Chrome"),
        rule(r"Version/([\d.]+).*Mobile/.*Safari/", "Mobile Safari"),
        rule(r"Version/([\d.]+).*Safari/", "Safari"),
    ];

    /// OS rules; iOS and Android before the desktop kernels they mention
    static ref OS_RULES: Vec<Rule> = vec![
        rule(r"Windows NT ([\d.]+)", "Windows"),
        rule(r"(?:iPhone|iPad|iPod).*? OS ([\d_]+)", "iOS"),
        rule(r"Android ([\d.]+)", "Android"),
        rule(r"CrOS \S+ ([\d.]+)", "Chromium OS"),
        rule(r"Mac OS X ([\d_.]+)", "Mac OS"),
        rule(r"Linux", "Linux"),
    ];
}

/// Browser and OS identification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
}

impl DeviceInfo {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let (browser_name, browser_version) = match_rules(&BROWSER_RULES, user_agent);
        let (os_name, os_version) = match_rules(&OS_RULES, user_agent);

        let os_version = match (os_name.as_deref(), os_version) {
            (Some("Windows"), Some(nt)) => Some(windows_release(&nt).to_string()),
            (_, version) => version.map(|v| v.replace('_', ".")),
        };

        Self {
            browser_name,
            browser_version,
            os_name,
            os_version,
        }
    }
}

fn match_rules(rules: &[Rule], user_agent: &str) -> (Option<String>, Option<String>) {
    for rule in rules {
        if let Some(captures) = rule.pattern.captures(user_agent) {
            let version = captures.get(1).map(|m| m.as_str().to_string());
            return (Some(rule.name.to_string()), version);
        }
    }
    (None, None)
}

/// Map a Windows NT kernel version to its marketing name
fn windows_release(nt_version: &str) -> &str {
    match nt_version {
        "10.0" => "10",
        "6.3" => "8.1",
        "6.2" => "8",
        "6.1" => "7",
        "6.0" => "Vista",
        "5.2" | "5.1" => "XP",
        "5.0" => "2000",
        other => other,
    }
}
