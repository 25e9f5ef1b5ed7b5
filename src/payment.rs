//! Payment Redirect Matching
//!
//! The fee-payment page runs in a WebView; the only thing the client does
//! with it is watch navigations for the gateway's return URLs.

use serde::{Deserialize, Serialize};

use crate::config::GatewayConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRedirect {
    Success,
    Failure,
    /// Any other page; keep the WebView open.
    Pending,
}

#[derive(Debug, Clone)]
pub struct RedirectMatcher {
    success_prefix: String,
    failure_prefix: String,
}

impl RedirectMatcher {
    pub fn new(success_prefix: impl Into<String>, failure_prefix: impl Into<String>) -> Self {
        Self {
            success_prefix: normalize(&success_prefix.into()),
            failure_prefix: normalize(&failure_prefix.into()),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(&config.payment_success_prefix, &config.payment_failure_prefix)
    }

    /// Classify a navigation target. Scheme and host compare case-insensitively.
    pub fn classify(&self, url: &str) -> PaymentRedirect {
        let url = normalize(url);
        if !self.success_prefix.is_empty() && url.starts_with(&self.success_prefix) {
            PaymentRedirect::Success
        } else if !self.failure_prefix.is_empty() && url.starts_with(&self.failure_prefix) {
            PaymentRedirect::Failure
        } else {
            PaymentRedirect::Pending
        }
    }
}

fn normalize(url: &str) -> String {
    let url = url.trim();
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let (host, path) = match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    format!("{}://{}{}", scheme.to_ascii_lowercase(), host.to_ascii_lowercase(), path)
}
