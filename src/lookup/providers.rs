//! Geolocation providers: ipapi.co, ipwho.is and ipinfo.io.
//!
//! Each provider answers in its own JSON shape. The adapters below are the
//! only code that looks at provider field names; everything past
//! [`ProviderAdapter::attempt`] deals in [`LocationRecord`] and
//! [`AdapterResult`].

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use super::http::{HttpFetch, HttpReply};
use super::types::{AdapterResult, LocationRecord, ValidatedIpv4};

pub const IPAPI_URL: &str = "https://ipapi.co/{ip}/json/";
pub const IPWHO_URL: &str = "https://ipwho.is/{ip}";
pub const IPINFO_URL: &str = "https://ipinfo.io/{ip}/json";

/// One external geolocation service.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Make exactly one request for `address` and classify the reply.
    async fn attempt(&self, address: &ValidatedIpv4) -> AdapterResult;
}

// ─── Shared plumbing ────────────────────────────────────────────

/// Issue the GET and hand status + parsed body to `interpret`.
///
/// Transport errors become `ProviderFailure`. A body that is not JSON is
/// replaced by an empty object so `interpret` still runs on the status.
async fn fetch_and_interpret(
    name: &'static str,
    fetcher: &dyn HttpFetch,
    url_template: &str,
    address: &ValidatedIpv4,
    interpret: fn(u16, &Value) -> AdapterResult,
) -> AdapterResult {
    let url = url_template.replace("{ip}", address.as_str());

    let reply = match fetcher.get(&url).await {
        Ok(r) => r,
        Err(e) => {
            warn!(provider = name, ip = %address, error = %e, "provider request failed");
            return AdapterResult::ProviderFailure;
        }
    };

    let body = parse_body(&reply);
    let result = interpret(reply.status, &body);
    debug!(provider = name, ip = %address, status = reply.status, ?result, "provider replied");
    result
}

fn parse_body(reply: &HttpReply) -> Value {
    serde_json::from_str(&reply.body).unwrap_or_else(|_| Value::Object(Default::default()))
}

fn is_ok_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// JSON truthiness: null, false, 0, "" and missing keys are false.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// A displayable field value, or `None` if the provider had nothing usable.
fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

fn message_contains(body: &Value, needle: &str) -> bool {
    str_field(body, "message").is_some_and(|m| m.contains(needle))
}

// ─── ipapi.co ───────────────────────────────────────────────────

/// First choice. Reports errors in-body with `error: true` plus a `reason`.
pub struct IpApiCo {
    fetcher: Arc<dyn HttpFetch>,
    url_template: String,
}

impl IpApiCo {
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self::with_url(fetcher, IPAPI_URL)
    }

    pub fn with_url(fetcher: Arc<dyn HttpFetch>, url_template: &str) -> Self {
        Self { fetcher, url_template: url_template.to_string() }
    }

    fn interpret(status: u16, body: &Value) -> AdapterResult {
        if status == 429 || str_field(body, "reason") == Some("RateLimited") {
            return AdapterResult::RateLimited;
        }

        if is_ok_status(status) && !truthy(&body["error"]) {
            return AdapterResult::Success(LocationRecord {
                postal_code: text(&body["postal"]),
                city: text(&body["city"]),
                region: text(&body["region"]),
                country_name: text(&body["country_name"]),
                organization: text(&body["org"]),
                timezone: text(&body["timezone"]),
            });
        }

        if str_field(body, "reason") == Some("Reserved IP Address") || message_contains(body, "Reserved") {
            return AdapterResult::ReservedAddress;
        }

        AdapterResult::ProviderFailure
    }
}

#[async_trait]
impl ProviderAdapter for IpApiCo {
    fn name(&self) -> &'static str {
        "ipapi.co"
    }

    async fn attempt(&self, address: &ValidatedIpv4) -> AdapterResult {
        fetch_and_interpret(self.name(), self.fetcher.as_ref(), &self.url_template, address, Self::interpret).await
    }
}

// ─── ipwho.is ───────────────────────────────────────────────────

/// Second choice. Always answers 200 and signals outcome via `success`.
pub struct IpWhoIs {
    fetcher: Arc<dyn HttpFetch>,
    url_template: String,
}

impl IpWhoIs {
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self::with_url(fetcher, IPWHO_URL)
    }

    pub fn with_url(fetcher: Arc<dyn HttpFetch>, url_template: &str) -> Self {
        Self { fetcher, url_template: url_template.to_string() }
    }

    /// The HTTP status is ignored; only the body decides.
    fn interpret(_status: u16, body: &Value) -> AdapterResult {
        if truthy(&body["success"]) {
            let connection = &body["connection"];
            let organization = if truthy(&connection["org"]) {
                text(&connection["org"])
            } else {
                text(&connection["isp"])
            };
            return AdapterResult::Success(LocationRecord {
                postal_code: text(&body["postal"]),
                city: text(&body["city"]),
                region: text(&body["region"]),
                country_name: text(&body["country"]),
                organization,
                timezone: text(&body["timezone"]["id"]),
            });
        }

        // Case-sensitive here, case-insensitive for "limit" below.
        if message_contains(body, "Reserved") || message_contains(body, "Private") {
            return AdapterResult::ReservedAddress;
        }

        if str_field(body, "message").is_some_and(|m| m.to_lowercase().contains("limit")) {
            return AdapterResult::RateLimited;
        }

        AdapterResult::ProviderFailure
    }
}

#[async_trait]
impl ProviderAdapter for IpWhoIs {
    fn name(&self) -> &'static str {
        "ipwho.is"
    }

    async fn attempt(&self, address: &ValidatedIpv4) -> AdapterResult {
        fetch_and_interpret(self.name(), self.fetcher.as_ref(), &self.url_template, address, Self::interpret).await
    }
}

// ─── ipinfo.io ──────────────────────────────────────────────────

/// Last resort. Marks private ranges with `bogon: true`.
pub struct IpInfoIo {
    fetcher: Arc<dyn HttpFetch>,
    url_template: String,
}

impl IpInfoIo {
    pub fn new(fetcher: Arc<dyn HttpFetch>) -> Self {
        Self::with_url(fetcher, IPINFO_URL)
    }

    pub fn with_url(fetcher: Arc<dyn HttpFetch>, url_template: &str) -> Self {
        Self { fetcher, url_template: url_template.to_string() }
    }

    fn interpret(status: u16, body: &Value) -> AdapterResult {
        if status == 429 || body["error"]["title"].as_str() == Some("Rate limit exceeded") {
            return AdapterResult::RateLimited;
        }

        if is_ok_status(status) && truthy(&body["ip"]) {
            return AdapterResult::Success(LocationRecord {
                postal_code: text(&body["postal"]),
                city: text(&body["city"]),
                region: text(&body["region"]),
                country_name: text(&body["country"]),
                organization: text(&body["org"]),
                timezone: text(&body["timezone"]),
            });
        }

        if truthy(&body["bogon"]) {
            return AdapterResult::ReservedAddress;
        }

        AdapterResult::ProviderFailure
    }
}

#[async_trait]
impl ProviderAdapter for IpInfoIo {
    fn name(&self) -> &'static str {
        "ipinfo.io"
    }

    async fn attempt(&self, address: &ValidatedIpv4) -> AdapterResult {
        fetch_and_interpret(self.name(), self.fetcher.as_ref(), &self.url_template, address, Self::interpret).await
    }
}
