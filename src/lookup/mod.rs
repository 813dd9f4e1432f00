//! IPv4 geolocation lookup subsystem.
//!
//! Validates an address, then asks ipapi.co, ipwho.is and ipinfo.io in
//! turn until one of them produces a usable answer.

pub mod http;
pub mod providers;
pub mod resolver;
pub mod types;
pub mod validate;

pub use http::{HttpFetch, HttpReply, UreqFetcher};
pub use providers::{IpApiCo, IpInfoIo, IpWhoIs, ProviderAdapter};
pub use resolver::LookupResolver;
pub use types::{AdapterResult, FetchError, LocationRecord, LookupOutcome, ValidatedIpv4, ValidationError};
pub use validate::is_valid_ipv4;
