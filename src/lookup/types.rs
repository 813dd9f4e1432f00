//! Core types for the lookup subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An IPv4 address that passed [`super::validate::is_valid_ipv4`].
///
/// Only constructible through [`ValidatedIpv4::parse`], so holding one is
/// proof the dotted-quad check already ran.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedIpv4(String);

impl ValidatedIpv4 {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if super::validate::is_valid_ipv4(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(ValidationError::InvalidFormat(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatedIpv4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-agnostic geolocation result.
///
/// Every field is either the provider's normalized value or `None`; empty
/// strings from a provider never make it in here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country_name: Option<String>,
    pub organization: Option<String>,
    pub timezone: Option<String>,
}

impl LocationRecord {
    /// True when no provider data is present (reserved/private addresses).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// What a single provider attempt concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterResult {
    Success(LocationRecord),
    /// The provider flagged the address as reserved, private or bogon.
    ReservedAddress,
    RateLimited,
    ProviderFailure,
}

/// Final result of one end-to-end lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Success(LocationRecord),
    RateLimited,
    Failure,
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(_) => write!(f, "success"),
            Self::RateLimited => write!(f, "rate-limited"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Input rejected before any provider is contacted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid IPv4 format: '{0}'")]
    InvalidFormat(String),
}

/// Transport-level failure talking to a provider.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("blocking request task failed: {0}")]
    Join(String),
}
