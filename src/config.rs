//! Runtime configuration shared by the CLI and the server.

use std::time::Duration;

use crate::lookup::providers::{IPAPI_URL, IPINFO_URL, IPWHO_URL};

/// Provider endpoints and HTTP settings. `{ip}` in a URL is replaced by the
/// address being looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub timeout: Duration,
    pub ipapi_url: String,
    pub ipwho_url: String,
    pub ipinfo_url: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            ipapi_url: IPAPI_URL.to_string(),
            ipwho_url: IPWHO_URL.to_string(),
            ipinfo_url: IPINFO_URL.to_string(),
        }
    }
}
