//! Lookup resolver: runs the provider fallback chain.
//!
//! Flow: validate → ipapi.co → ipwho.is → ipinfo.io → outcome
//!
//! Providers are tried strictly one after another; the first success (or
//! reserved-address answer) ends the chain. A rate limit from any provider
//! is remembered so an all-failed lookup reports `RateLimited` rather than
//! a plain `Failure`.

use std::sync::Arc;
use tracing::{debug, info};

use super::http::{HttpFetch, UreqFetcher};
use super::providers::{IpApiCo, IpInfoIo, IpWhoIs, ProviderAdapter};
use super::types::{AdapterResult, LocationRecord, LookupOutcome, ValidatedIpv4, ValidationError};
use crate::config::LookupConfig;

/// The lookup resolver with its ordered provider list.
pub struct LookupResolver {
    adapters: Vec<Box<dyn ProviderAdapter>>,
}

impl LookupResolver {
    /// Default chain against the public endpoints.
    pub fn new() -> Self {
        Self::from_config(&LookupConfig::default())
    }

    /// Default chain with the endpoints and timeout from `config`.
    pub fn from_config(config: &LookupConfig) -> Self {
        let fetcher: Arc<dyn HttpFetch> = Arc::new(UreqFetcher::new(config.timeout));
        Self::with_fetcher(fetcher, config)
    }

    /// Default chain over a caller-supplied transport.
    pub fn with_fetcher(fetcher: Arc<dyn HttpFetch>, config: &LookupConfig) -> Self {
        let adapters: Vec<Box<dyn ProviderAdapter>> = vec![
            Box::new(IpApiCo::with_url(fetcher.clone(), &config.ipapi_url)),
            Box::new(IpWhoIs::with_url(fetcher.clone(), &config.ipwho_url)),
            Box::new(IpInfoIo::with_url(fetcher, &config.ipinfo_url)),
        ];
        Self::with_adapters(adapters)
    }

    /// Arbitrary adapters, tried in the given order.
    pub fn with_adapters(adapters: Vec<Box<dyn ProviderAdapter>>) -> Self {
        Self { adapters }
    }

    /// Validate `raw` (after trimming) and run it through the chain.
    ///
    /// Invalid input returns `Err` before any provider is contacted.
    pub async fn lookup(&self, raw: &str) -> Result<LookupOutcome, ValidationError> {
        let address = ValidatedIpv4::parse(raw.trim())?;
        Ok(self.lookup_validated(&address).await)
    }

    /// Run an already-validated address through the chain.
    pub async fn lookup_validated(&self, address: &ValidatedIpv4) -> LookupOutcome {
        let mut rate_limited = false;

        for adapter in &self.adapters {
            debug!(provider = adapter.name(), ip = %address, "trying provider");
            match adapter.attempt(address).await {
                AdapterResult::Success(record) => {
                    info!(provider = adapter.name(), ip = %address, "lookup succeeded");
                    return LookupOutcome::Success(record);
                }
                AdapterResult::ReservedAddress => {
                    info!(provider = adapter.name(), ip = %address, "reserved address");
                    return LookupOutcome::Success(LocationRecord::default());
                }
                AdapterResult::RateLimited => {
                    info!(provider = adapter.name(), ip = %address, "provider rate limited");
                    rate_limited = true;
                }
                AdapterResult::ProviderFailure => {
                    debug!(provider = adapter.name(), ip = %address, "provider failed");
                }
            }
        }

        let outcome = if rate_limited { LookupOutcome::RateLimited } else { LookupOutcome::Failure };
        info!(ip = %address, %outcome, "all providers exhausted");
        outcome
    }
}

impl Default for LookupResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::http::HttpReply;
    use crate::lookup::types::FetchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns a fixed result and counts invocations.
    struct StubAdapter {
        result: AdapterResult,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProviderAdapter for StubAdapter {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn attempt(&self, _address: &ValidatedIpv4) -> AdapterResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    /// Fails the test if ever invoked.
    struct PanickingAdapter {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProviderAdapter for PanickingAdapter {
        fn name(&self) -> &'static str {
            "panicking"
        }

        async fn attempt(&self, _address: &ValidatedIpv4) -> AdapterResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            panic!("provider must not be invoked");
        }
    }

    fn stub(result: AdapterResult) -> (Box<dyn ProviderAdapter>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Box::new(StubAdapter { result, calls: calls.clone() }), calls)
    }

    fn panicking() -> (Box<dyn ProviderAdapter>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Box::new(PanickingAdapter { calls: calls.clone() }), calls)
    }

    fn record(city: &str) -> LocationRecord {
        LocationRecord { city: Some(city.into()), ..Default::default() }
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let (a, a_calls) = stub(AdapterResult::Success(record("A-City")));
        let (b, b_calls) = panicking();
        let (c, c_calls) = panicking();
        let resolver = LookupResolver::with_adapters(vec![a, b, c]);

        let outcome = resolver.lookup("8.8.8.8").await.unwrap();
        assert_eq!(outcome, LookupOutcome::Success(record("A-City")));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_survives_later_failure() {
        let (a, _) = stub(AdapterResult::RateLimited);
        let (b, _) = stub(AdapterResult::ProviderFailure);
        let (c, _) = stub(AdapterResult::RateLimited);
        let resolver = LookupResolver::with_adapters(vec![a, b, c]);
        assert_eq!(resolver.lookup("8.8.8.8").await.unwrap(), LookupOutcome::RateLimited);
    }

    #[tokio::test]
    async fn test_single_early_rate_limit_wins_over_failure() {
        let (a, _) = stub(AdapterResult::RateLimited);
        let (b, _) = stub(AdapterResult::ProviderFailure);
        let (c, _) = stub(AdapterResult::ProviderFailure);
        let resolver = LookupResolver::with_adapters(vec![a, b, c]);
        assert_eq!(resolver.lookup("8.8.8.8").await.unwrap(), LookupOutcome::RateLimited);
    }

    #[tokio::test]
    async fn test_fallback_to_second_provider() {
        let (a, a_calls) = stub(AdapterResult::ProviderFailure);
        let (b, b_calls) = stub(AdapterResult::Success(record("B-City")));
        let (c, c_calls) = panicking();
        let resolver = LookupResolver::with_adapters(vec![a, b, c]);

        let outcome = resolver.lookup("8.8.8.8").await.unwrap();
        assert_eq!(outcome, LookupOutcome::Success(record("B-City")));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rate_limited_then_success_is_success() {
        let (a, _) = stub(AdapterResult::RateLimited);
        let (b, _) = stub(AdapterResult::RateLimited);
        let (c, _) = stub(AdapterResult::Success(record("C-City")));
        let resolver = LookupResolver::with_adapters(vec![a, b, c]);
        assert_eq!(resolver.lookup("8.8.8.8").await.unwrap(), LookupOutcome::Success(record("C-City")));
    }

    #[tokio::test]
    async fn test_reserved_address_short_circuits_with_empty_record() {
        let (a, _) = stub(AdapterResult::ReservedAddress);
        let (b, b_calls) = panicking();
        let (c, c_calls) = panicking();
        let resolver = LookupResolver::with_adapters(vec![a, b, c]);

        match resolver.lookup("192.168.1.1").await.unwrap() {
            LookupOutcome::Success(rec) => assert!(rec.is_empty(), "all fields must be absent"),
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
        assert_eq!(c_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failed_is_failure() {
        let (a, a_calls) = stub(AdapterResult::ProviderFailure);
        let (b, b_calls) = stub(AdapterResult::ProviderFailure);
        let (c, c_calls) = stub(AdapterResult::ProviderFailure);
        let resolver = LookupResolver::with_adapters(vec![a, b, c]);

        assert_eq!(resolver.lookup("8.8.8.8").await.unwrap(), LookupOutcome::Failure);
        for calls in [a_calls, b_calls, c_calls] {
            assert_eq!(calls.load(Ordering::SeqCst), 1, "each provider tried exactly once");
        }
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_providers() {
        let (a, a_calls) = panicking();
        let resolver = LookupResolver::with_adapters(vec![a]);

        for input in ["", "1.2.3", "256.0.0.1", "192.168.01.1", "abc"] {
            let err = resolver.lookup(input).await.unwrap_err();
            assert!(matches!(err, ValidationError::InvalidFormat(_)), "input {:?}", input);
        }
        assert_eq!(a_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let (a, _) = stub(AdapterResult::Success(record("X")));
        let resolver = LookupResolver::with_adapters(vec![a]);
        assert!(resolver.lookup("  8.8.8.8\n").await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_chain_is_failure() {
        let resolver = LookupResolver::with_adapters(vec![]);
        assert_eq!(resolver.lookup("8.8.8.8").await.unwrap(), LookupOutcome::Failure);
    }

    // ─── Full chain over a scripted transport ───────────────────

    /// Answers by URL prefix; unknown URLs are a transport error.
    struct RoutedFetcher {
        routes: Vec<(&'static str, u16, &'static str)>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpFetch for RoutedFetcher {
        async fn get(&self, url: &str) -> Result<HttpReply, FetchError> {
            self.seen.lock().unwrap().push(url.to_string());
            self.routes
                .iter()
                .find(|(prefix, _, _)| url.starts_with(prefix))
                .map(|(_, status, body)| HttpReply { status: *status, body: body.to_string() })
                .ok_or_else(|| FetchError::Transport("unreachable".into()))
        }
    }

    fn routed(routes: Vec<(&'static str, u16, &'static str)>) -> Arc<RoutedFetcher> {
        Arc::new(RoutedFetcher { routes, seen: Mutex::new(Vec::new()) })
    }

    #[tokio::test]
    async fn test_chain_ipapi_down_ipwho_answers() {
        let fetcher = routed(vec![
            ("https://ipapi.co/", 503, "Service Unavailable"),
            (
                "https://ipwho.is/",
                200,
                r#"{"success":true,"city":"Berlin","country":"Germany",
                    "connection":{"org":"Org GmbH","isp":"ISP AG"},"timezone":{"id":"Europe/Berlin"}}"#,
            ),
        ]);
        let resolver = LookupResolver::with_fetcher(fetcher.clone(), &LookupConfig::default());

        let outcome = resolver.lookup("5.6.7.8").await.unwrap();
        let expected = LocationRecord {
            city: Some("Berlin".into()),
            country_name: Some("Germany".into()),
            organization: Some("Org GmbH".into()),
            timezone: Some("Europe/Berlin".into()),
            ..Default::default()
        };
        assert_eq!(outcome, LookupOutcome::Success(expected));
        assert_eq!(fetcher.seen.lock().unwrap().len(), 2, "ipinfo.io must not be called");
    }

    #[tokio::test]
    async fn test_chain_rate_limited_everywhere() {
        let fetcher = routed(vec![
            ("https://ipapi.co/", 429, ""),
            ("https://ipwho.is/", 200, r#"{"success":false,"message":"You've hit the monthly limit"}"#),
            ("https://ipinfo.io/", 429, r#"{"error":{"title":"Rate limit exceeded"}}"#),
        ]);
        let resolver = LookupResolver::with_fetcher(fetcher.clone(), &LookupConfig::default());
        assert_eq!(resolver.lookup("5.6.7.8").await.unwrap(), LookupOutcome::RateLimited);
        assert_eq!(fetcher.seen.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_chain_offline() {
        let fetcher = routed(vec![]);
        let resolver = LookupResolver::with_fetcher(fetcher, &LookupConfig::default());
        assert_eq!(resolver.lookup("5.6.7.8").await.unwrap(), LookupOutcome::Failure);
    }
}
