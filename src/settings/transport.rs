//! The resolved transport policy bundle.

use std::time::Duration;

use serde::Serialize;

use crate::config::schema::{ProxyConfig, RetryConfig};
use crate::http::user_agent::UserAgentToken;
use crate::settings::locale::Locale;

/// Lower bound for the retry count.
pub const MIN_RETRY: u32 = 3;
/// Upper bound for the retry count.
pub const MAX_RETRY: u32 = 10;
/// Retry count when no override is present.
pub const DEFAULT_RETRY: u32 = 3;

/// Lower bound for an environment supplied send timeout, in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 100;
/// Upper bound for an environment supplied send timeout, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 1200;
/// Send timeout when neither the environment nor the caller supplies one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(100);

/// Retry/timeout/locale/TLS/identity policy applied to one connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportSettings {
    /// Retries the handler may make after the first attempt of one request,
    /// so a request is sent at most `max_retry + 1` times.
    pub max_retry: u32,

    /// Total time allowed for one attempt.
    #[serde(serialize_with = "serialize_secs")]
    pub send_timeout: Duration,

    /// Languages sent in `Accept-Language`, in preference order.
    pub accept_languages: Vec<Locale>,

    /// Ordered, duplicate-free `User-Agent` tokens.
    pub user_agent: Vec<UserAgentToken>,

    /// Accept any server certificate.
    pub tls_verification_disabled: bool,

    /// Outbound web proxy.
    pub proxy: Option<WebProxy>,

    /// Delay between attempts.
    pub backoff: BackoffPolicy,
}

impl TransportSettings {
    /// Pristine settings for one flavor: default retry and timeout, the given
    /// UI locale and a single product token.
    pub fn new(ui_locale: Locale, product: UserAgentToken) -> Self {
        Self {
            max_retry: DEFAULT_RETRY,
            send_timeout: DEFAULT_TIMEOUT,
            accept_languages: vec![ui_locale],
            user_agent: vec![product],
            tls_verification_disabled: false,
            proxy: None,
            backoff: BackoffPolicy::default(),
        }
    }

    /// Remove the invariant locale, keeping the order of the rest.
    pub fn remove_invariant_locale(&mut self) -> bool {
        let before = self.accept_languages.len();
        self.accept_languages.retain(|locale| !locale.is_invariant());
        before != self.accept_languages.len()
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_secs())
}

/// Exponential backoff parameters for the transport handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackoffPolicy {
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        RetryConfig::default().into()
    }
}

impl From<RetryConfig> for BackoffPolicy {
    fn from(config: RetryConfig) -> Self {
        Self {
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }
}

/// Outbound web proxy shared by every connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebProxy {
    pub url: String,
    pub bypass: Vec<String>,
}

impl WebProxy {
    /// Build the `reqwest` proxy, honoring the bypass list.
    pub fn to_reqwest(&self) -> reqwest::Result<reqwest::Proxy> {
        let proxy = reqwest::Proxy::all(&self.url)?;
        if self.bypass.is_empty() {
            return Ok(proxy);
        }
        Ok(proxy.no_proxy(reqwest::NoProxy::from_string(&self.bypass.join(","))))
    }
}

impl From<ProxyConfig> for WebProxy {
    fn from(config: ProxyConfig) -> Self {
        Self {
            url: config.url,
            bypass: config.bypass,
        }
    }
}
