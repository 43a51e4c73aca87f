//! Process-wide baseline settings.
//!
//! The baseline is built once at startup and injected behind an `Arc`.
//! Nothing mutates it afterwards: `initialize` returns a new value, and the
//! resolver clones the relevant flavor for every connection.

use serde::Serialize;

use crate::config::env::{read_bool, EnvNames, EnvSource};
use crate::config::schema::TransportConfig;
use crate::error::Result;
use crate::http::platform::PlatformInfo;
use crate::http::user_agent::{compose_user_agent, UserAgentToken};
use crate::settings::locale::Locale;
use crate::settings::transport::{BackoffPolicy, TransportSettings, WebProxy};

/// Product name advertised by structured client connections.
pub const CLIENT_PRODUCT: &str = "RunnerTransport";
/// Product name advertised by raw streaming connections.
pub const RAW_PRODUCT: &str = "RunnerTransport.Raw";

/// Baseline settings for both connection flavors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportDefaults {
    /// Baseline for structured client connections.
    pub client: TransportSettings,
    /// Baseline for raw streaming connections.
    pub raw: TransportSettings,
}

impl TransportDefaults {
    /// Pristine baseline carrying the current UI locale.
    pub fn new(ui_locale: Locale) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        Ok(Self {
            client: TransportSettings::new(
                ui_locale.clone(),
                UserAgentToken::product(CLIENT_PRODUCT, Some(version))?,
            ),
            raw: TransportSettings::new(
                ui_locale,
                UserAgentToken::product(RAW_PRODUCT, Some(version))?,
            ),
        })
    }

    /// Startup initialization: user agent, proxy and TLS posture.
    ///
    /// Each flavor composes its own user agent from its own baseline list.
    pub fn initialize(
        &self,
        additional_user_agents: &[UserAgentToken],
        platform: &dyn PlatformInfo,
        env: &dyn EnvSource,
        names: &EnvNames,
        proxy: Option<WebProxy>,
    ) -> Self {
        let mut next = self.clone();

        next.client.user_agent =
            compose_user_agent(additional_user_agents, platform, &self.client.user_agent);
        next.raw.user_agent =
            compose_user_agent(additional_user_agents, platform, &self.raw.user_agent);

        next.client.proxy = proxy.clone();
        next.raw.proxy = proxy;

        if read_bool(env, &names.tls_no_verify) {
            tracing::warn!(
                variable = %names.tls_no_verify,
                "TLS server certificate validation is disabled"
            );
            next.client.tls_verification_disabled = true;
            next.raw.tls_verification_disabled = true;
        }

        next
    }

    /// Build the baseline from a loaded configuration.
    pub fn from_config(
        config: &TransportConfig,
        platform: &dyn PlatformInfo,
        env: &dyn EnvSource,
    ) -> Result<Self> {
        let names = EnvNames::with_prefix(&config.environment.prefix);
        let additional = config
            .user_agent
            .additional
            .iter()
            .map(|raw| UserAgentToken::parse(raw))
            .collect::<Result<Vec<_>>>()?;

        let mut base = Self::new(Locale::current_ui(env))?;
        let backoff = BackoffPolicy::from(config.retry.clone());
        base.client.backoff = backoff;
        base.raw.backoff = backoff;

        let proxy = config.proxy.clone().map(WebProxy::from);
        let defaults = base.initialize(&additional, platform, env, &names, proxy);

        tracing::info!(
            env_prefix = %config.environment.prefix,
            user_agent_tokens = defaults.client.user_agent.len(),
            proxy = defaults.client.proxy.is_some(),
            tls_verification_disabled = defaults.client.tls_verification_disabled,
            "Transport defaults initialized"
        );

        Ok(defaults)
    }
}
