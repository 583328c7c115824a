//! Provider configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.

use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Settings read by client authentication and backchannel request validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Issuer identifier of this provider.
    ///
    /// ID tokens presented as `id_token_hint` must carry this issuer.
    pub issuer: String,

    /// Token endpoint URL.
    ///
    /// Client assertions must list it in their audience.
    pub token_endpoint: String,

    /// Whether the provider accepts the CIBA `user_code` parameter.
    pub backchannel_user_code_parameter_supported: bool,

    /// Lifetime of a backchannel request when the client asks for none.
    pub backchannel_default_expiry: Duration,

    /// Upper bound (inclusive) on a client-requested backchannel lifetime.
    pub backchannel_maximum_expiry: Duration,

    /// Tolerance applied to `exp` and `nbf` checks.
    pub clock_skew: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            issuer: "http://localhost:8080".to_string(),
            token_endpoint: "http://localhost:8080/token".to_string(),
            backchannel_user_code_parameter_supported: false,
            backchannel_default_expiry: Duration::from_secs(300), // 5 minutes
            backchannel_maximum_expiry: Duration::from_secs(1_800), // 30 minutes
            clock_skew: Duration::ZERO,
        }
    }
}

impl ProviderConfig {
    /// Creates a configuration for the given issuer.
    ///
    /// The token endpoint defaults to `{issuer}/token`.
    #[must_use]
    pub fn new(issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();
        let token_endpoint = format!("{}/token", issuer.trim_end_matches('/'));
        Self {
            issuer,
            token_endpoint,
            ..Default::default()
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `OP_ISSUER` | `http://localhost:8080` |
    /// | `OP_TOKEN_ENDPOINT` | `{issuer}/token` |
    /// | `OP_CIBA_USER_CODE_SUPPORTED` | `false` |
    /// | `OP_CIBA_DEFAULT_EXPIRY_SECS` | `300` |
    /// | `OP_CIBA_MAXIMUM_EXPIRY_SECS` | `1800` |
    /// | `OP_CLOCK_SKEW_SECS` | `0` |
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or the resulting
    /// configuration is inconsistent.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ProviderConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let issuer = lookup("OP_ISSUER").unwrap_or(defaults.issuer);
        let token_endpoint = lookup("OP_TOKEN_ENDPOINT")
            .unwrap_or_else(|| format!("{}/token", issuer.trim_end_matches('/')));

        let backchannel_user_code_parameter_supported =
            parse_var(&lookup, "OP_CIBA_USER_CODE_SUPPORTED")?
                .unwrap_or(defaults.backchannel_user_code_parameter_supported);

        let backchannel_default_expiry = parse_var(&lookup, "OP_CIBA_DEFAULT_EXPIRY_SECS")?
            .map_or(defaults.backchannel_default_expiry, Duration::from_secs);

        let backchannel_maximum_expiry = parse_var(&lookup, "OP_CIBA_MAXIMUM_EXPIRY_SECS")?
            .map_or(defaults.backchannel_maximum_expiry, Duration::from_secs);

        let clock_skew = parse_var(&lookup, "OP_CLOCK_SKEW_SECS")?
            .map_or(defaults.clock_skew, Duration::from_secs);

        let config = Self {
            issuer,
            token_endpoint,
            backchannel_user_code_parameter_supported,
            backchannel_default_expiry,
            backchannel_maximum_expiry,
            clock_skew,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns an error if the default backchannel expiry exceeds the maximum.
    pub fn validate(&self) -> CoreResult<()> {
        if self.backchannel_default_expiry > self.backchannel_maximum_expiry {
            return Err(CoreError::Config(format!(
                "default backchannel expiry ({}s) exceeds the maximum ({}s)",
                self.backchannel_default_expiry.as_secs(),
                self.backchannel_maximum_expiry.as_secs()
            )));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> CoreResult<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| CoreError::InvalidEnv { name, value })
        })
        .transpose()
}
