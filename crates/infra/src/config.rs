//! Configuration loading and representation.

use std::fmt;
use std::time::Duration;

use dtesv_dte::{Environment, PayloadBuilder};

pub const ENV_AMBIENTE: &str = "DTE_AMBIENTE";
pub const ENV_SIGNER_URL: &str = "DTE_SIGNER_URL";
pub const ENV_SIGNER_PASSWORD: &str = "DTE_SIGNER_PASSWORD";
pub const ENV_MH_TOKEN: &str = "DTE_MH_TOKEN";
pub const ENV_RECEPTION_URL: &str = "DTE_RECEPTION_URL";
pub const ENV_SIGN_TIMEOUT_SECS: &str = "DTE_SIGN_TIMEOUT_SECS";
pub const ENV_SUBMIT_TIMEOUT_SECS: &str = "DTE_SUBMIT_TIMEOUT_SECS";

pub const DEFAULT_SIGN_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is not a valid number of seconds: {value:?}")]
    InvalidTimeout { key: &'static str, value: String },
    #[error("{key} must be greater than zero")]
    ZeroTimeout { key: &'static str },
}

/// Emitter-wide settings for signing and submission.
///
/// Passed explicitly to the submission client; nothing below this type reads
/// the process environment.
#[derive(Clone)]
pub struct DteConfig {
    pub environment: Environment,
    /// Base URL of the signing service (without `/firmardocumento/`).
    pub signer_url: Option<String>,
    /// Password of the emitter's private key inside the signer.
    pub signer_password: Option<String>,
    /// Bearer token for the Hacienda reception API.
    pub mh_token: Option<String>,
    /// Overrides the environment's reception endpoint.
    pub reception_url: Option<String>,
    pub sign_timeout: Duration,
    pub submit_timeout: Duration,
}

impl Default for DteConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Test,
            signer_url: None,
            signer_password: None,
            mh_token: None,
            reception_url: None,
            sign_timeout: DEFAULT_SIGN_TIMEOUT,
            submit_timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for DteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DteConfig")
            .field("environment", &self.environment)
            .field("signer_url", &self.signer_url)
            .field("signer_password", &self.signer_password.as_ref().map(|_| "***"))
            .field("mh_token", &self.mh_token.as_ref().map(|_| "***"))
            .field("reception_url", &self.reception_url)
            .field("sign_timeout", &self.sign_timeout)
            .field("submit_timeout", &self.submit_timeout)
            .finish()
    }
}

impl DteConfig {
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }

    pub fn with_signer_url(mut self, url: impl Into<String>) -> Self {
        self.signer_url = Some(url.into());
        self
    }

    pub fn with_signer_password(mut self, password: impl Into<String>) -> Self {
        self.signer_password = Some(password.into());
        self
    }

    pub fn with_mh_token(mut self, token: impl Into<String>) -> Self {
        self.mh_token = Some(token.into());
        self
    }

    pub fn with_reception_url(mut self, url: impl Into<String>) -> Self {
        self.reception_url = Some(url.into());
        self
    }

    pub fn with_sign_timeout(mut self, timeout: Duration) -> Self {
        self.sign_timeout = timeout;
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.submit_timeout = timeout;
        self
    }

    /// Load from `DTE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (environment, secrets file, tests).
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = match get(ENV_AMBIENTE) {
            Some(code) => Environment::from_code(&code),
            None => {
                tracing::warn!(key = ENV_AMBIENTE, "not set, using the test environment");
                Environment::Test
            }
        };

        let signer_url = get(ENV_SIGNER_URL);
        if signer_url.is_none() {
            tracing::warn!(key = ENV_SIGNER_URL, "not set, signing will fail until configured");
        }

        let mh_token = get(ENV_MH_TOKEN);
        if mh_token.is_none() {
            tracing::warn!(key = ENV_MH_TOKEN, "not set, submission will fail until configured");
        }

        Ok(Self {
            environment,
            signer_url,
            signer_password: get(ENV_SIGNER_PASSWORD),
            mh_token,
            reception_url: get(ENV_RECEPTION_URL),
            sign_timeout: parse_timeout(ENV_SIGN_TIMEOUT_SECS, get(ENV_SIGN_TIMEOUT_SECS))?
                .unwrap_or(DEFAULT_SIGN_TIMEOUT),
            submit_timeout: parse_timeout(ENV_SUBMIT_TIMEOUT_SECS, get(ENV_SUBMIT_TIMEOUT_SECS))?
                .unwrap_or(DEFAULT_SUBMIT_TIMEOUT),
        })
    }

    /// Hacienda reception endpoint: the override if set, else the environment's.
    pub fn reception_url(&self) -> &str {
        self.reception_url
            .as_deref()
            .unwrap_or_else(|| self.environment.reception_url())
    }

    /// Signing endpoint, if a signer is configured.
    pub fn signing_endpoint(&self) -> Option<String> {
        self.signer_url
            .as_deref()
            .map(|base| format!("{}/firmardocumento/", base.trim_end_matches('/')))
    }

    pub fn payload_builder(&self) -> PayloadBuilder {
        let builder = PayloadBuilder::new(self.environment);
        match &self.signer_password {
            Some(password) => builder.with_signer_password(password.clone()),
            None => builder,
        }
    }
}

fn parse_timeout(key: &'static str, value: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let secs: u64 = value
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout { key, value: value.clone() })?;
    if secs == 0 {
        return Err(ConfigError::ZeroTimeout { key });
    }
    Ok(Some(Duration::from_secs(secs)))
}
