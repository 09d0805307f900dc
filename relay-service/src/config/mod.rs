use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;
const DEFAULT_PUSHOVER_API_URL: &str = "https://api.pushover.net";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub api: ApiConfig,
    pub provider: ProviderConfig,
    pub outbound: OutboundConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Shared secret expected as the last path segment of `/api/{token}`.
    pub token: Secret<String>,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct OutboundConfig {
    /// Per-request timeout for provider calls. `None` keeps the client default.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub enum ProviderConfig {
    Gotify(GotifyConfig),
    Pushover(PushoverConfig),
    /// Log notifications instead of sending them.
    Mock,
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderConfig::Gotify(_) => "gotify",
            ProviderConfig::Pushover(_) => "pushover",
            ProviderConfig::Mock => "mock",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GotifyConfig {
    /// Server base URL; messages are posted to `{url}/message`.
    pub url: String,
    pub app_token: Secret<String>,
    pub priority: i64,
}

#[derive(Debug, Clone)]
pub struct PushoverConfig {
    pub api_url: String,
    pub app_token: Secret<String>,
    pub user_key: Secret<String>,
    pub device: Option<String>,
    pub sound: Option<String>,
    pub priority: Option<i8>,
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Build the relay settings from an arbitrary variable source.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars {
            lookup: &lookup,
            is_prod: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod",
        };

        let token = vars.get("POTS_TOKEN", None)?;
        if token.is_empty() {
            return Err(config_error("POTS_TOKEN must not be empty"));
        }

        let provider = match vars.get("NOTIFY_PROVIDER", Some("gotify"))?.as_str() {
            "gotify" => ProviderConfig::Gotify(GotifyConfig {
                url: vars.get("GOTIFY_URL", Some("http://localhost:8080"))?,
                app_token: Secret::new(vars.get("GOTIFY_TOKEN", None)?),
                priority: vars.parse("GOTIFY_PRIORITY", 0)?,
            }),
            "pushover" => ProviderConfig::Pushover(PushoverConfig {
                api_url: vars.get("PUSHOVER_API_URL", Some(DEFAULT_PUSHOVER_API_URL))?,
                app_token: Secret::new(vars.get("PUSHOVER_TOKEN", None)?),
                user_key: Secret::new(vars.get("PUSHOVER_USER", None)?),
                device: vars.optional("PUSHOVER_DEVICE"),
                sound: vars.optional("PUSHOVER_SOUND"),
                priority: pushover_priority(vars.parse_optional("PUSHOVER_PRIORITY")?)?,
            }),
            "mock" => ProviderConfig::Mock,
            other => {
                return Err(config_error(&format!(
                    "NOTIFY_PROVIDER must be one of gotify, pushover, mock (got '{}')",
                    other
                )))
            }
        };

        Ok(RelayConfig {
            common,
            api: ApiConfig {
                token: Secret::new(token),
                max_body_bytes: vars.parse("RELAY_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            },
            provider,
            outbound: OutboundConfig {
                timeout: vars
                    .parse_optional::<u64>("RELAY_OUTBOUND_TIMEOUT_SECS")?
                    .map(Duration::from_secs),
            },
        })
    }

    /// True when `candidate` equals the configured token. Runs in constant time.
    pub fn token_matches(&self, candidate: &str) -> bool {
        use subtle::ConstantTimeEq;

        let expected = self.api.token.expose_secret().as_bytes();
        expected.ct_eq(candidate.as_bytes()).into()
    }
}

struct Vars<'a, F> {
    lookup: &'a F,
    is_prod: bool,
}

impl<F> Vars<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str, default: Option<&str>) -> Result<String, AppError> {
        match (self.lookup)(key) {
            Some(val) => Ok(val),
            None => {
                if self.is_prod {
                    Err(config_error(&format!(
                        "{} is required in production but not set",
                        key
                    )))
                } else if let Some(def) = default {
                    Ok(def.to_string())
                } else {
                    Err(config_error(&format!("{} is required but not set", key)))
                }
            }
        }
    }

    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    fn parse<T: FromStr>(&self, key: &str, default: T) -> Result<T, AppError> {
        Ok(self.parse_optional(key)?.unwrap_or(default))
    }

    fn parse_optional<T: FromStr>(&self, key: &str) -> Result<Option<T>, AppError> {
        self.optional(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| config_error(&format!("{} has an invalid value '{}'", key, raw)))
            })
            .transpose()
    }
}

// Emergency priority (2) needs retry/expire parameters, which are not sent.
fn pushover_priority(priority: Option<i8>) -> Result<Option<i8>, AppError> {
    match priority {
        Some(p) if !(-2..=1).contains(&p) => Err(config_error(&format!(
            "PUSHOVER_PRIORITY must be between -2 and 1 (got {})",
            p
        ))),
        other => Ok(other),
    }
}

fn config_error(msg: &str) -> AppError {
    AppError::ConfigError(anyhow::anyhow!("{}", msg))
}
