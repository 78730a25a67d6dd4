//! Start-up configuration read from the environment.

use std::env;
use std::time::Duration;

use eyre::{WrapErr, eyre};

use physio_bedrock::generator::GenerationParams;

use crate::middleware::rate_limit::RateLimits;

pub const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";

/// Where bearer-token signing keys come from.
#[derive(Debug, Clone, PartialEq)]
pub enum JwtKeySource {
    /// RS256 public key of the Cognito user pool, PEM encoded on disk.
    CognitoPem(String),
    /// HS256 shared secret and issuer for local development.
    SharedSecret { secret: String, issuer: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bucket: String,
    pub region: String,
    pub user_pool_id: String,
    pub app_client_id: String,
    pub jwt: JwtKeySource,
    pub model_id: String,
    pub generation: GenerationParams,
    pub rate_limits: RateLimits,
    /// Registrations from these addresses become pre-approved admins.
    pub admin_emails: Vec<String>,
    /// Serve over plain HTTP on this address instead of Lambda.
    pub bind_addr: Option<String>,
    /// Keep documents in process memory instead of S3.
    pub memory_store: bool,
}

impl ApiConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let string = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let region = string("AWS_REGION", "us-east-1");
        let user_pool_id = string("COGNITO_USER_POOL_ID", "us-east-1_placeholder");

        let jwt = match (get("PHYSIO_JWT_PUBLIC_KEY_PATH"), get("PHYSIO_JWT_SECRET")) {
            (Some(path), _) => JwtKeySource::CognitoPem(path),
            (None, Some(secret)) => JwtKeySource::SharedSecret {
                secret,
                issuer: string("PHYSIO_JWT_ISSUER", "physionote-local"),
            },
            (None, None) => {
                return Err(eyre!(
                    "set PHYSIO_JWT_PUBLIC_KEY_PATH or PHYSIO_JWT_SECRET"
                ));
            }
        };

        let defaults = GenerationParams::default();
        let generation = GenerationParams {
            max_tokens: parse(&get, "PHYSIO_MAX_TOKENS", defaults.max_tokens)?,
            temperature: parse(&get, "PHYSIO_TEMPERATURE", defaults.temperature)?,
        };

        let limits = RateLimits::default();
        let rate_limits = RateLimits {
            burst_requests: parse(&get, "PHYSIO_AI_BURST", limits.burst_requests)?,
            burst_window: Duration::from_secs(parse(
                &get,
                "PHYSIO_AI_BURST_WINDOW_SECS",
                limits.burst_window.as_secs(),
            )?),
            sustained_requests: parse(&get, "PHYSIO_AI_SUSTAINED", limits.sustained_requests)?,
            sustained_window: Duration::from_secs(parse(
                &get,
                "PHYSIO_AI_SUSTAINED_WINDOW_SECS",
                limits.sustained_window.as_secs(),
            )?),
        };

        let admin_emails = get("PHYSIO_ADMIN_EMAILS")
            .map(|list| {
                list.split(',')
                    .map(|e| e.trim().to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bucket: string("PHYSIO_BUCKET", "physionote"),
            region,
            user_pool_id,
            app_client_id: string("COGNITO_APP_CLIENT_ID", ""),
            jwt,
            model_id: string("PHYSIO_MODEL_ID", DEFAULT_MODEL_ID),
            generation,
            rate_limits,
            admin_emails,
            bind_addr: get("PHYSIO_BIND_ADDR"),
            memory_store: get("PHYSIO_MEMORY_STORE").is_some_and(|v| v == "1" || v == "true"),
        })
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> eyre::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(name) {
        Some(raw) => raw.trim().parse().wrap_err_with(|| format!("invalid {name}: {raw}")),
        None => Ok(default),
    }
}
