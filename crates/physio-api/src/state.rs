use std::sync::Arc;

use eyre::WrapErr;
use tracing::info;

use physio_auth::{CognitoIdentity, IdentityProvider, TokenVerifier};
use physio_bedrock::generator::{BedrockGenerator, GenerationParams, TextGenerator};
use physio_storage::{DocumentStore, MemoryStore, S3Store};

use crate::config::{ApiConfig, JwtKeySource};
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub verifier: Arc<TokenVerifier>,
    pub generator: Arc<dyn TextGenerator>,
    pub rate_limiter: RateLimiter,
    pub model_id: String,
    pub generation: GenerationParams,
    pub admin_emails: Arc<Vec<String>>,
}

impl AppState {
    /// Wire the AWS-backed services described by `config`.
    pub async fn from_config(config: &ApiConfig) -> eyre::Result<Self> {
        let store: Arc<dyn DocumentStore> = if config.memory_store {
            info!("using in-memory document store");
            Arc::new(MemoryStore::new())
        } else {
            let s3 = physio_storage::client::build_client_with_region(&config.region).await;
            Arc::new(S3Store::new(s3, config.bucket.clone()))
        };

        let cognito = physio_auth::client::build_client_with_region(&config.region).await;
        let identity = CognitoIdentity::new(
            cognito,
            config.user_pool_id.clone(),
            config.app_client_id.clone(),
        );

        let verifier = match &config.jwt {
            JwtKeySource::CognitoPem(path) => {
                let pem = std::fs::read(path)
                    .wrap_err_with(|| format!("reading JWT public key {path}"))?;
                TokenVerifier::cognito(&pem, &config.user_pool_id, &config.region)?
            }
            JwtKeySource::SharedSecret { secret, issuer } => {
                TokenVerifier::shared_secret(secret.as_bytes(), issuer)
            }
        };

        let bedrock = physio_bedrock::client::build_client_with_region(&config.region).await;

        Ok(Self {
            store,
            identity: Arc::new(identity),
            verifier: Arc::new(verifier),
            generator: Arc::new(BedrockGenerator::new(bedrock)),
            rate_limiter: RateLimiter::new(config.rate_limits),
            model_id: config.model_id.clone(),
            generation: config.generation,
            admin_emails: Arc::new(config.admin_emails.clone()),
        })
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}
