#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;

use physio_api::middleware::rate_limit::{RateLimiter, RateLimits};
use physio_api::state::AppState;
use physio_auth::error::AuthError;
use physio_auth::{AuthTokens, Claims, IdentityProvider, TokenVerifier};
use physio_bedrock::error::BedrockError;
use physio_bedrock::generator::{Generation, GenerationParams, TextGenerator};
use physio_core::keys;
use physio_core::models::usage::TokenCount;
use physio_core::models::user::{UserAccount, UserRole};
use physio_storage::documents;
use physio_storage::{DocumentStore, MemoryStore};

pub const SECRET: &[u8] = b"test-secret";
pub const ISSUER: &str = "physionote-test";
pub const MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";
pub const ADMIN_EMAIL: &str = "lead@clinic.test";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Mint a token the test verifier accepts.
pub fn token_for(sub: &str, token_use: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        iss: ISSUER.to_string(),
        token_use: token_use.to_string(),
        exp: now_secs() + 3600,
        iat: now_secs(),
        email: None,
        username: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

struct StubUser {
    sub: String,
    password: String,
    confirmed: bool,
    enabled: bool,
}

/// Identity provider that keeps users in memory and signs tokens with
/// [`SECRET`].
#[derive(Default)]
pub struct StubIdentity {
    users: Mutex<HashMap<String, StubUser>>,
}

impl StubIdentity {
    fn tokens(sub: &str, email: &str) -> AuthTokens {
        AuthTokens {
            access_token: token_for(sub, "access"),
            id_token: token_for(sub, "id"),
            refresh_token: format!("refresh:{email}"),
            expires_in: 3600,
        }
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn sign_up(&self, email: &str, password: &str, _name: &str) -> Result<String, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users.contains_key(email) {
            return Err(AuthError::UserExists(email.to_string()));
        }
        let sub = format!("sub-{}", users.len() + 1);
        users.insert(
            email.to_string(),
            StubUser {
                sub: sub.clone(),
                password: password.to_string(),
                confirmed: false,
                enabled: true,
            },
        );
        Ok(sub)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError> {
        let users = self.users.lock().unwrap();
        let user = users
            .get(email)
            .filter(|u| u.password == password)
            .ok_or_else(|| AuthError::AuthFailed("invalid credentials".to_string()))?;
        if !user.enabled {
            return Err(AuthError::AuthFailed("user is disabled".to_string()));
        }
        if !user.confirmed {
            return Err(AuthError::NotConfirmed);
        }
        Ok(Self::tokens(&user.sub, email))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let email = refresh_token
            .strip_prefix("refresh:")
            .ok_or_else(|| AuthError::AuthFailed("invalid refresh token".to_string()))?;
        let users = self.users.lock().unwrap();
        let user = users
            .get(email)
            .filter(|u| u.enabled)
            .ok_or_else(|| AuthError::AuthFailed("invalid refresh token".to_string()))?;
        Ok(Self::tokens(&user.sub, email))
    }

    async fn confirm_user(&self, email: &str) -> Result<(), AuthError> {
        if let Some(user) = self.users.lock().unwrap().get_mut(email) {
            user.confirmed = true;
        }
        Ok(())
    }

    async fn disable_user(&self, email: &str) -> Result<(), AuthError> {
        if let Some(user) = self.users.lock().unwrap().get_mut(email) {
            user.enabled = false;
        }
        Ok(())
    }

    async fn enable_user(&self, email: &str) -> Result<(), AuthError> {
        if let Some(user) = self.users.lock().unwrap().get_mut(email) {
            user.enabled = true;
        }
        Ok(())
    }
}

/// Generator that returns a canned reply, or fails when `reply` is `None`.
pub struct StubGenerator {
    reply: Option<String>,
    pub last_system: Mutex<Option<String>>,
    pub last_user: Mutex<Option<String>>,
}

impl StubGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            last_system: Mutex::new(None),
            last_user: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            last_system: Mutex::new(None),
            last_user: Mutex::new(None),
        }
    }

    pub fn seen_user(&self) -> String {
        self.last_user.lock().unwrap().clone().unwrap_or_default()
    }

    pub fn seen_system(&self) -> String {
        self.last_system.lock().unwrap().clone().unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(
        &self,
        _model_id: &str,
        system_prompt: &str,
        user_message: &str,
        _params: GenerationParams,
    ) -> Result<Generation, BedrockError> {
        *self.last_system.lock().unwrap() = Some(system_prompt.to_string());
        *self.last_user.lock().unwrap() = Some(user_message.to_string());
        match &self.reply {
            Some(text) => Ok(Generation {
                text: text.clone(),
                tokens: TokenCount {
                    input: 1_000,
                    output: 200,
                },
            }),
            None => Err(BedrockError::Invocation("throttled".to_string())),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<StubIdentity>,
    pub generator: Arc<StubGenerator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(StubGenerator::replying("Suggested text"), RateLimits::default())
    }

    pub fn with(generator: StubGenerator, limits: RateLimits) -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(StubIdentity::default());
        let generator = Arc::new(generator);

        let state = AppState {
            store: store.clone(),
            identity: identity.clone(),
            verifier: Arc::new(TokenVerifier::shared_secret(SECRET, ISSUER)),
            generator: generator.clone(),
            rate_limiter: RateLimiter::new(limits),
            model_id: MODEL_ID.to_string(),
            generation: GenerationParams::default(),
            admin_emails: Arc::new(vec![ADMIN_EMAIL.to_string()]),
        };

        Self {
            router: physio_api::router(state),
            store,
            identity,
            generator,
        }
    }

    /// Store an account directly and return an access token for it.
    pub async fn seed_user(&self, sub: &str, role: UserRole, approved: bool) -> String {
        let now = jiff::Timestamp::now();
        let mut account = UserAccount::pending(sub, &format!("{sub}@clinic.test"), sub, now);
        account.role = role;
        if approved {
            account.approve("seed", now);
        }
        documents::save_json(&*self.store, &keys::user(sub), &account)
            .await
            .unwrap();
        token_for(sub, "access")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    pub async fn transactions(&self) -> Vec<Value> {
        let keys = self.store.list(keys::TRANSACTIONS_PREFIX).await.unwrap();
        let mut out = Vec::new();
        for key in keys {
            let body = self.store.get(&key).await.unwrap();
            out.push(serde_json::from_slice(&body).unwrap());
        }
        out
    }
}

pub fn tight_limits(burst: usize) -> RateLimits {
    RateLimits {
        burst_requests: burst,
        burst_window: Duration::from_secs(60),
        sustained_requests: 100,
        sustained_window: Duration::from_secs(3600),
    }
}
