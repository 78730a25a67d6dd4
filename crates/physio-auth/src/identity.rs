use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::Client;
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType, AuthenticationResultType};
use serde::Serialize;
use tracing::info;

use crate::error::AuthError;

/// Tokens issued on a successful sign-in or refresh.
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: i32,
}

/// Credential store operations the application relies on.
///
/// Usernames are email addresses. New sign-ups stay unconfirmed until an
/// admin approves them, so the provider itself refuses their sign-in.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new user. Returns the provider's subject id.
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<String, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError>;

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError>;

    /// Mark a pending registration confirmed so it can sign in.
    async fn confirm_user(&self, email: &str) -> Result<(), AuthError>;

    /// Block a user from signing in.
    async fn disable_user(&self, email: &str) -> Result<(), AuthError>;

    /// Lift a previous [`IdentityProvider::disable_user`].
    async fn enable_user(&self, email: &str) -> Result<(), AuthError>;
}

/// [`IdentityProvider`] backed by a Cognito user pool.
pub struct CognitoIdentity {
    client: Client,
    user_pool_id: String,
    app_client_id: String,
}

impl CognitoIdentity {
    pub fn new(client: Client, user_pool_id: impl Into<String>, app_client_id: impl Into<String>) -> Self {
        Self {
            client,
            user_pool_id: user_pool_id.into(),
            app_client_id: app_client_id.into(),
        }
    }

    async fn initiate(
        &self,
        flow: AuthFlowType,
        params: HashMap<String, String>,
        fallback_refresh: Option<&str>,
    ) -> Result<AuthTokens, AuthError> {
        let resp = self
            .client
            .initiate_auth()
            .auth_flow(flow)
            .client_id(&self.app_client_id)
            .set_auth_parameters(Some(params))
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_not_authorized_exception() {
                    AuthError::AuthFailed("invalid credentials".to_string())
                } else if err.is_user_not_confirmed_exception() {
                    AuthError::NotConfirmed
                } else {
                    AuthError::Cognito(err.to_string())
                }
            })?;

        if let Some(result) = resp.authentication_result() {
            return Ok(tokens_from(result, fallback_refresh));
        }

        match resp.challenge_name() {
            Some(challenge) => Err(AuthError::ChallengeRequired(challenge.as_str().to_string())),
            None => Err(AuthError::AuthFailed("unexpected response".to_string())),
        }
    }
}

fn tokens_from(result: &AuthenticationResultType, fallback_refresh: Option<&str>) -> AuthTokens {
    AuthTokens {
        access_token: result.access_token().unwrap_or_default().to_string(),
        id_token: result.id_token().unwrap_or_default().to_string(),
        // Cognito omits the refresh token on refresh; keep the caller's.
        refresh_token: result
            .refresh_token()
            .or(fallback_refresh)
            .unwrap_or_default()
            .to_string(),
        expires_in: result.expires_in(),
    }
}

fn attribute(name: &str, value: &str) -> Result<AttributeType, AuthError> {
    AttributeType::builder()
        .name(name)
        .value(value)
        .build()
        .map_err(|e| AuthError::Cognito(e.to_string()))
}

#[async_trait]
impl IdentityProvider for CognitoIdentity {
    async fn sign_up(&self, email: &str, password: &str, name: &str) -> Result<String, AuthError> {
        info!(email, "registering user");

        let resp = self
            .client
            .sign_up()
            .client_id(&self.app_client_id)
            .username(email)
            .password(password)
            .user_attributes(attribute("email", email)?)
            .user_attributes(attribute("name", name)?)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_username_exists_exception() {
                    AuthError::UserExists(email.to_string())
                } else {
                    AuthError::Cognito(err.to_string())
                }
            })?;

        Ok(resp.user_sub().to_string())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthTokens, AuthError> {
        info!(email, "initiating auth");

        let params = HashMap::from([
            ("USERNAME".to_string(), email.to_string()),
            ("PASSWORD".to_string(), password.to_string()),
        ]);
        self.initiate(AuthFlowType::UserPasswordAuth, params, None).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        let params = HashMap::from([("REFRESH_TOKEN".to_string(), refresh_token.to_string())]);
        self.initiate(AuthFlowType::RefreshTokenAuth, params, Some(refresh_token))
            .await
    }

    async fn confirm_user(&self, email: &str) -> Result<(), AuthError> {
        self.client
            .admin_confirm_sign_up()
            .user_pool_id(&self.user_pool_id)
            .username(email)
            .send()
            .await
            .map_err(|e| AuthError::Cognito(e.into_service_error().to_string()))?;

        info!(email, "user confirmed");
        Ok(())
    }

    async fn disable_user(&self, email: &str) -> Result<(), AuthError> {
        self.client
            .admin_disable_user()
            .user_pool_id(&self.user_pool_id)
            .username(email)
            .send()
            .await
            .map_err(|e| AuthError::Cognito(e.into_service_error().to_string()))?;

        info!(email, "user disabled");
        Ok(())
    }

    async fn enable_user(&self, email: &str) -> Result<(), AuthError> {
        self.client
            .admin_enable_user()
            .user_pool_id(&self.user_pool_id)
            .username(email)
            .send()
            .await
            .map_err(|e| AuthError::Cognito(e.into_service_error().to_string()))?;

        info!(email, "user enabled");
        Ok(())
    }
}
