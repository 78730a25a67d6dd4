use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Claims read from an access or id token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub token_use: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Validates bearer tokens against a fixed key and issuer.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// RS256 tokens issued by a Cognito user pool. `public_key_pem` is the
    /// pool's signing key exported from its JWKS.
    pub fn cognito(public_key_pem: &[u8], user_pool_id: &str, region: &str) -> Result<Self, AuthError> {
        let issuer = format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}");
        let key = DecodingKey::from_rsa_pem(public_key_pem)?;
        Ok(Self::with_key(key, Algorithm::RS256, &issuer))
    }

    /// HS256 tokens signed with a shared secret, for local development.
    pub fn shared_secret(secret: &[u8], issuer: &str) -> Self {
        Self::with_key(DecodingKey::from_secret(secret), Algorithm::HS256, issuer)
    }

    fn with_key(key: DecodingKey, algorithm: Algorithm, issuer: &str) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.validate_exp = true;
        Self { key, validation }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;

        let token_use = &data.claims.token_use;
        if token_use != "access" && token_use != "id" {
            return Err(AuthError::InvalidToken(format!(
                "unexpected token_use: {token_use}"
            )));
        }

        Ok(data.claims)
    }
}
