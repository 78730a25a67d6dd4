use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("user is not confirmed")]
    NotConfirmed,

    #[error("user already exists: {0}")]
    UserExists(String),

    #[error("challenge required: {0}")]
    ChallengeRequired(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("Cognito error: {0}")]
    Cognito(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}
