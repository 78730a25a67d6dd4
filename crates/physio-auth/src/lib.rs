//! physio-auth
//!
//! Cognito sign-up, sign-in and admin approval actions, plus JWT
//! validation for API requests.

pub mod client;
pub mod error;
pub mod identity;
pub mod jwt;

pub use identity::{AuthTokens, CognitoIdentity, IdentityProvider};
pub use jwt::{Claims, TokenVerifier};
