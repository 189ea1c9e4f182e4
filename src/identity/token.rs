//! JWT issuance and validation with the HS256 algorithm.
//!
//! Validity is a pure function of (signature, audience, issuer, expiration)
//! against the configured `JwtSettings`; there are no valid-forever tokens.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::error::{AppError, AppResult};

use super::principal::{Principal, UserRole};

/// Token validation failure modes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("invalid token signature")]
    Signature,
    #[error("token audience mismatch")]
    Audience,
    #[error("token issuer mismatch")]
    Issuer,
    #[error("missing required claim: {0}")]
    MissingClaim(String),
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        let code = match &err {
            TokenError::Expired => "token_expired",
            TokenError::Signature => "bad_signature",
            TokenError::Audience => "bad_audience",
            TokenError::Issuer => "bad_issuer",
            TokenError::MissingClaim(_) => "missing_claim",
            TokenError::Malformed(_) => "malformed_token",
        };
        AppError::auth(code.to_string(), err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub aud: String,
    pub iss: String,
    pub exp: i64,
}

/// Sign a token for `user_id` with the configured key, audience and issuer.
/// Expiry is `now + ttl_secs`.
pub fn issue_token(settings: &JwtSettings, user_id: Uuid, role: UserRole) -> AppResult<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        aud: settings.audience.clone(),
        iss: settings.issuer.clone(),
        exp: Utc::now().timestamp() + settings.ttl_secs,
    };
    let key = EncodingKey::from_secret(settings.key.as_bytes());
    encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(|e| AppError::internal("token_encode".to_string(), e.to_string()))
}

/// Validate a signed token and extract its principal. Signature, audience,
/// issuer and expiration are all mandatory; any mismatch is an error.
pub fn validate_token(settings: &JwtSettings, token: &str) -> Result<Principal, TokenError> {
    let key = DecodingKey::from_secret(settings.key.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_audience(&[settings.audience.as_str()]);
    validation.set_issuer(&[settings.issuer.as_str()]);
    validation.set_required_spec_claims(&["exp", "aud", "iss"]);

    let data: TokenData<Claims> = decode(token, &key, &validation).map_err(map_jwt_error)?;

    let user_id = Uuid::parse_str(&data.claims.sub)
        .map_err(|_| TokenError::MissingClaim("sub".to_string()))?;
    Ok(Principal { user_id, role: data.claims.role })
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::Signature,
        ErrorKind::InvalidAudience => TokenError::Audience,
        ErrorKind::InvalidIssuer => TokenError::Issuer,
        ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim(claim.to_string()),
        _ => TokenError::Malformed(err.to_string()),
    }
}
