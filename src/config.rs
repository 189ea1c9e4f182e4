//! Token signing parameters supplied by the host application.
//! No config framework here: the host hands us a filled struct, or the
//! env helper picks the values up the same way the server binaries do.

use std::env;

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Read-only JWT validation/issuance inputs: symmetric signing key plus the
/// audience and issuer every accepted token must carry.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub key: String,
    pub audience: String,
    pub issuer: String,
    pub ttl_secs: i64,
}

impl JwtSettings {
    pub fn new(key: impl Into<String>, audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self { key: key.into(), audience: audience.into(), issuer: issuer.into(), ttl_secs: DEFAULT_TOKEN_TTL_SECS }
    }

    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Pick settings up from the environment (CAMPUSLINK_JWT_KEY,
    /// CAMPUSLINK_JWT_AUDIENCE, CAMPUSLINK_JWT_ISSUER, CAMPUSLINK_JWT_TTL_SECS).
    pub fn from_env() -> Self {
        let key = env::var("CAMPUSLINK_JWT_KEY").unwrap_or_default();
        let audience = env::var("CAMPUSLINK_JWT_AUDIENCE").unwrap_or_else(|_| "campuslink".to_string());
        let issuer = env::var("CAMPUSLINK_JWT_ISSUER").unwrap_or_else(|_| "campuslink".to_string());
        let ttl_secs = env::var("CAMPUSLINK_JWT_TTL_SECS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        Self { key, audience, issuer, ttl_secs }
    }
}
