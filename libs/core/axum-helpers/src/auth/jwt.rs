use super::config::JwtConfig;
use crate::errors::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

const TOKEN_MISSING_OR_INVALID: &str = "token missing or invalid";

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Identity proven by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub user_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Token absent, badly signed, malformed or expired
    #[error("{0}")]
    InvalidToken(String),

    /// Token verified but carries no usable user id
    #[error("token missing or invalid")]
    MissingSubject,

    #[error("failed to issue token: {0}")]
    Issue(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        let message = match err.kind() {
            ErrorKind::ExpiredSignature => "jwt expired",
            ErrorKind::InvalidSignature => "invalid signature",
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => "jwt malformed",
            _ => TOKEN_MISSING_OR_INVALID,
        };
        AuthError::InvalidToken(message.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) | AuthError::MissingSubject => {
                AppError::Unauthorized(err.to_string())
            }
            AuthError::Issue(msg) => AppError::InternalServerError(msg),
        }
    }
}

/// HS256 token issuer and verifier sharing one secret.
#[derive(Clone)]
pub struct JwtAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(ttl_secs = config.ttl_secs, "JWT auth initialized");
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::seconds(config.ttl_secs),
        }
    }

    /// Issue an access token for a user.
    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: Some(user_id.to_string()),
            username: Some(username.to_string()),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims with the configured secret.
    pub fn sign(&self, claims: &JwtClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| AuthError::Issue(e.to_string()))
    }

    /// Check signature and expiry, returning the decoded claims.
    pub fn decode_claims(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<JwtClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Verify an optional raw token and resolve the subject's user id.
    pub fn verify(&self, token: Option<&str>) -> Result<Subject, AuthError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::InvalidToken(TOKEN_MISSING_OR_INVALID.to_string()))?;

        let claims = self.decode_claims(token)?;
        let user_id = claims
            .sub
            .as_deref()
            .and_then(|sub| Uuid::parse_str(sub).ok())
            .ok_or(AuthError::MissingSubject)?;

        Ok(Subject { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("unit-test-secret-that-is-long-enough!!"))
    }

    fn claims(sub: Option<String>, exp_offset: i64) -> JwtClaims {
        let now = Utc::now().timestamp();
        JwtClaims {
            sub,
            username: Some("root".to_string()),
            exp: now + exp_offset,
            iat: now,
        }
    }

    #[test]
    fn test_issue_then_verify_yields_subject() {
        let auth = auth();
        let user_id = Uuid::now_v7();
        let token = auth.issue(user_id, "root").unwrap();

        let subject = auth.verify(Some(&token)).unwrap();
        assert_eq!(subject.user_id, user_id);

        let decoded = auth.decode_claims(&token).unwrap();
        assert_eq!(decoded.username.as_deref(), Some("root"));
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn test_missing_token_is_invalid() {
        let err = auth().verify(None).unwrap_err();
        assert_eq!(err, AuthError::InvalidToken("token missing or invalid".into()));
        assert!(auth().verify(Some("")).is_err());
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let other = JwtAuth::new(&JwtConfig::new("another-secret-that-is-also-long-enough"));
        let token = other.issue(Uuid::now_v7(), "root").unwrap();

        let err = auth().verify(Some(&token)).unwrap_err();
        assert_eq!(err.to_string(), "invalid signature");
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let auth = auth();
        let token = auth
            .sign(&claims(Some(Uuid::now_v7().to_string()), -3600))
            .unwrap();

        let err = auth.verify(Some(&token)).unwrap_err();
        assert_eq!(err.to_string(), "jwt expired");
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = auth().verify(Some("not.a.jwt")).unwrap_err();
        assert_eq!(err.to_string(), "jwt malformed");
    }

    #[test]
    fn test_token_without_subject_is_unauthorized() {
        let auth = auth();
        let token = auth.sign(&claims(None, 3600)).unwrap();
        assert_eq!(auth.verify(Some(&token)).unwrap_err(), AuthError::MissingSubject);

        let token = auth.sign(&claims(Some("root".into()), 3600)).unwrap();
        assert_eq!(auth.verify(Some(&token)).unwrap_err(), AuthError::MissingSubject);
    }

    #[test]
    fn test_auth_errors_map_to_401() {
        assert!(matches!(
            AppError::from(AuthError::MissingSubject),
            AppError::Unauthorized(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::Issue("boom".into())),
            AppError::InternalServerError(_)
        ));
    }
}
