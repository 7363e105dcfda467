use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::errors::error_body;

/// AuthError
///
/// Every way the authorization gate can reject a request. All variants except
/// `InsufficientPermissions` map to 401; a token that verified correctly but
/// lacks the required permission string maps to 403.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No Authorization header was present on the request.
    MissingHeader,
    /// The Authorization header was not of the form `Bearer <token>`.
    MalformedHeader,
    /// The token's key id is not among the provider's published keys.
    UnknownKey,
    /// The token's expiry timestamp is in the past.
    ExpiredToken,
    /// Signature or claim validation failed for any other reason.
    InvalidToken,
    /// The token verified, but its permissions list lacks the required scope.
    InsufficientPermissions,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization header is expected",
            AuthError::MalformedHeader => "authorization header must be a bearer token",
            AuthError::UnknownKey => "unable to find the appropriate key",
            AuthError::ExpiredToken => "token expired",
            AuthError::InvalidToken => "unable to parse authentication token",
            AuthError::InsufficientPermissions => "permission not found",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, error_body(status, self.message())).into_response()
    }
}

/// Claims
///
/// The decoded payload of a verified token. The identity provider attaches
/// the granted scopes as a `permissions` claim; tokens without one are
/// treated as having no permissions rather than rejected outright.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the provider's opaque identifier for the caller.
    pub sub: String,
    /// Expiration time (seconds since epoch). Validated during decode.
    pub exp: usize,
    /// Permission strings granted to this token (e.g. "post:drinks").
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Claims {
    /// Checks the permissions list for the required scope.
    /// Absence is a 403, not a 401: the caller is authenticated but not
    /// authorized for this action.
    pub fn require(&self, permission: &str) -> Result<(), AuthError> {
        if self.permissions.iter().any(|p| p == permission) {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermissions)
        }
    }
}

/// TokenVerifier
///
/// Abstract contract for verifying an externally-issued bearer token. The
/// production implementation talks to the identity provider's published key
/// set; tests substitute a mock. Held as `Arc<dyn TokenVerifier>` in the
/// application state, the same seam pattern as the repository.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verifies signature, expiry, issuer, and audience, returning the
    /// decoded claims on success.
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

/// The shared trait-object handle stored in the application state.
pub type AuthState = Arc<dyn TokenVerifier>;

/// parse_bearer
///
/// Extracts the raw token from an `Authorization` header value. The header
/// must consist of exactly two whitespace-separated parts with a
/// case-insensitive `Bearer` scheme.
pub fn parse_bearer(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    let token = parts.next().ok_or(AuthError::MalformedHeader)?;
    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

/// Claims Extractor Implementation
///
/// Makes `Claims` usable as a handler argument on any protected route. The
/// flow is: pull the verifier from state, extract the bearer token from the
/// Authorization header, and delegate verification. Rejection is an
/// `AuthError`, which renders the uniform error envelope.
///
/// The auth middleware stores the claims it decoded in the request
/// extensions, so a handler extracting `Claims` behind that layer reuses the
/// already-verified result instead of decoding the token a second time.
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<Claims>() {
            return Ok(claims.clone());
        }

        let verifier = AuthState::from_ref(state);

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingHeader)?;

        let token = parse_bearer(auth_header)?;

        verifier.verify(token).await
    }
}

/// JwksVerifier
///
/// Verifies RS256 tokens against the identity provider's published JWKS
/// (`https://{domain}/.well-known/jwks.json`). Decoding keys are cached by
/// key id; a token referencing an unseen `kid` triggers a single refetch
/// before being rejected, which covers provider key rotation.
pub struct JwksVerifier {
    http: reqwest::Client,
    jwks_url: String,
    issuer: String,
    audience: String,
    keys: RwLock<HashMap<String, DecodingKey>>,
}

/// Subset of a JWK that RS256 verification needs.
#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

impl JwksVerifier {
    /// Constructs a verifier for the given provider domain and API audience.
    /// No network call happens here; keys are fetched lazily on first use.
    pub fn new(domain: &str, audience: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            jwks_url: format!("https://{}/.well-known/jwks.json", domain),
            issuer: format!("https://{}/", domain),
            audience: audience.to_string(),
            keys: RwLock::new(HashMap::new()),
        }
    }

    /// Refetches the provider's key set and replaces the cache.
    async fn refresh_keys(&self) -> Result<(), AuthError> {
        let jwks: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("JWKS fetch failed: {:?}", e);
                AuthError::UnknownKey
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::error!("JWKS parse failed: {:?}", e);
                AuthError::UnknownKey
            })?;

        let mut cache = self.keys.write().await;
        cache.clear();
        for jwk in jwks.keys {
            if jwk.kty != "RSA" {
                continue;
            }
            match DecodingKey::from_rsa_components(&jwk.n, &jwk.e) {
                Ok(key) => {
                    cache.insert(jwk.kid, key);
                }
                Err(e) => {
                    tracing::warn!("skipping unusable JWK {}: {:?}", jwk.kid, e);
                }
            }
        }
        Ok(())
    }

    /// Resolves the decoding key for a key id, refetching the JWKS once on a
    /// cache miss.
    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(key.clone());
        }

        self.refresh_keys().await?;

        self.keys
            .read()
            .await
            .get(kid)
            .cloned()
            .ok_or(AuthError::UnknownKey)
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        // The token header carries the id of the signing key.
        let header = decode_header(token).map_err(|_| AuthError::InvalidToken)?;
        let kid = header.kid.ok_or(AuthError::UnknownKey)?;

        let key = self.key_for(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;

        match decode::<Claims>(token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(AuthError::ExpiredToken),
                _ => Err(AuthError::InvalidToken),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_parsing_accepts_standard_header() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Ok("abc.def.ghi"));
        // Scheme comparison is case-insensitive.
        assert_eq!(parse_bearer("bearer tok"), Ok("tok"));
    }

    #[test]
    fn bearer_parsing_rejects_malformed_headers() {
        assert_eq!(parse_bearer(""), Err(AuthError::MalformedHeader));
        assert_eq!(parse_bearer("Bearer"), Err(AuthError::MalformedHeader));
        assert_eq!(
            parse_bearer("Bearer one two"),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(
            parse_bearer("Basic dXNlcg=="),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn permission_check_distinguishes_absent_scope() {
        let claims = Claims {
            sub: "auth0|barista".into(),
            exp: 0,
            permissions: vec!["get:drinks-detail".into()],
        };
        assert!(claims.require("get:drinks-detail").is_ok());
        assert_eq!(
            claims.require("delete:drinks"),
            Err(AuthError::InsufficientPermissions)
        );
    }
}
