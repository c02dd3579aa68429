use std::collections::HashMap;
use std::fmt::{self, Display};

use chrono::Duration;
use chrono::Local;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use jwt::{AlgorithmType, Header, SignWithKey, Token, VerifyWithKey};
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use super::permissions;

/// Failure taxonomy of the bearer-credential check. The kind-to-status
/// mapping is an observable contract of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    MissingOrMalformedHeader,
    InvalidHeader,
    TokenExpired,
    InvalidClaims,
    Unauthorized,
}

impl AuthErrorKind {
    fn default_status(self) -> u16 {
        match self {
            Self::MissingOrMalformedHeader => 401,
            Self::InvalidHeader => 401,
            Self::TokenExpired => 401,
            Self::InvalidClaims => 401,
            Self::Unauthorized => 403,
        }
    }

    pub fn new(self, message: &str) -> AuthError {
        self.with_status(self.default_status(), message)
    }

    pub fn with_status(self, status: u16, message: &str) -> AuthError {
        AuthError {
            kind: self,
            status,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub status: u16,
    pub message: String,
}

impl Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for AuthError {}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    iat: i64,
    exp: i64,
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    pub fn new(
        issuer: String,
        subject: String,
        audience: String,
        valid_for: Duration,
        permissions: Option<Vec<String>>,
    ) -> Self {
        let now = Local::now();

        Self {
            iss: issuer,
            sub: subject,
            aud: audience,
            iat: now.timestamp(),
            exp: (now + valid_for).timestamp(),
            permissions,
        }
    }

    pub fn is_expired(&self) -> bool {
        (self.exp - Local::now().timestamp()).is_negative()
    }
}

/// Verifies bearer credentials against the configured trusted-key set and
/// claim expectations. Built once at startup and shared across requests.
pub struct TokenVerifier {
    keys: HashMap<String, Hmac<Sha256>>,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new(
        issuer: String,
        audience: String,
        secrets: &HashMap<String, String>,
    ) -> Result<Self, InvalidLength> {
        let mut keys = HashMap::new();
        for (kid, secret) in secrets {
            keys.insert(kid.clone(), Hmac::new_from_slice(secret.as_bytes())?);
        }

        Ok(Self {
            keys,
            issuer,
            audience,
        })
    }

    /// Runs the full credential check for a protected operation. Every
    /// failure is terminal; the verified claims come back only when all
    /// steps pass.
    pub fn authorize(&self, header: Option<&str>, required: &str) -> Result<Claims, AuthError> {
        let token = extract_bearer(header)?;
        let claims = self.verify(token)?;
        permissions::check(&claims, required)?;

        Ok(claims)
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let unverified: Token<Header, Claims, _> = Token::parse_unverified(token)
            .map_err(|_| AuthErrorKind::InvalidHeader.new("Unable to decode authentication token"))?;

        let key = unverified
            .header()
            .key_id
            .as_deref()
            .and_then(|kid| self.keys.get(kid))
            .ok_or_else(|| AuthErrorKind::InvalidHeader.new("Unable to find an appropriate key"))?;

        let token = unverified.verify_with_key(key).map_err(|_| {
            AuthErrorKind::InvalidHeader.with_status(400, "Unable to parse authentication token")
        })?;

        let claims = token.claims();

        if claims.is_expired() {
            return Err(AuthErrorKind::TokenExpired.new("Token expired"));
        }

        if claims.aud != self.audience || claims.iss != self.issuer {
            return Err(AuthErrorKind::InvalidClaims
                .new("Incorrect claims; check the audience and issuer"));
        }

        Ok(claims.clone())
    }
}

fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or_else(|| {
        AuthErrorKind::MissingOrMalformedHeader.new("Authorization header is expected")
    })?;

    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthErrorKind::MissingOrMalformedHeader
            .new("Authorization header must be of the form \"Bearer <token>\"")),
    }
}

/// Mints a signed token for the given claims. Test and operator tooling;
/// the service itself only ever verifies.
pub fn generate_token(kid: &str, secret: &str, claims: Claims) -> String {
    let key: Hmac<Sha256> = Hmac::new_from_slice(secret.as_bytes()).unwrap();
    let header = Header {
        algorithm: AlgorithmType::Hs256,
        key_id: Some(kid.to_string()),
        ..Default::default()
    };

    Token::new(header, claims)
        .sign_with_key(&key)
        .unwrap()
        .as_str()
        .to_string()
}
