use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use std::fmt;
use thiserror::Error;

use crate::modules::security::core::claims::Claims;
use crate::modules::security::core::identity::Principal;

const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Clone)]
pub struct TokenValidationParameters {
    pub signing_key: Vec<u8>,
    pub issuer: String,
    pub audience: String,
    pub leeway_secs: u64,
}

impl TokenValidationParameters {
    pub fn new(secret: &str, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            signing_key: secret.as_bytes().to_vec(),
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_secs: 0,
        }
    }
}

impl fmt::Debug for TokenValidationParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenValidationParameters")
            .field("signing_key", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token is empty")]
    Empty,

    #[error("token algorithm {0:?} is not accepted")]
    UnsupportedAlgorithm(Algorithm),

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Verifies HMAC-signed bearer tokens. Unsigned tokens are never accepted.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(parameters: &TokenValidationParameters) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.set_issuer(&[parameters.issuer.as_str()]);
        validation.set_audience(&[parameters.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = parameters.leeway_secs;
        Self {
            decoding_key: DecodingKey::from_secret(&parameters.signing_key),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Principal, VerifyError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(VerifyError::Empty);
        }
        let header = jsonwebtoken::decode_header(token)?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            return Err(VerifyError::UnsupportedAlgorithm(header.alg));
        }
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(Principal {
            claims: data.claims,
            token: token.to_string(),
        })
    }
}
