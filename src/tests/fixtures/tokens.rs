// Bearer token minting for tests.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};

pub const SECRET: &str = "fixture-signing-secret-0001";
pub const ISSUER: &str = "issuer";
pub const AUDIENCE: &str = "audience";

// base64url of {"alg":"none","typ":"JWT"}
const NONE_HEADER: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";

pub struct TokenBuilder {
    subject: String,
    name: Option<String>,
    permissions: Vec<String>,
    issuer: String,
    audience: String,
    secret: String,
    algorithm: Algorithm,
    expires_in_secs: i64,
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBuilder {
    pub fn new() -> Self {
        Self {
            subject: "user-fixed-0001".to_string(),
            name: None,
            permissions: Vec::new(),
            issuer: ISSUER.to_string(),
            audience: AUDIENCE.to_string(),
            secret: SECRET.to_string(),
            algorithm: Algorithm::HS256,
            expires_in_secs: 3600,
        }
    }

    pub fn subject(mut self, v: impl Into<String>) -> Self {
        self.subject = v.into();
        self
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.name = Some(v.into());
        self
    }

    pub fn permission(mut self, v: impl Into<String>) -> Self {
        self.permissions.push(v.into());
        self
    }

    pub fn issuer(mut self, v: impl Into<String>) -> Self {
        self.issuer = v.into();
        self
    }

    pub fn audience(mut self, v: impl Into<String>) -> Self {
        self.audience = v.into();
        self
    }

    pub fn secret(mut self, v: impl Into<String>) -> Self {
        self.secret = v.into();
        self
    }

    pub fn algorithm(mut self, v: Algorithm) -> Self {
        self.algorithm = v;
        self
    }

    pub fn expires_in_secs(mut self, v: i64) -> Self {
        self.expires_in_secs = v;
        self
    }

    fn claims(&self) -> Value {
        let now = chrono::Utc::now().timestamp();
        let mut claims = json!({
            "sub": self.subject,
            "iss": self.issuer,
            "aud": self.audience,
            "iat": now,
            "exp": now + self.expires_in_secs,
            "permission": self.permissions,
        });
        if let Some(name) = &self.name {
            claims["name"] = json!(name);
        }
        claims
    }

    pub fn build(&self) -> String {
        encode(
            &Header::new(self.algorithm),
            &self.claims(),
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .unwrap()
    }

    /// Same claims with `alg: none` and no signature.
    pub fn unsigned(&self) -> String {
        let signed = self.build();
        let payload = signed.split('.').nth(1).unwrap();
        format!("{NONE_HEADER}.{payload}.")
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.build())
    }
}
