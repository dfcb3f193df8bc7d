//! Bearer token issue and verification (JWT)

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies tokens whose subject is the account email
pub struct TokenHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validity: Duration,
}

impl TokenHandler {
    /// Create a handler for an HMAC algorithm (`HS256`, `HS384` or `HS512`)
    pub fn new(secret: &str, algorithm: &str, validity_days: u32) -> Result<Self> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|e| Error::Token(format!("Unsupported algorithm '{}': {}", algorithm, e)))?;

        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(Error::Token(format!(
                "Algorithm {:?} is not a shared-secret algorithm",
                algorithm
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            validity: Duration::days(i64::from(validity_days)),
        })
    }

    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_at(subject, Utc::now())
    }

    pub(crate) fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.validity).timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| Error::Token(e.to_string()))
    }

    /// Verify signature and expiry, returning the subject
    pub fn verify(&self, token: &str) -> Result<String> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims.sub)
            .map_err(|e| Error::Token(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(secret: &str) -> TokenHandler {
        TokenHandler::new(secret, "HS256", 7).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = handler("secret");
        let token = tokens.issue("a@x.com").unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), "a@x.com");
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = handler("secret");
        let token = tokens
            .issue_at("a@x.com", Utc::now() - Duration::days(8))
            .unwrap();
        assert!(matches!(tokens.verify(&token), Err(Error::Token(_))));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = handler("other").issue("a@x.com").unwrap();
        assert!(matches!(handler("secret").verify(&token), Err(Error::Token(_))));
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(handler("secret").verify("not.a.token").is_err());
        assert!(handler("secret").verify("").is_err());
    }

    #[test]
    fn test_only_hmac_algorithms_accepted() {
        assert!(TokenHandler::new("s", "HS512", 1).is_ok());
        assert!(TokenHandler::new("s", "RS256", 1).is_err());
        assert!(TokenHandler::new("s", "none", 1).is_err());
    }
}
