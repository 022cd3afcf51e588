use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an administrator token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 tokens.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, expires_in_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in: Duration::days(expires_in_days),
        }
    }

    /// Token lifetime in seconds.
    pub fn expires_in_seconds(&self) -> i64 {
        self.expires_in.num_seconds()
    }

    pub fn create_jwt(
        &self,
        admin_id: Uuid,
        username: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: admin_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.expires_in).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    pub fn decode_jwt(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_claims() {
        let manager = JwtManager::new("unit-test-secret", 30);
        let admin_id = Uuid::new_v4();
        let token = manager.create_jwt(admin_id, "admin@gmail.com").unwrap();

        let claims = manager.decode_jwt(&token).unwrap();
        assert_eq!(claims.sub, admin_id);
        assert_eq!(claims.username, "admin@gmail.com");
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let issuer = JwtManager::new("secret-a", 30);
        let verifier = JwtManager::new("secret-b", 30);
        let token = issuer.create_jwt(Uuid::new_v4(), "admin").unwrap();
        assert!(verifier.decode_jwt(&token).is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let manager = JwtManager::new("secret", -2);
        let token = manager.create_jwt(Uuid::new_v4(), "admin").unwrap();
        assert!(manager.decode_jwt(&token).is_err());
    }
}
