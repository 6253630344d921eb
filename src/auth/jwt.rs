use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{config::JwtConfig, state::AppState, store::UserRole};

/// Identity claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub id: Uuid,
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    name: String,
    role: UserRole,
    iat: usize,
    exp: usize,
}

/// JWT signing and verification keys plus the expiration window, built once
/// from config.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self::new(&secret, Duration::from_secs(ttl_minutes as u64 * 60))
    }
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Signs `payload` together with an issued-at / expiry pair.
    pub fn sign(&self, payload: &TokenPayload) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: payload.id,
            name: payload.name.clone(),
            role: payload.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %payload.id, "jwt signed");
        Ok(token)
    }

    /// Decoded payload, or `None` for a bad signature, a malformed token, or
    /// one past its expiry. Callers treat all three uniformly as
    /// unauthenticated.
    pub fn payload(&self, token: &str) -> Option<TokenPayload> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).ok()?;
        let Claims {
            sub, name, role, ..
        } = data.claims;
        Some(TokenPayload {
            id: sub,
            name,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(secret, Duration::from_secs(300))
    }

    fn payload() -> TokenPayload {
        TokenPayload {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            role: UserRole::Normal,
        }
    }

    #[test]
    fn sign_and_decode_roundtrip() {
        let keys = make_keys("dev-secret");
        let payload = payload();
        let token = keys.sign(&payload).expect("sign");
        let decoded = keys.payload(&token).expect("decode");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = make_keys("secret-a").sign(&payload()).expect("sign");
        assert!(make_keys("secret-b").payload(&token).is_none());
    }

    #[test]
    fn rejects_corrupted_token() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(&payload()).expect("sign");
        assert!(keys.payload(&format!("{token}x")).is_none());
        assert!(keys.payload("not.a.token").is_none());
        assert!(keys.payload("").is_none());
    }

    #[test]
    fn from_ref_builds_keys_from_config() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let payload = payload();
        let token = keys.sign(&payload).expect("sign");
        assert_eq!(keys.payload(&token), Some(payload));
    }

    #[test]
    fn rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            name: "Ana".into(),
            role: UserRole::Admin,
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.payload(&token).is_none());
    }
}
