use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::user::{Claims, User};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn generate_access_token(user: &User, tenant_id: &str, secret: &str, ttl: usize) -> String {
    let claims = Claims {
        user_id: user.id.clone(),
        sub: user.email.clone(),
        name: user.name.clone(),
        tenant_id: tenant_id.to_string(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let user = User {
            id: "u1".to_string(),
            email: "a@b.c".to_string(),
            name: "A B".to_string(),
        };
        let token = generate_access_token(&user, "demo", "test-secret", 900);
        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.tenant_id, "demo");
        assert_eq!(claims.name, "A B");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let user = User {
            id: "u1".to_string(),
            email: "a@b.c".to_string(),
            name: "A B".to_string(),
        };
        let token = generate_access_token(&user, "demo", "test-secret", 900);
        assert!(verify_token(&token, "other-secret").is_err());
    }
}
