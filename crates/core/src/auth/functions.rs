use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::{AuthError, Claims, Result};

/// Creates a signed HS256 access token for the given user.
pub fn create_access_token(user_id: Uuid, secret: &[u8], expires_in: Duration) -> Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + expires_in).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenCreation(e.to_string()))
}

/// Decodes and validates an access token, returning its claims.
///
/// Expiry is validated as part of decoding; an expired or tampered token
/// fails with `InvalidToken`.
pub fn decode_access_token(token: &str, secret: &[u8]) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

/// Hashes a plain-text password into a salted PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Verifies a plain-text password against a stored PHC hash.
///
/// An unparseable stored hash verifies as false rather than erroring;
/// the caller cannot do anything useful with the distinction.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    match PasswordHash::new(hashed) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key";

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("changethis").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("changethis", &hash));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("changethis").unwrap();
        assert!(!verify_password("not-the-password", &hash));
    }

    #[test]
    fn hashing_salts_independently() {
        let a = hash_password("changethis").unwrap();
        let b = hash_password("changethis").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_verifies_as_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn token_round_trip_preserves_subject() {
        let user_id = Uuid::new_v4();
        let token = create_access_token(user_id, SECRET, Duration::minutes(5)).unwrap();
        let claims = decode_access_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token =
            create_access_token(Uuid::new_v4(), SECRET, Duration::minutes(-5)).unwrap();
        assert!(matches!(
            decode_access_token(&token, SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token =
            create_access_token(Uuid::new_v4(), b"other-secret", Duration::minutes(5)).unwrap();
        assert!(matches!(
            decode_access_token(&token, SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(matches!(
            decode_access_token("not.a.token", SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
