use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use super::model::Claims;

const ACCESS_TOKEN_EXPIRY_SECONDS: i64 = 15 * 60; // 15 minutes

/// Generate access token (short-lived). Tokens are normally issued by the
/// identity provider; this is used by tooling and tests sharing the secret.
pub fn generate_access_token(
    user_id: &str,
    email: Option<&str>,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.map(str::to_string),
        exp: now + ACCESS_TOKEN_EXPIRY_SECONDS as usize,
        iat: now,
        token_type: "access".to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate and decode a token
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
