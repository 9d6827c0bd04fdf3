//! Bearer-token authentication: issuing and verifying JWTs and the
//! middleware that resolves the authenticated user for protected routes.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, models::UserID};

/// How long an issued token stays valid.
const TOKEN_DURATION: Duration = Duration::days(7);

/// The HS256 keys used to sign and verify tokens, derived from one shared
/// secret.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AuthKeys {
    /// Derive the signing and verification keys from `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl std::fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("AuthKeys").finish_non_exhaustive()
    }
}

/// The claims carried by an auth token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The authenticated user's ID.
    sub: i64,
    /// When the token was issued, as a unix timestamp.
    iat: i64,
    /// When the token expires, as a unix timestamp.
    exp: i64,
}

/// Create a signed bearer token for `user_id`, valid for one week.
pub fn encode_token(keys: &AuthKeys, user_id: UserID) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id.as_i64(),
        iat: now.unix_timestamp(),
        exp: (now + TOKEN_DURATION).unix_timestamp(),
    };

    jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|error| Error::Hashing(error.to_string()))
}

/// Verify a bearer token and extract the user ID.
///
/// An expired, malformed or tampered token produces
/// [Error::InvalidCredentials].
pub fn decode_token(keys: &AuthKeys, token: &str) -> Result<UserID, Error> {
    let token_data =
        jsonwebtoken::decode::<Claims>(token, &keys.decoding, &Validation::default())
            .map_err(|_| Error::InvalidCredentials)?;

    Ok(UserID::new(token_data.claims.sub))
}

/// The state needed for the auth middleware.
#[derive(Clone)]
pub struct AuthState {
    /// The keys used to verify bearer tokens.
    pub auth_keys: AuthKeys,
}

/// Middleware that checks for a valid bearer token in the Authorization
/// header.
///
/// On success the user ID is placed into request extensions and the request
/// proceeds; handlers receive it with
/// `Extension(user_id): Extension<UserID>`. Otherwise a 401 response is
/// returned.
pub async fn auth_guard(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    let user_id = match token.map(|token| decode_token(&state.auth_keys, token)) {
        Some(Ok(user_id)) => user_id,
        _ => return Error::InvalidCredentials.into_response(),
    };

    request.extensions_mut().insert(user_id);

    next.run(request).await
}
