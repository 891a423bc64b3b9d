use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use diesel::sqlite::SqliteConnection;
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AuthSettings;
use crate::db::active::SoftDelete;
use crate::db::models::{Role, User};
use crate::error::{ShopError, ShopResult};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub exp: i64,
    pub iat: i64,
}

pub fn hash_password(password: &str, cost: u32) -> ShopResult<String> {
    Ok(bcrypt::hash(password, cost)?)
}

pub fn verify_password(password: &str, hashed: &str) -> ShopResult<bool> {
    Ok(bcrypt::verify(password, hashed)?)
}

pub fn issue_token(settings: &AuthSettings, user: &User) -> ShopResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(settings.token_ttl_minutes)).timestamp(),
    };
    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )?)
}

pub fn decode_token(settings: &AuthSettings, token: &str) -> ShopResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Identity carried by a verified bearer token. The user row is loaded
/// separately with [`current_user`] because that needs a store connection.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i32,
}

impl AuthUser {
    fn from_request_parts(req: &HttpRequest) -> ShopResult<Self> {
        let settings = req
            .app_data::<web::Data<AuthSettings>>()
            .ok_or_else(|| ShopError::Internal("auth settings are not registered".into()))?;

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ShopError::unauthorized("Missing or invalid Authorization header"))?;

        let claims = decode_token(settings, token.trim())?;
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| ShopError::unauthorized("Malformed token subject"))?;
        Ok(AuthUser { user_id })
    }
}

impl FromRequest for AuthUser {
    type Error = ShopError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_request_parts(req))
    }
}

/// The acting user, provided the account is still active.
pub fn current_user(conn: &mut SqliteConnection, auth: &AuthUser) -> ShopResult<User> {
    User::find_active(conn, auth.user_id)?.ok_or_else(|| {
        debug!(user_id = auth.user_id, "token for unknown or inactive user");
        ShopError::unauthorized("Could not validate credentials")
    })
}

impl User {
    pub fn require_role(&self, role: Role) -> ShopResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(ShopError::forbidden(format!("Only users with role {role} may do this")))
        }
    }
}
