use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{info, warn};
use validator::Validate;

use crate::auth;
use crate::config::AuthSettings;
use crate::db::active;
use crate::db::models::{NewUser, RegisterRequest, Role, TokenResponse, User};
use crate::db::schema::users;
use crate::error::{ShopError, ShopResult};

/// Public sign-up. The account is always a buyer.
pub fn register(
    conn: &mut SqliteConnection,
    settings: &AuthSettings,
    input: RegisterRequest,
) -> ShopResult<User> {
    insert_user(conn, settings, input, Role::Buyer)
}

/// Admins only. The one way to obtain another admin account.
pub fn create_admin(
    conn: &mut SqliteConnection,
    settings: &AuthSettings,
    actor: &User,
    input: RegisterRequest,
) -> ShopResult<User> {
    actor.require_role(Role::Admin)?;
    let user = insert_user(conn, settings, input, Role::Admin)?;
    info!(user_id = user.id, admin_id = actor.id, "admin account created");
    Ok(user)
}

fn insert_user(
    conn: &mut SqliteConnection,
    settings: &AuthSettings,
    input: RegisterRequest,
    role: Role,
) -> ShopResult<User> {
    input.validate()?;
    let hashed_password = auth::hash_password(&input.password, settings.bcrypt_cost)?;
    conn.transaction::<_, ShopError, _>(|conn| {
        let taken = users::table
            .filter(users::email.eq(&input.email))
            .select(users::id)
            .first::<i32>(conn)
            .optional()?
            .is_some();
        if taken {
            return Err(ShopError::AlreadyExists("Email already registered".into()));
        }
        let user: User = diesel::insert_into(users::table)
            .values(NewUser {
                email: input.email,
                hashed_password,
                role,
            })
            .returning(User::as_returning())
            .get_result(conn)?;
        info!(user_id = user.id, role = %user.role, "user registered");
        Ok(user)
    })
}

pub fn login(
    conn: &mut SqliteConnection,
    settings: &AuthSettings,
    email: &str,
    password: &str,
) -> ShopResult<TokenResponse> {
    let user: Option<User> = users::table
        .filter(users::email.eq(email))
        .filter(users::is_active.eq(true))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    let user = match user {
        Some(user) if auth::verify_password(password, &user.hashed_password)? => user,
        _ => {
            warn!("failed login attempt");
            return Err(ShopError::unauthorized("Incorrect email or password"));
        }
    };

    Ok(TokenResponse {
        access_token: auth::issue_token(settings, &user)?,
        token_type: "bearer".into(),
    })
}

/// Admins only. Outstanding tokens stop working because `current_user`
/// ignores inactive accounts.
pub fn deactivate(conn: &mut SqliteConnection, actor: &User, id: i32) -> ShopResult<User> {
    actor.require_role(Role::Admin)?;
    let user = active::retire::<User>(conn, id)?;
    info!(user_id = id, admin_id = actor.id, "user marked inactive");
    Ok(user)
}
