use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::prelude::*;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::schema::{categories, products, reviews, users};

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(Sqlite))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub is_active: bool,
}

/// Body of both category create and update; update replaces every field.
#[derive(Insertable, AsChangeset, Validate, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = categories)]
#[diesel(treat_none_as_null = true)]
pub struct NewCategory {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub parent_id: Option<i32>,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(Sqlite))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub stock: i32,
    /// Mean grade of the active reviews, `None` until the product has one.
    pub rating: Option<f64>,
    pub category_id: i32,
    pub is_active: bool,
}

#[derive(Insertable, AsChangeset, Validate, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub struct NewProduct {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.01))]
    pub price: f64,
    #[validate(length(max = 200))]
    pub image_url: Option<String>,
    #[validate(range(min = 0))]
    pub stock: i32,
    pub category_id: i32,
}

#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    PartialEq,
)]
#[diesel(belongs_to(Product))]
#[diesel(belongs_to(User))]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(Sqlite))]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub comment: Option<String>,
    pub comment_date: NaiveDateTime,
    pub grade: i32,
    pub is_active: bool,
}

/// What a buyer submits; the author and date are filled in server side.
#[derive(Validate, Serialize, Deserialize, Debug, Clone)]
pub struct ReviewCreate {
    pub product_id: i32,
    pub comment: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub grade: i32,
}

#[derive(AsChangeset, Validate, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = reviews)]
#[diesel(treat_none_as_null = true)]
pub struct ReviewUpdate {
    pub comment: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub grade: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = reviews)]
pub struct NewReview {
    pub user_id: i32,
    pub product_id: i32,
    pub comment: Option<String>,
    pub comment_date: NaiveDateTime,
    pub grade: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Role::Buyer),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl ToSql<Text, Sqlite> for Role {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.as_str());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Role {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let raw = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(raw.parse()?)
    }
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(Sqlite))]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub role: Role,
    pub is_active: bool,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub role: Role,
}

/// Self-service sign-up. There is no role field: public accounts are always
/// buyers, admins are created by another admin.
#[derive(Validate, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}
