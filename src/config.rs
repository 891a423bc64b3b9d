use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Empty means any origin is accepted.
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
}

impl Settings {
    /// Defaults, then `appsettings.*` if present, then `SHOP_<SECTION>__<KEY>`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        defaults()?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(
                Environment::with_prefix("SHOP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8000_i64)?
        .set_default("server.allowed_origins", Vec::<String>::new())?
        .set_default("database.url", "ecommerce.db")?
        .set_default("database.pool_size", 8_i64)?
        .set_default("database.busy_timeout_ms", 5000_i64)?
        .set_default("auth.jwt_secret", "change-me")?
        .set_default("auth.token_ttl_minutes", 30_i64)?
        .set_default("auth.bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))
}
