use rust_decimal::Decimal;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Defaults applied to newly created bankrolls when the request omits
    // the corresponding field.
    pub default_max_bet_pct: Decimal,
    pub default_kelly_fraction: Decimal,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            default_max_bet_pct: env::var("DEFAULT_MAX_BET_PCT")
                .unwrap_or_else(|_| "0.05".into())
                .parse()
                .unwrap_or(crate::models::default_max_bet_pct()),
            default_kelly_fraction: env::var("DEFAULT_KELLY_FRACTION")
                .unwrap_or_else(|_| "0.25".into())
                .parse()
                .unwrap_or(crate::models::default_kelly_fraction()),
        })
    }
}
