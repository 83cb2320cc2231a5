use std::env;

/// Upper bound for `CART_RETENTION_DAYS`, roughly ten years.
pub const MAX_CART_RETENTION_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub admin_email: String,
    pub cart_retention_days: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_ttl_hours = env::var("JWT_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .unwrap_or(24);
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string());
        let cart_retention_days = retention_days(env::var("CART_RETENTION_DAYS").ok());
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            jwt_ttl_hours,
            admin_email,
            cart_retention_days,
        })
    }
}

/// Non-positive or unparsable values fall back to 30 days; larger values
/// are capped at [`MAX_CART_RETENTION_DAYS`].
fn retention_days(raw: Option<String>) -> i64 {
    raw.and_then(|d| d.trim().parse::<i64>().ok())
        .filter(|d| *d > 0)
        .map(|d| d.min(MAX_CART_RETENTION_DAYS))
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_days_defaults_and_caps() {
        assert_eq!(retention_days(None), 30);
        assert_eq!(retention_days(Some("0".into())), 30);
        assert_eq!(retention_days(Some("abc".into())), 30);
        assert_eq!(retention_days(Some("7".into())), 7);
        assert_eq!(
            retention_days(Some(i64::MAX.to_string())),
            MAX_CART_RETENTION_DAYS
        );
    }
}
