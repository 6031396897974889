use std::env;

use anyhow::Context;

use crate::session::SessionUser;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./hexmarket.sqlite?mode=rwc";
pub const DEFAULT_SESSION_COOKIE: &str = "ba_session";

/// Per-IP token bucket applied to the API routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub run_migrations: bool,
    pub session_cookie: String,
    pub demo_user: SessionUser,
    pub rate_limit: Option<RateLimit>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            run_migrations: true,
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            demo_user: SessionUser::demo(),
            rate_limit: Some(RateLimit { per_second: 2, burst: 30 }),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment. Call `dotenvy::dotenv()` first
    /// if a `.env` file should be honoured.
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        // empty DATABASE_URL is treated as unset
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.database_url);

        let mut demo_user = defaults.demo_user;
        if let Ok(id) = env::var("DEMO_USER_ID") {
            demo_user.id = id;
        }
        if let Ok(email) = env::var("DEMO_USER_EMAIL") {
            demo_user.email = email;
        }

        let per_second: u64 = parse_var("RATE_LIMIT_PER_SECOND", 2)?;
        let burst: u32 = parse_var("RATE_LIMIT_BURST", 30)?;
        let rate_limit = if per_second == 0 || burst == 0 {
            None
        } else {
            Some(RateLimit { per_second, burst })
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            database_url,
            run_migrations: parse_var("RUN_MIGRATIONS", defaults.run_migrations)?,
            session_cookie: env::var("SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            demo_user,
            rate_limit,
        })
    }

    /// Configuration for tests: private in-memory database, no rate limiting.
    pub fn for_tests() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            rate_limit: None,
            ..Config::default()
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        _ => Ok(default),
    }
}
