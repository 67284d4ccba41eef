use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::engine::DEFAULT_MAX_SEATS_PER_BOOKING;
use crate::error::{AppError, AppResult};

/// Value of `USERS_PATH` that keeps accounts in memory only.
pub const MEMORY_STORE: &str = "memory";

#[derive(Clone, Debug)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub users_path: String,
    pub trains_path: Option<PathBuf>,
    pub max_seats_per_booking: usize,
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| AppError::Config("JWT_SECRET must be set".to_string()))?,
            jwt_expiration_hours: parse_var("JWT_EXPIRATION_HOURS", 24)?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: parse_var("SERVER_PORT", 3000)?,
            users_path: env::var("USERS_PATH")
                .unwrap_or_else(|_| "data/users.json".to_string()),
            trains_path: env::var("TRAINS_PATH").ok().map(PathBuf::from),
            max_seats_per_booking: parse_var(
                "MAX_SEATS_PER_BOOKING",
                DEFAULT_MAX_SEATS_PER_BOOKING,
            )?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => parse_value(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", name, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("SERVER_PORT", " 8080 ").unwrap(), 8080);
        assert!(matches!(
            parse_value::<u16>("SERVER_PORT", "eighty"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_server_addr() {
        let config = Config {
            jwt_secret: "secret".to_string(),
            jwt_expiration_hours: 24,
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            users_path: MEMORY_STORE.to_string(),
            trains_path: None,
            max_seats_per_booking: 4,
        };
        assert_eq!(config.server_addr(), "127.0.0.1:3000");
    }
}
