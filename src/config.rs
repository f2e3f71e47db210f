use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://feedback.db".to_string()),
            session_secret: env::var("SESSION_SECRET")
                .map_err(|_| ConfigError::MissingSessionSecret)?,
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", 24)?,
            hash_memory_kib: parse_var("HASH_MEMORY_KIB", argon2::Params::DEFAULT_M_COST)?,
            hash_iterations: parse_var("HASH_ITERATIONS", argon2::Params::DEFAULT_T_COST)?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidNumber(name)),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("SESSION_SECRET must be set")]
    MissingSessionSecret,
    #[error("{0} must be a number")]
    InvalidNumber(&'static str),
}
