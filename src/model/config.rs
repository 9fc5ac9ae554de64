use std::env;

use clap::{Parser, command};

use crate::model::apperror::{ApplicationError, ErrorType};

/**
 * Environment variable holding the database connection string.
 */
const ENV_DB_URL: &str = "DB_URL";

/**
 * Environment variable holding the debug flag.
 */
const ENV_DEBUG: &str = "DEBUG";

/**
 * Command-line arguments for the application.
 */
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct ApplicationArguments {
    /**
     * Port the HTTP server listens on.
     */
    #[arg(short = 'p', long, default_value_t = 8080)]
    pub http_port: u16,
    /**
     * Number of server worker threads.
     */
    #[arg(short, long, default_value_t = 4)]
    pub workers: usize,
    /**
     * Maximum number of database connections in the pool.
     */
    #[arg(long, default_value_t = 5)]
    pub max_connections: u32,
}

/**
 * Application configuration, read from the environment once at startup and
 * fixed for the process lifetime. Passed by injection, never global.
 */
#[derive(Debug, Clone)]
pub struct AppConfig {
    /**
     * Database connection string.
     */
    pub database_url: String,
    /**
     * Debug flag.
     */
    pub debug: bool,
}

impl AppConfig {
    /**
     * Builds the configuration from the process environment. A `.env` file in
     * the working directory is loaded first if present.
     *
     * # Returns
     * A `Result` containing the `AppConfig` or an `ApplicationError` if `DB_URL` is missing.
     */
    pub fn from_env() -> Result<Self, ApplicationError> {
        dotenv::dotenv().ok();
        let database_url = env::var(ENV_DB_URL).map_err(|_err| ApplicationError::new(ErrorType::Initialization, format!("Missing required environment variable {ENV_DB_URL}")))?;
        let debug = parse_debug_flag(env::var(ENV_DEBUG).ok());
        Ok(AppConfig { database_url, debug })
    }
}

/**
 * Parses the debug flag value. Accepts `true` and `1` in any casing, anything
 * else (including an unset variable) is false.
 *
 * # Arguments
 * `value`: The raw environment value, if set.
 *
 * # Returns
 * The parsed flag.
 */
fn parse_debug_flag(value: Option<String>) -> bool {
    match value {
        Some(value) => matches!(value.trim().to_lowercase().as_str(), "true" | "1"),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_debug_flag_true_variants() {
        assert!(parse_debug_flag(Some("True".to_string())));
        assert!(parse_debug_flag(Some("true".to_string())));
        assert!(parse_debug_flag(Some("TRUE".to_string())));
        assert!(parse_debug_flag(Some("1".to_string())));
        assert!(parse_debug_flag(Some(" true ".to_string())));
    }

    #[test]
    fn test_parse_debug_flag_false_variants() {
        assert!(!parse_debug_flag(Some("False".to_string())));
        assert!(!parse_debug_flag(Some("0".to_string())));
        assert!(!parse_debug_flag(Some("yes".to_string())));
        assert!(!parse_debug_flag(Some(String::new())));
        assert!(!parse_debug_flag(None));
    }
}
