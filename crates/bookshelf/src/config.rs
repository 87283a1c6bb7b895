use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Custom DynamoDB endpoint URL (for DynamoDB Local). `None` targets AWS.
    pub dynamodb_endpoint: Option<String>,
    /// AWS region (default: "us-east-1")
    pub dynamodb_region: String,
    /// Users table name (default: "users")
    pub users_table: String,
    /// Books table name (default: "books")
    pub books_table: String,
    /// Secret key for signing access tokens
    pub secret_key: String,
    /// Access token lifetime in minutes (default: 8 days)
    pub access_token_expire_minutes: i64,
    /// Email for the bootstrap superuser, created at startup if absent
    pub first_superuser: Option<String>,
    /// Password for the bootstrap superuser
    pub first_superuser_password: Option<String>,
    /// Connect timeout in seconds for store calls (default: 2)
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds for store calls (default: 5)
    pub read_timeout_secs: u64,
    /// Maximum connection acquisition attempts (default: 5)
    pub connect_max_attempts: usize,
    /// Wait between connection attempts in seconds (default: 2)
    pub connect_retry_wait_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNAMODB_ENDPOINT` - DynamoDB endpoint URL (unset: AWS)
    /// - `DYNAMODB_REGION` - AWS region (default: "us-east-1")
    /// - `USERS_TABLE` / `BOOKS_TABLE` - Table names (defaults: "users"/"books")
    /// - `SECRET_KEY` - Token signing secret (default: "changethis")
    /// - `ACCESS_TOKEN_EXPIRE_MINUTES` - Token lifetime (default: 11520)
    /// - `FIRST_SUPERUSER` / `FIRST_SUPERUSER_PASSWORD` - Bootstrap superuser
    /// - `DB_CONNECT_TIMEOUT_SECS` / `DB_READ_TIMEOUT_SECS` - Store timeouts
    /// - `DB_CONNECT_MAX_ATTEMPTS` / `DB_CONNECT_RETRY_WAIT_SECS` - Retry budget
    pub fn from_env() -> Self {
        Self {
            dynamodb_endpoint: env::var("DYNAMODB_ENDPOINT").ok(),
            dynamodb_region: env::var("DYNAMODB_REGION")
                .unwrap_or_else(|_| "us-east-1".to_string()),
            users_table: env::var("USERS_TABLE").unwrap_or_else(|_| "users".to_string()),
            books_table: env::var("BOOKS_TABLE").unwrap_or_else(|_| "books".to_string()),
            secret_key: env::var("SECRET_KEY").unwrap_or_else(|_| "changethis".to_string()),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60 * 24 * 8),
            first_superuser: env::var("FIRST_SUPERUSER").ok(),
            first_superuser_password: env::var("FIRST_SUPERUSER_PASSWORD").ok(),
            connect_timeout_secs: env::var("DB_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            read_timeout_secs: env::var("DB_READ_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            connect_max_attempts: env::var("DB_CONNECT_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            connect_retry_wait_secs: env::var("DB_CONNECT_RETRY_WAIT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
        }
    }

    /// Get the access token lifetime as a chrono Duration.
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }

    /// Get the connect timeout as a Duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get the read timeout as a Duration.
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Get the wait between connection attempts as a Duration.
    pub fn connect_retry_wait(&self) -> Duration {
        Duration::from_secs(self.connect_retry_wait_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_config() -> Config {
        Config {
            dynamodb_endpoint: None,
            dynamodb_region: "us-east-1".to_string(),
            users_table: "users".to_string(),
            books_table: "books".to_string(),
            secret_key: "changethis".to_string(),
            access_token_expire_minutes: 30,
            first_superuser: None,
            first_superuser_password: None,
            connect_timeout_secs: 2,
            read_timeout_secs: 5,
            connect_max_attempts: 5,
            connect_retry_wait_secs: 2,
        }
    }

    #[test]
    fn test_duration_conversions() {
        let config = bare_config();
        assert_eq!(config.access_token_ttl(), chrono::Duration::minutes(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(2));
        assert_eq!(config.read_timeout(), Duration::from_secs(5));
        assert_eq!(config.connect_retry_wait(), Duration::from_secs(2));
    }

    #[test]
    fn test_default_values() {
        env::remove_var("DYNAMODB_ENDPOINT");
        env::remove_var("DYNAMODB_REGION");
        env::remove_var("USERS_TABLE");
        env::remove_var("BOOKS_TABLE");
        env::remove_var("ACCESS_TOKEN_EXPIRE_MINUTES");
        env::remove_var("DB_CONNECT_MAX_ATTEMPTS");

        let config = Config::from_env();

        assert!(config.dynamodb_endpoint.is_none());
        assert_eq!(config.dynamodb_region, "us-east-1");
        assert_eq!(config.users_table, "users");
        assert_eq!(config.books_table, "books");
        assert_eq!(config.access_token_expire_minutes, 11_520);
        assert_eq!(config.connect_max_attempts, 5);
    }
}
