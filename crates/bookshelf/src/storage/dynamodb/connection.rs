//! Connection management for the DynamoDB client.
//!
//! The manager owns the single cached client handle for the process.
//! Acquisition retries on a bounded fixed-interval budget and verifies
//! the handle with a table listing before caching it. If startup
//! acquisition fails, the process keeps running: the next caller finding
//! the cache empty re-runs acquisition instead of failing permanently.

use std::time::Duration;

use aws_sdk_dynamodb::Client;
use tokio::sync::RwLock;

use bookshelf_core::storage::{RepositoryError, Result};

use super::retry::RetryPolicy;
use crate::config::Config;

/// Connection parameters for the DynamoDB client.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Custom endpoint URL (for DynamoDB Local). `None` targets AWS.
    pub endpoint_url: Option<String>,
    /// AWS region.
    pub region: String,
    /// Connect timeout per network call.
    pub connect_timeout: Duration,
    /// Read timeout per network call.
    pub read_timeout: Duration,
    /// Maximum acquisition attempts before surfacing a fatal error.
    pub max_attempts: usize,
    /// Fixed wait between acquisition attempts; also the backoff base
    /// for the verification retry.
    pub retry_wait: Duration,
}

impl ConnectionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            endpoint_url: config.dynamodb_endpoint.clone(),
            region: config.dynamodb_region.clone(),
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            max_attempts: config.connect_max_attempts,
            retry_wait: config.connect_retry_wait(),
        }
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

/// Process-wide owner of the cached DynamoDB client handle.
///
/// The cache is read-mostly: it is only ever reassigned under the write
/// lock, never mutated in place. Repositories borrow the manager and
/// call [`ConnectionManager::acquire`] per operation.
pub struct ConnectionManager {
    settings: ConnectionSettings,
    client: RwLock<Option<Client>>,
}

impl ConnectionManager {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            settings,
            client: RwLock::new(None),
        }
    }

    /// Returns the cached client, acquiring a fresh one if absent.
    ///
    /// Fails with `ConnectionFailed` only after exhausting the retry
    /// budget.
    pub async fn acquire(&self) -> Result<Client> {
        if let Some(client) = self.client.read().await.as_ref() {
            return Ok(client.clone());
        }

        let mut slot = self.client.write().await;
        // Re-check: another caller may have connected while we waited
        // for the write lock.
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = self.connect_with_retry().await?;
        *slot = Some(client.clone());
        Ok(client)
    }

    async fn connect_with_retry(&self) -> Result<Client> {
        let policy = RetryPolicy::fixed(self.settings.max_attempts, self.settings.retry_wait);
        let mut attempt = 0usize;

        policy
            .run(
                || {
                    attempt += 1;
                    let attempt = attempt;
                    async move {
                        tracing::info!(
                            store = %self.settings.target_display(),
                            attempt,
                            "connecting to DynamoDB"
                        );
                        self.connect_once().await.inspect_err(|err| {
                            tracing::warn!(error = %err, attempt, "connection attempt failed");
                        })
                    }
                },
                |err: &RepositoryError| matches!(err, RepositoryError::ConnectionFailed(_)),
            )
            .await
            .inspect_err(|err| {
                tracing::error!(
                    error = %err,
                    attempts = self.settings.max_attempts,
                    "exhausted connection retry budget"
                );
            })
    }

    async fn connect_once(&self) -> Result<Client> {
        let timeouts = aws_config::timeout::TimeoutConfig::builder()
            .connect_timeout(self.settings.connect_timeout)
            .read_timeout(self.settings.read_timeout)
            .build();

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(self.settings.region.clone()))
            .timeout_config(timeouts);

        if let Some(endpoint) = &self.settings.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let client = Client::new(&sdk_config);

        self.verify(&client).await?;
        Ok(client)
    }

    /// One lightweight table listing to confirm the handle is live.
    ///
    /// A timed-out listing gets exactly one more try, after an
    /// exponential backoff wait.
    async fn verify(&self, client: &Client) -> Result<()> {
        let policy = RetryPolicy::exponential(2, self.settings.retry_wait);

        policy
            .run(
                || async move {
                    client
                        .list_tables()
                        .limit(1)
                        .send()
                        .await
                        .map(|_| ())
                        .map_err(|err| {
                            tracing::warn!(error = %err, "table listing verification failed");
                            RepositoryError::ConnectionFailed(err.to_string())
                        })
                },
                |_err: &RepositoryError| true,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ConnectionSettings {
        ConnectionSettings {
            endpoint_url: Some("http://localhost:8000".to_string()),
            region: "us-east-1".to_string(),
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(5),
            max_attempts: 5,
            retry_wait: Duration::from_secs(2),
        }
    }

    #[test]
    fn target_display_names_local_endpoint() {
        assert_eq!(
            settings().target_display(),
            "Local DynamoDB (http://localhost:8000)"
        );
    }

    #[test]
    fn target_display_names_aws_region() {
        let mut settings = settings();
        settings.endpoint_url = None;
        assert_eq!(settings.target_display(), "AWS DynamoDB (region: us-east-1)");
    }

    #[test]
    fn settings_come_from_config() {
        let config = crate::config::Config {
            dynamodb_endpoint: Some("http://localhost:8000".to_string()),
            dynamodb_region: "eu-west-1".to_string(),
            users_table: "users".to_string(),
            books_table: "books".to_string(),
            secret_key: "s".to_string(),
            access_token_expire_minutes: 30,
            first_superuser: None,
            first_superuser_password: None,
            connect_timeout_secs: 3,
            read_timeout_secs: 7,
            connect_max_attempts: 9,
            connect_retry_wait_secs: 1,
        };

        let settings = ConnectionSettings::from_config(&config);

        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.connect_timeout, Duration::from_secs(3));
        assert_eq!(settings.read_timeout, Duration::from_secs(7));
        assert_eq!(settings.max_attempts, 9);
        assert_eq!(settings.retry_wait, Duration::from_secs(1));
    }
}
