//! Idempotent schema provisioning.
//!
//! Lists existing tables and creates the missing ones, each with a
//! string primary key and the single secondary index its access pattern
//! needs. Safe to run on every process start; a table that already
//! exists is left untouched.

use std::sync::Arc;
use std::time::Duration;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;

use bookshelf_core::storage::{RepositoryError, Result};

use super::connection::ConnectionManager;

/// Index name for user lookup by email.
pub const EMAIL_INDEX: &str = "email_index";
/// Index name for book lookup by owner.
pub const OWNER_INDEX: &str = "owner_index";

/// Table creation is asynchronous on the store side; freshly created
/// tables are not guaranteed queryable the instant creation returns.
const TABLE_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Schema description for one table (pure data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub table_name: String,
    pub partition_key: &'static str,
    pub index: IndexSpec,
}

/// A global secondary index keyed on a single string attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub partition_key: &'static str,
}

/// Returns the canonical table specs for the two collections.
pub fn required_tables(users_table: &str, books_table: &str) -> Vec<TableSpec> {
    vec![
        TableSpec {
            table_name: users_table.to_string(),
            partition_key: "id",
            index: IndexSpec {
                name: EMAIL_INDEX,
                partition_key: "email",
            },
        },
        TableSpec {
            table_name: books_table.to_string(),
            partition_key: "id",
            index: IndexSpec {
                name: OWNER_INDEX,
                partition_key: "owner_id",
            },
        },
    ]
}

/// Pure function: which required tables are absent from the store.
pub fn missing_tables<'a>(existing: &[String], required: &'a [TableSpec]) -> Vec<&'a TableSpec> {
    required
        .iter()
        .filter(|spec| !existing.iter().any(|name| name == &spec.table_name))
        .collect()
}

/// Ensures the required tables and indexes exist.
pub struct SchemaProvisioner {
    conn: Arc<ConnectionManager>,
    tables: Vec<TableSpec>,
}

impl SchemaProvisioner {
    pub fn new(conn: Arc<ConnectionManager>, tables: Vec<TableSpec>) -> Self {
        Self { conn, tables }
    }

    /// Creates whatever is missing; fails with `ProvisionFailed` only
    /// for a creation failure other than "already exists".
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.conn.acquire().await?;

        let existing = list_table_names(&client).await?;
        tracing::info!(tables = ?existing, "existing tables");

        for spec in missing_tables(&existing, &self.tables) {
            tracing::info!(table = %spec.table_name, "creating table");
            if create_table(&client, spec).await? {
                // Give the asynchronous create a moment before anyone
                // queries the new table.
                tokio::time::sleep(TABLE_SETTLE_DELAY).await;
            }
        }

        Ok(())
    }
}

async fn list_table_names(client: &Client) -> Result<Vec<String>> {
    client
        .list_tables()
        .send()
        .await
        .map(|output| output.table_names.unwrap_or_default())
        .map_err(|err| RepositoryError::ConnectionFailed(err.to_string()))
}

/// Creates the table; returns false if it already existed (a race with
/// another instance provisioning concurrently).
async fn create_table(client: &Client, spec: &TableSpec) -> Result<bool> {
    let request = client
        .create_table()
        .table_name(&spec.table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name(spec.partition_key)
                .key_type(KeyType::Hash)
                .build()
                .map_err(|e| RepositoryError::ProvisionFailed(e.to_string()))?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(spec.partition_key)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| RepositoryError::ProvisionFailed(e.to_string()))?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name(spec.index.partition_key)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(|e| RepositoryError::ProvisionFailed(e.to_string()))?,
        )
        .global_secondary_indexes(
            GlobalSecondaryIndex::builder()
                .index_name(spec.index.name)
                .key_schema(
                    KeySchemaElement::builder()
                        .attribute_name(spec.index.partition_key)
                        .key_type(KeyType::Hash)
                        .build()
                        .map_err(|e| RepositoryError::ProvisionFailed(e.to_string()))?,
                )
                .projection(
                    Projection::builder()
                        .projection_type(ProjectionType::All)
                        .build(),
                )
                .build()
                .map_err(|e| RepositoryError::ProvisionFailed(e.to_string()))?,
        )
        .billing_mode(BillingMode::PayPerRequest);

    match request.send().await {
        Ok(_) => Ok(true),
        Err(err) => {
            let service_err = err.into_service_error();
            if service_err.is_resource_in_use_exception() {
                tracing::debug!(table = %spec.table_name, "table already exists");
                Ok(false)
            } else {
                Err(RepositoryError::ProvisionFailed(service_err.to_string()))
            }
        }
    }
}
