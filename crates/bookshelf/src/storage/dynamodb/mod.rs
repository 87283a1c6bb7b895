//! DynamoDB storage backend implementation.
//!
//! This module provides the DynamoDB-based implementation of the
//! repository traits using `aws-sdk-dynamodb`, together with the
//! connection manager and the idempotent schema provisioner that run at
//! startup.

mod connection;
mod conversions;
mod error;
mod expression;
mod provision;
mod repository;
mod retry;

pub use connection::{ConnectionManager, ConnectionSettings};
pub use provision::{required_tables, SchemaProvisioner};
pub use repository::DynamoRepository;
