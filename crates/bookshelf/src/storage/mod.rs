//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `bookshelf_core::storage`, selected at compile time via feature
//! flags.
//!
//! - `dynamodb` (default): DynamoDB backend using `aws-sdk-dynamodb`,
//!   with connection management and schema provisioning.
//! - `inmemory`: HashMap-backed store; always compiled for tests.

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(any(test, feature = "inmemory"))]
pub mod inmemory;
