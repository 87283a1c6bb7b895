//! Core domain layer for the bookshelf project.
//!
//! This crate holds the pure pieces of the system: entity types, typed
//! field patches, the repository traits storage backends implement, and
//! the auth primitives (password hashing, access tokens). It has no
//! knowledge of any concrete store or HTTP framework.

pub mod auth;
pub mod models;
pub mod storage;
