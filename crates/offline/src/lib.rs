//! `granja-offline`
//!
//! **Responsibility:** the local store the capture sheets write to.
//!
//! This crate provides:
//! - A SQLite-backed store (lazy connection, idempotent upserts, read-back)
//! - An in-memory store for tests and development
//! - Store location configuration from the environment

pub mod config;
pub mod memory;
pub mod sqlite;

pub use config::{StoreConfig, StoreLocation};
pub use memory::{InMemoryRecordStore, StoredRow};
pub use sqlite::SqliteRecordStore;
