//! PostgreSQL data source integration
//!
//! Both the account system and the customer system speak the PostgreSQL
//! protocol. Each gets its own `deadpool-postgres` pool.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::{PostgresConnection, PostgresConnector};
pub use client::PostgresSourceClient;
