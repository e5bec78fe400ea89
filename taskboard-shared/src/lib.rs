//! # Taskboard Shared Library
//!
//! Domain types, persistence and business rules for the Taskboard
//! project-management backend. The HTTP server lives in `taskboard-api`.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and embedded migrations (SQLite)
//! - `models`: Row types, request records and their SQL
//! - `repository`: The storage handle the services depend on
//! - `services`: User, team and board operations
//! - `export`: Board report rendering
//! - `error`: Service error kinds

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod repository;
pub mod services;
