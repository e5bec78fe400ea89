//! # Taskboard API Server Library
//!
//! HTTP surface of the Taskboard project-management backend: users, teams,
//! boards and tasks over JSON, plus plain-text board reports.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
