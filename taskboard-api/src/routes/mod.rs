/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User endpoints (create, list, describe, update, team members)
/// - `teams`: Team endpoints (create, list, update, membership)
/// - `boards`: Board and task endpoints, board export

pub mod boards;
pub mod health;
pub mod teams;
pub mod users;

use serde::{Deserialize, Serialize};

/// Body returned by every create endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    /// Server-assigned id
    pub id: i64,
}

/// Confirmation message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Outcome of a status-changing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}
