/// Database layer for Taskboard
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `migrations`: Embedded schema migrations
///
/// Row types and their queries live in the `models` module at crate root level.

pub mod migrations;
pub mod pool;
