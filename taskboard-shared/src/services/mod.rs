/// Business operations
///
/// Each service validates its request records, enforces the uniqueness,
/// ownership and state rules of its entities, and talks to storage only
/// through a shared [`Repository`](crate::repository::Repository) handle.
///
/// - `user`: create, list, describe and update users; list a team's members
/// - `team`: create, list and update teams; add and remove members
/// - `board`: boards, tasks and board reports

pub mod board;
pub mod team;
pub mod user;

pub use board::{BoardExport, BoardService};
pub use team::TeamService;
pub use user::UserService;
