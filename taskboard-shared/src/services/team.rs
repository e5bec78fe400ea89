/// Team operations
///
/// Team names are fixed at creation. Membership changes are batched, skip
/// ids that don't resolve to users, and are capped at
/// [`MAX_USERS_PER_REQUEST`] ids per add request.

use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::models::membership::{TeamMembers, MAX_USERS_PER_REQUEST};
use crate::models::team::{CreateTeam, Team, UpdateTeam};
use crate::repository::Repository;

#[derive(Clone)]
pub struct TeamService {
    repo: Arc<dyn Repository>,
}

impl TeamService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Creates a team
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is missing or too long
    /// - `Conflict` if the name is taken
    /// - `Database` if the admin is not a user
    pub async fn create(&self, request: CreateTeam) -> ServiceResult<Team> {
        let input = request.into_valid()?;

        let team = self
            .repo
            .create_team(&input)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "Team name already exists"))?;

        tracing::info!(team_id = team.id, name = %team.name, admin = team.admin, "Created team");
        Ok(team)
    }

    pub async fn list(&self) -> ServiceResult<Vec<Team>> {
        let teams = self.repo.list_teams().await?;
        tracing::debug!(count = teams.len(), "Listed teams");
        Ok(teams)
    }

    /// Updates a team's description and admin
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is missing or too long
    /// - `Conflict` if the team doesn't exist or the name differs
    pub async fn update(&self, request: UpdateTeam) -> ServiceResult<Team> {
        let change = request.into_valid()?;

        match self.repo.find_team(change.id).await? {
            Some(team) if team.name == change.team.name => {}
            _ => {
                tracing::warn!(team_id = change.id, name = %change.team.name, "Rejected team name change");
                return Err(ServiceError::Conflict("Team name cannot be updated".to_string()));
            }
        }

        let updated = self
            .repo
            .update_team(change.id, &change.team.description, change.team.admin)
            .await?
            .ok_or_else(|| ServiceError::Conflict("Team name cannot be updated".to_string()))?;

        tracing::info!(team_id = updated.id, admin = updated.admin, "Updated team");
        Ok(updated)
    }

    /// Adds users to a team
    ///
    /// Returns the number of memberships created.
    ///
    /// # Errors
    ///
    /// - `LimitExceeded` if more than [`MAX_USERS_PER_REQUEST`] ids are given;
    ///   checked before anything else
    /// - `NotFound` if the team doesn't exist
    pub async fn add_users(&self, request: TeamMembers) -> ServiceResult<u64> {
        let batch = request.into_valid()?;

        if batch.user_ids.len() > MAX_USERS_PER_REQUEST {
            tracing::warn!(
                team_id = batch.team_id,
                requested = batch.user_ids.len(),
                "Rejected oversized membership batch"
            );
            return Err(ServiceError::LimitExceeded(format!(
                "more than {} users not allowed",
                MAX_USERS_PER_REQUEST
            )));
        }

        self.require_team(batch.team_id).await?;

        let added = self
            .repo
            .add_team_members(batch.team_id, &batch.user_ids)
            .await?;

        tracing::info!(
            team_id = batch.team_id,
            requested = batch.user_ids.len(),
            added,
            "Added users to team"
        );
        Ok(added)
    }

    /// Removes users from a team
    ///
    /// Returns the number of memberships removed. Ids that are not members
    /// are ignored.
    ///
    /// # Errors
    ///
    /// `NotFound` if the team doesn't exist.
    pub async fn remove_users(&self, request: TeamMembers) -> ServiceResult<u64> {
        let batch = request.into_valid()?;

        self.require_team(batch.team_id).await?;

        let removed = self
            .repo
            .remove_team_members(batch.team_id, &batch.user_ids)
            .await?;

        tracing::info!(
            team_id = batch.team_id,
            requested = batch.user_ids.len(),
            removed,
            "Removed users from team"
        );
        Ok(removed)
    }

    async fn require_team(&self, team_id: i64) -> ServiceResult<Team> {
        self.repo
            .find_team(team_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Team not found".to_string()))
    }
}
