/// User operations

use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::models::IdRequest;
use crate::repository::Repository;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn Repository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    /// Creates a user
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is missing or too long
    /// - `Conflict` if the user name is taken
    pub async fn create(&self, request: CreateUser) -> ServiceResult<User> {
        let input = request.into_valid()?;

        let user = self
            .repo
            .create_user(&input)
            .await
            .map_err(|e| ServiceError::conflict_on_unique(e, "User name already exists"))?;

        tracing::info!(user_id = user.id, user_name = %user.user_name, "Created user");
        Ok(user)
    }

    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        let users = self.repo.list_users().await?;
        tracing::debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    pub async fn describe(&self, request: IdRequest) -> ServiceResult<User> {
        let id = request.into_id()?;
        self.find(id).await
    }

    /// Looks up a user by id, `NotFound` if absent
    pub async fn find(&self, id: i64) -> ServiceResult<User> {
        self.repo
            .find_user(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Replaces a user's display name
    ///
    /// The request carries the user name as well; it must match the stored
    /// one, since user names are immutable.
    ///
    /// # Errors
    ///
    /// - `Validation` if a field is missing or too long
    /// - `Conflict` if the user doesn't exist or the user name differs
    pub async fn update(&self, request: UpdateUser) -> ServiceResult<User> {
        let change = request.into_valid()?;

        let current = self.repo.find_user(change.id).await?;
        let current = match current {
            Some(user) if user.user_name == change.user_name => user,
            _ => {
                tracing::warn!(
                    user_id = change.id,
                    user_name = %change.user_name,
                    "Rejected user name change"
                );
                return Err(ServiceError::Conflict("Username cannot be updated".to_string()));
            }
        };

        let updated = self
            .repo
            .update_user_display_name(current.id, &change.display_name)
            .await?
            .ok_or_else(|| ServiceError::Conflict("Username cannot be updated".to_string()))?;

        tracing::info!(user_id = updated.id, "Updated user display name");
        Ok(updated)
    }

    /// Lists the members of a team
    ///
    /// # Errors
    ///
    /// `NotFound` if the team doesn't exist.
    pub async fn list_team_users(&self, request: IdRequest) -> ServiceResult<Vec<User>> {
        let team_id = request.into_id()?;

        if self.repo.find_team(team_id).await?.is_none() {
            return Err(ServiceError::NotFound("Team not found".to_string()));
        }

        let users = self.repo.list_team_users(team_id).await?;
        tracing::debug!(team_id, count = users.len(), "Listed team users");
        Ok(users)
    }
}
