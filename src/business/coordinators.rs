use std::sync::Arc;

use uuid::Uuid;

use crate::config::JwtSettings;
use crate::domain::Coordinator;
use crate::error::{AppError, AppResult};
use crate::identity::{issue_token, CoordinatorAuth, UserRole};

use super::repos::CoordinatorRepository;

pub struct CoordinatorService {
    coordinators: Arc<dyn CoordinatorRepository>,
    jwt: JwtSettings,
}

impl CoordinatorService {
    pub fn new(coordinators: Arc<dyn CoordinatorRepository>, jwt: JwtSettings) -> Self {
        Self { coordinators, jwt }
    }

    /// Login lookup: find the coordinator by email and issue a signed token.
    pub async fn auth(&self, email: &str) -> AppResult<CoordinatorAuth> {
        let coordinator = self
            .coordinators
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("coordinator_not_found", "no coordinator with that email"))?;

        let token = issue_token(&self.jwt, coordinator.coordinator_id, UserRole::Coordinator)?;

        Ok(CoordinatorAuth {
            coordinator_id: coordinator.coordinator_id,
            name: coordinator.name,
            email: coordinator.email,
            course_id: coordinator.course_id,
            token,
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Coordinator> {
        self.coordinators
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("coordinator_not_found", "no coordinator with that id"))
    }
}
