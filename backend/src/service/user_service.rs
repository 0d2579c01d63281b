use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::api_error::ApiError;
use crate::models::{InviteUserDTO, User};
use crate::store::BolaoStore;

/// Fetch the acting user and require the admin role
pub(crate) async fn require_admin(
    store: &dyn BolaoStore,
    actor_id: &str,
    action: &str,
) -> Result<User, ApiError> {
    let actor = store
        .fetch_user(actor_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if !actor.is_admin() {
        warn!(user_id = %actor_id, role = %actor.role, action = %action, "Non-admin attempted an admin action");
        return Err(ApiError::forbidden(format!("Only admins can {}", action)));
    }

    Ok(actor)
}

/// User Service - participant invitations
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn BolaoStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn BolaoStore>) -> Self {
        Self { store }
    }

    /// Register a user by email (admin only). The id is derived from the
    /// email, so inviting the same address twice is a conflict.
    pub async fn invite(&self, actor_id: &str, dto: InviteUserDTO) -> Result<User, ApiError> {
        require_admin(self.store.as_ref(), actor_id, "invite users").await?;
        dto.validate()?;

        let user = User::from(dto);
        if self.store.fetch_user(&user.id).await?.is_some() {
            return Err(ApiError::conflict(format!("User {} already exists", user.email)));
        }

        self.store.save_user(&user).await?;

        info!(
            user_id = %user.id,
            role = %user.role,
            invited_by = %actor_id,
            "User invited"
        );

        Ok(user)
    }
}
