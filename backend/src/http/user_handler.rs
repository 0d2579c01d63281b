use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::info;

use crate::api_error::ApiError;
use crate::http::{actor_id, AppState};
use crate::models::InviteUserDTO;

/// POST /api/users
/// Admin invites a participant by email
pub async fn invite_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<InviteUserDTO>,
) -> Result<impl Responder, ApiError> {
    let actor = actor_id(&req)?;

    info!(user_id = %actor, role = %body.role, "Received user invitation");

    let user = state.user_service.invite(&actor, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(user))
}
