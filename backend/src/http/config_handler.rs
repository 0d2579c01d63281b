use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::api_error::ApiError;
use crate::http::{actor_id, AppState};
use crate::models::ScoringConfig;

/// GET /api/config
pub async fn get_config(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let config = state.config_service.load().await?;
    Ok(HttpResponse::Ok().json(config))
}

/// PUT /api/config
pub async fn update_config(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ScoringConfig>,
) -> Result<impl Responder, ApiError> {
    let actor = actor_id(&req)?;
    let config = state.config_service.save(&actor, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(config))
}
