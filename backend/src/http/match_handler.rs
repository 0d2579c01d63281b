use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::info;

use crate::api_error::ApiError;
use crate::http::{actor_id, AppState};
use crate::models::{Competition, CreateMatchDTO, UpdateResultDTO};

/// GET /api/matches
pub async fn list_matches(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let matches = state.match_service.list().await?;
    Ok(HttpResponse::Ok().json(matches))
}

/// POST /api/matches
/// Admin schedules a new match
pub async fn create_match(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateMatchDTO>,
) -> Result<impl Responder, ApiError> {
    let actor = actor_id(&req)?;

    info!(
        user_id = %actor,
        competition_id = %body.competition_id,
        opponent = %body.opponent,
        "Received match creation request"
    );

    let game = state.match_service.create(&actor, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(game))
}

/// DELETE /api/matches/{match_id}
pub async fn delete_match(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let actor = actor_id(&req)?;
    let match_id = path.into_inner();

    state.match_service.remove(&actor, &match_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// PUT /api/matches/{match_id}/result
/// Admin sets status, score and scorers
pub async fn update_result(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateResultDTO>,
) -> Result<impl Responder, ApiError> {
    let actor = actor_id(&req)?;
    let match_id = path.into_inner();

    info!(
        user_id = %actor,
        match_id = %match_id,
        status = %body.status,
        "Received match result update"
    );

    let game = state
        .match_service
        .update_result(&actor, &match_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(game))
}

/// POST /api/competitions
/// Admin registers or renames a competition
pub async fn save_competition(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<Competition>,
) -> Result<impl Responder, ApiError> {
    let actor = actor_id(&req)?;

    let competition = state
        .match_service
        .save_competition(&actor, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(competition))
}
