use actix_web::{web, HttpResponse, Responder};
use tracing::debug;

use crate::api_error::ApiError;
use crate::http::AppState;

/// GET /api/ranking
pub async fn get_ranking(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let table = state.ranking_service.ranking().await?;
    debug!(entries = table.entries.len(), columns = table.columns.len(), "Ranking computed");
    Ok(HttpResponse::Ok().json(table))
}

/// GET /api/ranking/evolution
pub async fn get_evolution(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let chart = state.ranking_service.evolution().await?;
    Ok(HttpResponse::Ok().json(chart))
}

/// GET /api/ranking/participants/{user_id}
pub async fn get_participant(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let user_id = path.into_inner();
    let summary = state.ranking_service.participant(&user_id).await?;
    Ok(HttpResponse::Ok().json(summary))
}
