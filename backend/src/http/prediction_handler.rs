use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::info;

use crate::api_error::ApiError;
use crate::http::{actor_id, AppState};
use crate::models::SubmitPredictionDTO;

/// POST /api/matches/{match_id}/prediction
/// Create or replace the caller's prediction
pub async fn submit_prediction(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<SubmitPredictionDTO>,
) -> Result<impl Responder, ApiError> {
    let user_id = actor_id(&req)?;
    let match_id = path.into_inner();

    info!(user_id = %user_id, match_id = %match_id, "Received prediction");

    let prediction = state
        .prediction_service
        .submit(&user_id, &match_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(prediction))
}

/// GET /api/matches/{match_id}/predictions
pub async fn match_predictions(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let match_id = path.into_inner();
    let predictions = state.prediction_service.for_match(&match_id).await?;
    Ok(HttpResponse::Ok().json(predictions))
}

/// GET /api/users/{user_id}/predictions
pub async fn user_predictions(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let user_id = path.into_inner();
    let predictions = state.prediction_service.for_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(predictions))
}
