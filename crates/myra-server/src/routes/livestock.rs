use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use myra_core::models::LivestockIdentifier;

use crate::error::AppError;
use crate::state::AppState;

use super::numeric_path_param;

/// POST /api/v1/agreements/{agreementId}/livestockidentifier — reserved.
pub async fn create_livestock_identifier(
    State(_app): State<AppState>,
    Path(_agreement_id): Path<String>,
) -> impl IntoResponse {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(serde_json::json!({ "error": "not implemented yet" })),
    )
}

/// GET /api/v1/agreements/{agreementId}/livestockidentifier — all
/// identifiers registered under the agreement.
pub async fn list_livestock_identifiers(
    State(app): State<AppState>,
    Path(agreement_id): Path<String>,
) -> Result<Json<Vec<LivestockIdentifier>>, AppError> {
    let identifiers = LivestockIdentifier::find_for_agreement(&app.pool, &agreement_id).await?;
    Ok(Json(identifiers))
}

/// PUT /api/v1/agreements/{agreementId}/livestockidentifier/{id} —
/// partial update; 400 when the id is non-numeric or nothing matched.
pub async fn update_livestock_identifier(
    State(app): State<AppState>,
    Path((agreement_id, identifier_id)): Path<(String, String)>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<LivestockIdentifier>, AppError> {
    let identifier_id = numeric_path_param("livestockIdentifierId", &identifier_id)?;
    let values = body
        .as_object()
        .ok_or_else(|| AppError::bad_request("request body must be a JSON object"))?;

    let updated =
        LivestockIdentifier::update(&app.pool, &agreement_id, identifier_id, values).await?;
    Ok(Json(updated))
}
