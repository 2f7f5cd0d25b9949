use axum::extract::{Query, State};
use axum::Json;

use myra_core::models::Zone;
use myra_core::query::Filter;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub district_id: Option<i32>,
}

/// GET /api/v1/zones — all zones with their districts, optionally
/// filtered by district.
pub async fn list_zones(
    State(app): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Zone>>, AppError> {
    let mut filter = Filter::new();
    if let Some(district_id) = params.district_id {
        filter = filter.eq("ref_zone.district_id", district_id);
    }
    let zones = Zone::find(&app.pool, filter).await?;
    Ok(Json(zones))
}
