use axum::extract::{Path, Query, State};
use axum::Json;

use myra_core::models::{
    Agreement, ClientAssociation, GrazingSchedule, LivestockIdentifier, Pasture, Plan, RefRecord,
    Usage, Zone,
};
use myra_core::query::{Filter, Pagination};
use myra_core::transform::{transform_agreement, AgreementDto};
use myra_core::MyraError;

use crate::error::AppError;
use crate::state::AppState;

use super::numeric_body_value;

/// Load clients and produce the external shape for one agreement.
async fn to_dto(
    app: &AppState,
    agreement: &Agreement,
    client_types: &[RefRecord],
) -> Result<AgreementDto, AppError> {
    let clients = ClientAssociation::for_agreement(&app.pool, &agreement.forest_file_id).await?;
    Ok(transform_agreement(agreement, &clients, client_types))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub zone_id: Option<i32>,
}

/// GET /api/v1/agreements — list agreements, optionally scoped to a zone.
pub async fn list_agreements(
    State(app): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<AgreementDto>>, AppError> {
    let client_types = RefRecord::find_all(&app.pool, "ref_client_type").await?;

    let mut filter = Filter::new();
    if let Some(zone_id) = params.zone_id {
        filter = filter.eq("agreement.zone_id", zone_id);
    }
    let agreements = Agreement::find_with_type_zone_district(&app.pool, filter, None).await?;

    let mut out = Vec::with_capacity(agreements.len());
    for agreement in &agreements {
        out.push(to_dto(&app, agreement, &client_types).await?);
    }
    Ok(Json(out))
}

#[derive(serde::Deserialize)]
pub struct SearchParams {
    pub term: Option<String>,
    pub limit: Option<i64>,
    pub page: Option<i64>,
}

/// GET /api/v1/agreements/search?term=&limit=&page= — search by RAN, zone
/// contact name, or client name. An empty term matches everything.
pub async fn search_agreements(
    State(app): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let term = params.term.unwrap_or_default();
    let limit = params.limit.unwrap_or(10);
    let page = params.page.unwrap_or(1);
    if limit <= 0 || page < 1 {
        return Err(AppError::bad_request(
            "limit must be positive and page must be at least 1",
        ));
    }
    let pagination = Pagination { page, limit };

    let client_types = RefRecord::find_all(&app.pool, "ref_client_type").await?;
    let (total_count, forest_file_ids) = Agreement::search(&app.pool, &term, pagination).await?;

    let mut agreements = Vec::with_capacity(forest_file_ids.len());
    for forest_file_id in &forest_file_ids {
        if let Some(agreement) = Agreement::find_by_id(&app.pool, forest_file_id).await? {
            agreements.push(to_dto(&app, &agreement, &client_types).await?);
        }
    }

    let total_page = (total_count + limit - 1) / limit;
    Ok(Json(serde_json::json!({
        "perPage": limit,
        "currentPage": page,
        "totalPage": total_page.max(1),
        "agreements": agreements,
    })))
}

/// GET /api/v1/agreements/{id} — single agreement by RAN, with its plans,
/// usage, livestock identifiers, pastures, and grazing schedules attached.
pub async fn get_agreement(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AgreementDto>, AppError> {
    let client_types = RefRecord::find_all(&app.pool, "ref_client_type").await?;
    let agreement = Agreement::find_by_id(&app.pool, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Not found"))?;

    let mut dto = to_dto(&app, &agreement, &client_types).await?;
    dto.plans = Some(Plan::for_agreement(&app.pool, &id).await?);
    dto.usage = Some(Usage::for_agreement(&app.pool, &id).await?);
    dto.livestock_identifiers =
        Some(LivestockIdentifier::find_for_agreement(&app.pool, &id).await?);
    dto.grazing_schedules = Some(GrazingSchedule::for_agreement(&app.pool, &id).await?);
    dto.pastures = Some(Pasture::for_agreement(&app.pool, &id).await?);
    Ok(Json(dto))
}

/// PUT /api/v1/agreements/{id} — partial update of the updatable columns,
/// returning the refreshed joined representation.
pub async fn update_agreement(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<AgreementDto>, AppError> {
    let values = body
        .as_object()
        .ok_or_else(|| AppError::bad_request("request body must be a JSON object"))?;

    let client_types = RefRecord::find_all(&app.pool, "ref_client_type").await?;
    if Agreement::find_by_id(&app.pool, &id).await?.is_none() {
        return Err(AppError::not_found("Not found"));
    }

    let filter = Filter::new().eq("agreement.forest_file_id", id.as_str());
    let mut updated = Agreement::update(&app.pool, filter, values).await?;
    if updated.is_empty() {
        // the row vanished between the existence check and the update
        return Err(AppError::bad_request(format!("agreement {id} was not updated")));
    }

    Ok(Json(to_dto(&app, &updated.remove(0), &client_types).await?))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBody {
    pub zone_id: Option<serde_json::Value>,
}

/// PUT /api/v1/agreements/{agreementId}/zone — reassign the agreement's
/// zone; responds with the zone and its district.
pub async fn update_agreement_zone(
    State(app): State<AppState>,
    Path(agreement_id): Path<String>,
    Json(body): Json<ZoneBody>,
) -> Result<Json<Zone>, AppError> {
    let zone_id = numeric_body_value(body.zone_id.as_ref()).ok_or_else(|| {
        AppError::bad_request("zoneId must be provided in body and be numeric")
    })?;

    let zone = Agreement::set_zone(&app.pool, &agreement_id, zone_id).await?;
    Ok(Json(zone))
}

/// PUT /api/v1/agreements/{agreementId}/status/{statusId} — set the
/// agreement's exemption status; responds with the status record.
///
/// Unlike the zone route, a missing agreement here is 400, not 404.
pub async fn update_agreement_status(
    State(app): State<AppState>,
    Path((agreement_id, status_id)): Path<(String, String)>,
) -> Result<Json<RefRecord>, AppError> {
    let status_id = super::numeric_path_param("statusId", &status_id)?;

    let status = Agreement::set_status(&app.pool, &agreement_id, status_id)
        .await
        .map_err(|e| match e {
            MyraError::AgreementNotFound(id) => {
                AppError::bad_request(format!("No Agreement with ID {id} exists"))
            }
            other => AppError::from(other),
        })?;
    Ok(Json(status))
}
