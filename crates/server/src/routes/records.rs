use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use models::income_record::NewIncomeRecord;
use service::{query, records};

use crate::errors::JsonApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRecordInput {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<FixedOffset>>,
    pub category: Option<String>,
}

/// POST /api/records
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRecordInput>,
) -> Result<(StatusCode, Json<Value>), JsonApiError> {
    let amount = input
        .amount
        .ok_or_else(|| JsonApiError::bad_request("amount is required"))?;
    let record = records::create_record(
        &state.db,
        NewIncomeRecord {
            description: input.description.unwrap_or_default(),
            amount,
            date: input.date,
            category: input.category,
        },
    )
    .await?;
    info!(id = %record.id, category = %record.category, "created income record");
    let body = json!({"status": "success", "data": {"record": record}});
    Ok((StatusCode::CREATED, Json(body)))
}

/// GET /api/records
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, JsonApiError> {
    let parsed = query::parse_list_params(&params)?;
    let page = records::list_records(&state.db, &parsed).await?;
    Ok(Json(json!({
        "status": "success",
        "results": page.records.len(),
        "total": page.total,
        "totalPages": page.total_pages,
        "currentPage": page.current_page,
        "data": {"records": page.records},
    })))
}

/// GET /api/records/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<records::Stats>, JsonApiError> {
    let stats = records::collection_stats(&state.db).await?;
    Ok(Json(stats))
}

/// DELETE /api/records/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    if records::delete_record(&state.db, id).await? {
        info!(%id, "deleted income record");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(JsonApiError::not_found("record not found"))
    }
}
