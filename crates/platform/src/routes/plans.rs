//! Plan catalog: public pricing listing plus admin CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use storelane_core::PlanId;

use crate::db::plans::{self, Plan, PlanInput};
use crate::error::AppError;
use crate::middleware::RequireAdminToken;
use crate::state::AppState;

/// Active plans, for the public pricing page.
///
/// # Errors
///
/// 500 on database failure.
pub async fn list_public(State(state): State<AppState>) -> Result<Json<Vec<Plan>>, AppError> {
    let plans = plans::list_plans(state.pool(), true).await?;
    Ok(Json(plans))
}

#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    #[serde(flatten)]
    pub input: PlanInput,
}

/// Create a plan. Name is immutable afterwards.
///
/// # Errors
///
/// 409 on a duplicate name.
pub async fn create(
    State(state): State<AppState>,
    RequireAdminToken: RequireAdminToken,
    Json(body): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<Plan>), AppError> {
    let plan = plans::create_plan(state.pool(), &body.name, body.input).await?;

    tracing::info!(plan_id = %plan.id, name = %plan.name, "Plan created");
    Ok((StatusCode::CREATED, Json(plan)))
}

/// All plans, including retired ones.
///
/// # Errors
///
/// 500 on database failure.
pub async fn index(
    State(state): State<AppState>,
    RequireAdminToken: RequireAdminToken,
) -> Result<Json<Vec<Plan>>, AppError> {
    let plans = plans::list_plans(state.pool(), false).await?;
    Ok(Json(plans))
}

/// Update a plan's limits, prices, features, or active flag.
///
/// # Errors
///
/// 404 for unknown plans.
pub async fn update(
    State(state): State<AppState>,
    RequireAdminToken: RequireAdminToken,
    Path(plan_id): Path<PlanId>,
    Json(body): Json<PlanInput>,
) -> Result<Json<Plan>, AppError> {
    let plan = plans::update_plan(state.pool(), plan_id, body).await?;
    Ok(Json(plan))
}
