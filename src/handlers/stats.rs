// src/handlers/stats.rs

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentUser,
    models::stats::{DailyStat, StatsSummary},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// Limite de estoque baixo do resumo (padrão 10)
    pub threshold: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DailyQuery {
    /// Janela em dias, 1..=30 (padrão 7)
    pub days: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Stats",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Totais, estoque baixo e criações de hoje", body = StatsSummary)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    caller: CurrentUser,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<StatsSummary>, AppError> {
    let summary = app_state
        .stats_service
        .summary(&caller, query.threshold)
        .await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/stats/daily",
    tag = "Stats",
    params(DailyQuery),
    responses(
        (status = 200, description = "Criações por dia, mais antigo primeiro", body = Vec<DailyStat>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_daily(
    State(app_state): State<AppState>,
    caller: CurrentUser,
    Query(query): Query<DailyQuery>,
) -> Result<Json<Vec<DailyStat>>, AppError> {
    let series = app_state.stats_service.daily(&caller, query.days).await?;
    Ok(Json(series))
}
