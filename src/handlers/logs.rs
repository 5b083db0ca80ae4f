// src/handlers/logs.rs

use axum::{Json, extract::State};

use crate::{
    common::{error::AppError, policy},
    config::AppState,
    middleware::auth::CurrentUser,
    models::log::AuditLog,
};

// Trilha de auditoria completa, mais recente primeiro. Apenas admin.
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    responses(
        (status = 200, description = "Entradas de auditoria, mais recentes primeiro", body = Vec<AuditLog>),
        (status = 403, description = "Apenas admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_logs(
    State(app_state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<Vec<AuditLog>>, AppError> {
    policy::ensure_admin(&caller)?;
    let entries = app_state.log_repo.list_all().await?;
    Ok(Json(entries))
}
