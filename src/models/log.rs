// src/models/log.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Ações auditáveis. Enum fechado: o conjunto de ações é parte do
// contrato, não uma string qualquer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "audit_action", rename_all = "snake_case")] // Banco
#[serde(rename_all = "snake_case")] // JSON
pub enum AuditAction {
    CreateProduct,
    UpdateProduct,
    IncreaseStock,
    DecreaseStock,
    DeleteProduct,
}

// Uma entrada da trilha de auditoria.
// `user_id` é o ATOR da ação, não necessariamente o dono do produto.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: AuditAction,
    pub entity: String,
    pub entity_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_actions_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&AuditAction::CreateProduct).unwrap(),
            "\"create_product\""
        );
        assert_eq!(
            serde_json::to_string(&AuditAction::DecreaseStock).unwrap(),
            "\"decrease_stock\""
        );
    }
}
