// src/db/log_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::log::{AuditAction, AuditLog},
};

// Repositório da trilha de auditoria. Append-only: nada aqui atualiza
// ou apaga entradas.
#[derive(Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grava uma entrada DENTRO da transação do chamador. Se este insert
    /// falhar, a mutação que o acompanha sofre rollback junto — nunca
    /// existe mutação commitada sem a sua entrada de auditoria.
    pub async fn append<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        action: AuditAction,
        entity: &str,
        entity_id: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("INSERT INTO logs (user_id, action, entity, entity_id) VALUES ($1, $2, $3, $4)")
            .bind(user_id)
            .bind(action)
            .bind(entity)
            .bind(entity_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<AuditLog>, AppError> {
        let entries = sqlx::query_as::<_, AuditLog>("SELECT * FROM logs ORDER BY timestamp DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }
}
