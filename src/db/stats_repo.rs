// src/db/stats_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::common::error::AppError;

// Contadores crus do resumo (o serviço monta a resposta).
#[derive(Debug, Clone, Copy)]
pub struct SummaryCounts {
    pub total_all: i64,
    pub total_mine: i64,
    pub low_all: i64,
    pub low_mine: i64,
    pub today_all: i64,
    pub today_mine: i64,
}

// Uma linha agrupada por dia; dias sem produto não aparecem aqui
// (o serviço preenche os zeros).
#[derive(Debug, Clone, FromRow)]
pub struct DailyRow {
    pub day: NaiveDate,
    pub count_all: i64,
    pub count_mine: i64,
}

#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Resumo do painel. Todas as contagens rodam numa transação só,
    // para um snapshot consistente dos dados.
    pub async fn summary_counts(
        &self,
        user_id: Uuid,
        threshold: i32,
        today_start: DateTime<Utc>,
    ) -> Result<SummaryCounts, AppError> {
        let mut tx = self.pool.begin().await?;

        let total_all = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;

        let total_mine =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE owner_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        let low_all =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE quantity <= $1")
                .bind(threshold)
                .fetch_one(&mut *tx)
                .await?;

        let low_mine = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE quantity <= $1 AND owner_id = $2",
        )
        .bind(threshold)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let today_all =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE created_at >= $1")
                .bind(today_start)
                .fetch_one(&mut *tx)
                .await?;

        let today_mine = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE created_at >= $1 AND owner_id = $2",
        )
        .bind(today_start)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SummaryCounts {
            total_all,
            total_mine,
            low_all,
            low_mine,
            today_all,
            today_mine,
        })
    }

    // Contagem de criações por dia (UTC) a partir de `start`.
    pub async fn daily_counts(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
    ) -> Result<Vec<DailyRow>, AppError> {
        let rows = sqlx::query_as::<_, DailyRow>(
            r#"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS day,
                   COUNT(*) AS count_all,
                   COUNT(*) FILTER (WHERE owner_id = $1) AS count_mine
            FROM products
            WHERE created_at >= $2
            GROUP BY day
            ORDER BY day ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
