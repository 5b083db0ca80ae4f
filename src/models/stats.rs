// src/models/stats.rs

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

// Par global/próprio usado em todos os contadores do resumo.
// "all" é global para qualquer papel; "mine" é sempre do próprio
// usuário — inclusive para admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CountPair {
    pub all: i64,
    pub mine: i64,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockStats {
    pub all: i64,
    pub mine: i64,
    pub threshold: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub totals: CountPair,
    pub low_stock: LowStockStats,
    pub added_today: CountPair,
}

// Um ponto da série diária (dia UTC, do mais antigo para o mais novo)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub date: NaiveDate,
    pub count_all: i64,
    pub count_mine: i64,
}
