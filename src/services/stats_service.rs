// src/services/stats_service.rs

use chrono::{Duration, NaiveDate, NaiveTime, Utc};

use crate::{
    common::error::AppError,
    db::{StatsRepository, stats_repo::DailyRow},
    middleware::auth::CurrentUser,
    models::stats::{CountPair, DailyStat, LowStockStats, StatsSummary},
};

pub const DEFAULT_SUMMARY_THRESHOLD: i32 = 10;
pub const DEFAULT_DAILY_DAYS: i32 = 7;

#[derive(Clone)]
pub struct StatsService {
    stats_repo: StatsRepository,
}

impl StatsService {
    pub fn new(stats_repo: StatsRepository) -> Self {
        Self { stats_repo }
    }

    // Resumo do painel. "all" é global para qualquer papel; "mine" é
    // sempre do próprio usuário — o escopo de listagem NÃO se aplica
    // aqui (um admin também tem o "mine" dele).
    pub async fn summary(
        &self,
        caller: &CurrentUser,
        threshold: Option<i32>,
    ) -> Result<StatsSummary, AppError> {
        let threshold = threshold.unwrap_or(DEFAULT_SUMMARY_THRESHOLD);
        let today_start = Utc::now()
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();

        let counts = self
            .stats_repo
            .summary_counts(caller.user_id, threshold, today_start)
            .await?;

        Ok(StatsSummary {
            totals: CountPair {
                all: counts.total_all,
                mine: counts.total_mine,
            },
            low_stock: LowStockStats {
                all: counts.low_all,
                mine: counts.low_mine,
                threshold,
            },
            added_today: CountPair {
                all: counts.today_all,
                mine: counts.today_mine,
            },
        })
    }

    // Série diária dos últimos N dias (incluindo hoje), do mais antigo
    // para o mais novo. Dias sem criação aparecem com contagem zero.
    pub async fn daily(
        &self,
        caller: &CurrentUser,
        days: Option<i32>,
    ) -> Result<Vec<DailyStat>, AppError> {
        let days = normalize_days(days);
        let today = Utc::now().date_naive();
        let start_day = today - Duration::days((days - 1) as i64);
        let start = start_day.and_time(NaiveTime::MIN).and_utc();

        let rows = self.stats_repo.daily_counts(caller.user_id, start).await?;
        Ok(fill_days(&rows, start_day, days))
    }
}

/// Fora de [1, 30] volta para o padrão 7.
fn normalize_days(raw: Option<i32>) -> i32 {
    match raw {
        Some(d) if (1..=30).contains(&d) => d,
        _ => DEFAULT_DAILY_DAYS,
    }
}

// Preenche os dias sem linhas com zeros, preservando a ordem
// cronológica (um ponto por dia do calendário UTC).
fn fill_days(rows: &[DailyRow], start_day: NaiveDate, days: i32) -> Vec<DailyStat> {
    (0..days)
        .map(|i| {
            let date = start_day + Duration::days(i as i64);
            match rows.iter().find(|r| r.day == date) {
                Some(row) => DailyStat {
                    date,
                    count_all: row.count_all,
                    count_mine: row.count_mine,
                },
                None => DailyStat {
                    date,
                    count_all: 0,
                    count_mine: 0,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reset_days_outside_range_to_default() {
        assert_eq!(normalize_days(Some(0)), 7);
        assert_eq!(normalize_days(Some(31)), 7);
        assert_eq!(normalize_days(Some(-3)), 7);
        assert_eq!(normalize_days(None), 7);
        assert_eq!(normalize_days(Some(1)), 1);
        assert_eq!(normalize_days(Some(30)), 30);
    }

    // Cenário: um produto criado hoje e um criado há 2 dias, numa
    // janela de 3 dias → 3 pontos do mais antigo para o mais novo,
    // com zero no dia do meio.
    #[test]
    fn should_fill_missing_days_with_zero_counts() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 27).unwrap();
        let start = today - Duration::days(2);
        let rows = vec![
            DailyRow {
                day: start,
                count_all: 1,
                count_mine: 1,
            },
            DailyRow {
                day: today,
                count_all: 1,
                count_mine: 0,
            },
        ];

        let series = fill_days(&rows, start, 3);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, start);
        assert_eq!((series[0].count_all, series[0].count_mine), (1, 1));
        assert_eq!((series[1].count_all, series[1].count_mine), (0, 0));
        assert_eq!(series[2].date, today);
        assert_eq!((series[2].count_all, series[2].count_mine), (1, 0));
    }

    #[test]
    fn should_return_all_zeros_for_empty_rows() {
        let start = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let series = fill_days(&[], start, 3);
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|s| s.count_all == 0 && s.count_mine == 0));
    }
}
