//! Daily creation counts for the admin dashboards.

use chrono::{DateTime, Days, NaiveDate, Utc};
use sea_orm::{ConnectionTrait, DbBackend, DbErr, FromQueryResult, Statement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts cover today and the seven calendar days before it.
pub const GROWTH_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

pub fn growth_window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(GROWTH_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN)
}

/// Days without rows are omitted; results are ascending by date.
///
/// `condition` is an extra constant predicate (no placeholders) AND-ed with
/// the window filter.
pub fn growth_statement(table: &str, condition: Option<&str>) -> Statement {
    let extra = condition.map(|c| format!(" AND ({c})")).unwrap_or_default();
    Statement::from_string(
        DbBackend::Postgres,
        format!(
            "SELECT created_at::date AS date, COUNT(*) AS count \
             FROM {table} \
             WHERE created_at >= CURRENT_DATE - INTERVAL '{GROWTH_WINDOW_DAYS} days'{extra} \
             GROUP BY created_at::date \
             ORDER BY date ASC"
        ),
    )
}

pub async fn fetch_growth<C: ConnectionTrait>(
    db: &C,
    table: &str,
    condition: Option<&str>,
) -> Result<Vec<DailyCount>, DbErr> {
    DailyCount::find_by_statement(growth_statement(table, condition))
        .all(db)
        .await
}

/// In-memory counterpart of [`growth_statement`].
pub fn daily_counts<I>(timestamps: I, today: NaiveDate) -> Vec<DailyCount>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let start = growth_window_start(today);
    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();

    for ts in timestamps {
        let day = ts.date_naive();
        if day >= start {
            *per_day.entry(day).or_default() += 1;
        }
    }

    per_day
        .into_iter()
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_daily_counts_groups_and_filters() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap();

        let counts = daily_counts(vec![at(9, 1), at(2, 5), at(9, 23), at(1, 12), at(3, 0)], today);

        assert_eq!(
            counts,
            vec![
                DailyCount { date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(), count: 1 },
                DailyCount { date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_growth_statement_targets_table() {
        let stmt = growth_statement("comments", None);
        assert!(stmt.sql.contains("FROM comments"));
        assert!(!stmt.sql.contains(" AND "));
        assert!(stmt.sql.contains("INTERVAL '7 days'"));
        assert!(stmt.sql.ends_with("ORDER BY date ASC"));

        let users = growth_statement("users", Some("role = 'user'"));
        assert!(users.sql.contains("days' AND (role = 'user') GROUP BY"));
    }
}
