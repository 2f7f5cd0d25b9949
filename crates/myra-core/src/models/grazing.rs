use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;

use crate::error::Result;

/// A pasture named within an agreement's schedules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pasture {
    pub id: i32,
    pub agreement_id: String,
    pub name: String,
}

/// One line of a grazing schedule: a livestock count on a pasture over a
/// date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GrazingScheduleEntry {
    pub id: i32,
    pub grazing_schedule_id: i32,
    pub pasture_id: i32,
    pub livestock_type_id: i32,
    pub livestock_count: i32,
    pub date_in: Option<NaiveDate>,
    pub date_out: Option<NaiveDate>,
}

/// Yearly grazing schedule owning its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrazingSchedule {
    pub id: i32,
    pub agreement_id: String,
    pub year: i32,
    pub entries: Vec<GrazingScheduleEntry>,
}

#[derive(Debug, sqlx::FromRow)]
struct ScheduleRow {
    id: i32,
    agreement_id: String,
    year: i32,
}

impl GrazingSchedule {
    /// Schedules for an agreement, each with its entries, year descending.
    pub async fn for_agreement(pool: &sqlx::PgPool, agreement_id: &str) -> Result<Vec<GrazingSchedule>> {
        let schedules = sqlx::query_as::<_, ScheduleRow>(
            "SELECT id, agreement_id, year FROM grazing_schedule \
             WHERE agreement_id = $1 ORDER BY year DESC",
        )
        .bind(agreement_id)
        .fetch_all(pool)
        .await?;

        let mut out = Vec::with_capacity(schedules.len());
        for schedule in schedules {
            let entries = GrazingScheduleEntry::for_schedule(pool, schedule.id).await?;
            out.push(GrazingSchedule {
                id: schedule.id,
                agreement_id: schedule.agreement_id,
                year: schedule.year,
                entries,
            });
        }
        Ok(out)
    }
}

impl GrazingScheduleEntry {
    pub async fn for_schedule<'e, E>(db: E, schedule_id: i32) -> Result<Vec<GrazingScheduleEntry>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, GrazingScheduleEntry>(
            "SELECT id, grazing_schedule_id, pasture_id, livestock_type_id, \
             livestock_count, date_in, date_out \
             FROM grazing_schedule_entry WHERE grazing_schedule_id = $1 ORDER BY id",
        )
        .bind(schedule_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

impl Pasture {
    pub async fn for_agreement<'e, E>(db: E, agreement_id: &str) -> Result<Vec<Pasture>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, Pasture>(
            "SELECT id, agreement_id, name FROM pasture WHERE agreement_id = $1 ORDER BY id",
        )
        .bind(agreement_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
