use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;

use crate::error::Result;

/// Range-use plan status, joined from `ref_plan_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStatus {
    pub id: i32,
    pub code: String,
    pub description: Option<String>,
}

/// Range-use plan under an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: i32,
    pub agreement_id: String,
    pub range_name: Option<String>,
    pub plan_start_date: Option<NaiveDate>,
    pub plan_end_date: Option<NaiveDate>,
    pub status_id: Option<i32>,
    pub status: Option<PlanStatus>,
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: i32,
    agreement_id: String,
    range_name: Option<String>,
    plan_start_date: Option<NaiveDate>,
    plan_end_date: Option<NaiveDate>,
    status_id: Option<i32>,
    ref_plan_status_code: Option<String>,
    ref_plan_status_description: Option<String>,
}

impl From<PlanRow> for Plan {
    fn from(row: PlanRow) -> Self {
        let status = match (row.status_id, row.ref_plan_status_code) {
            (Some(id), Some(code)) => Some(PlanStatus {
                id,
                code,
                description: row.ref_plan_status_description,
            }),
            _ => None,
        };
        Plan {
            id: row.id,
            agreement_id: row.agreement_id,
            range_name: row.range_name,
            plan_start_date: row.plan_start_date,
            plan_end_date: row.plan_end_date,
            status_id: row.status_id,
            status,
        }
    }
}

impl Plan {
    /// Plans for an agreement with their status extension, newest first.
    pub async fn for_agreement<'e, E>(db: E, agreement_id: &str) -> Result<Vec<Plan>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, PlanRow>(
            "SELECT plan.id, plan.agreement_id, plan.range_name, \
             plan.plan_start_date, plan.plan_end_date, plan.status_id, \
             ref_plan_status.code AS ref_plan_status_code, \
             ref_plan_status.description AS ref_plan_status_description \
             FROM plan \
             LEFT JOIN ref_plan_status ON plan.status_id = ref_plan_status.id \
             WHERE plan.agreement_id = $1 ORDER BY plan.id DESC",
        )
        .bind(agreement_id)
        .fetch_all(db)
        .await?;
        Ok(rows.into_iter().map(Plan::from).collect())
    }
}
