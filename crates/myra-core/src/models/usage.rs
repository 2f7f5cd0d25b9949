use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;

use crate::error::Result;

/// Annual authorized-use record for an agreement (AUM = animal unit month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub id: i32,
    pub agreement_id: String,
    pub year: i32,
    pub authorized_aum: Option<i32>,
    pub temporary_increase: Option<i32>,
    pub total_non_use: Option<i32>,
    pub total_annual_use: Option<i32>,
}

impl Usage {
    /// Usage rows for an agreement, most recent year first.
    pub async fn for_agreement<'e, E>(db: E, agreement_id: &str) -> Result<Vec<Usage>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, Usage>(
            "SELECT id, agreement_id, year, authorized_aum, temporary_increase, \
             total_non_use, total_annual_use \
             FROM usage WHERE agreement_id = $1 ORDER BY year DESC",
        )
        .bind(agreement_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
