//! Shared shape for the code/description/active reference tables.
//!
//! The seeded lookup tables are structurally identical, so one record type
//! serves them all; the table name is checked against a whitelist before
//! it is spliced into SQL.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;

use crate::error::{MyraError, Result};

/// Tables a [`RefRecord`] may be read from.
pub const REF_TABLES: &[&str] = &[
    "ref_agreement_type",
    "ref_agreement_status",
    "ref_client_type",
    "ref_livestock_type",
    "ref_livestock_identifier_type",
    "ref_livestock_identifier_location",
    "ref_plan_status",
];

/// A row in one of the enumerated reference tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RefRecord {
    pub id: i32,
    pub code: String,
    pub description: Option<String>,
    pub active: bool,
}

fn checked(table: &str) -> Result<&str> {
    if REF_TABLES.contains(&table) {
        Ok(table)
    } else {
        Err(MyraError::UnknownReferenceTable(table.to_string()))
    }
}

impl RefRecord {
    /// All rows of a reference table, id ascending.
    pub async fn find_all<'e, E>(db: E, table: &str) -> Result<Vec<RefRecord>>
    where
        E: PgExecutor<'e>,
    {
        let table = checked(table)?;
        let sql = format!("SELECT id, code, description, active FROM {table} ORDER BY id");
        Ok(sqlx::query_as::<_, RefRecord>(&sql).fetch_all(db).await?)
    }

    pub async fn find_by_id<'e, E>(db: E, table: &str, id: i32) -> Result<Option<RefRecord>>
    where
        E: PgExecutor<'e>,
    {
        let table = checked(table)?;
        let sql = format!("SELECT id, code, description, active FROM {table} WHERE id = $1");
        Ok(sqlx::query_as::<_, RefRecord>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_table_is_rejected() {
        assert!(matches!(
            checked("agreement"),
            Err(MyraError::UnknownReferenceTable(_))
        ));
        assert!(matches!(
            checked("ref_client_type; DROP TABLE agreement"),
            Err(MyraError::UnknownReferenceTable(_))
        ));
    }

    #[test]
    fn whitelisted_tables_pass() {
        assert_eq!(checked("ref_client_type").unwrap(), "ref_client_type");
    }
}
