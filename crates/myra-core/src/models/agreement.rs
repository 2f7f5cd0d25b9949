//! Agreement model and the joined query composer.
//!
//! `find_with_type_zone_district` is the single read path for agreements:
//! one select spanning agreement ⋈ ref_zone ⋈ ref_district ⋈
//! ref_agreement_type, joined columns aliased `<table>_<column>`, rows
//! decomposed into nested `Zone`/`District`/`AgreementType` values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::{MyraError, Result};
use crate::fields::{aliased, qualified, to_snake_case};
use crate::query::{Filter, Pagination, SetValue};

use super::agreement_type::AgreementType;
use super::district::District;
use super::reference::RefRecord;
use super::zone::Zone;

// ---------------------------------------------------------------------------
// Agreement
// ---------------------------------------------------------------------------

/// A range agreement. `forest_file_id` is the RAN, the external identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agreement {
    pub forest_file_id: String,
    pub agreement_start_date: Option<NaiveDate>,
    pub agreement_end_date: Option<NaiveDate>,
    pub agreement_type_id: i32,
    pub agreement_exemption_status_id: Option<i32>,
    pub zone: Zone,
    pub agreement_type: AgreementType,
}

/// Flat row produced by the joined select. Joined columns carry their
/// table's alias prefix; agreement columns are unprefixed.
#[derive(Debug, sqlx::FromRow)]
struct JoinedRow {
    forest_file_id: String,
    agreement_start_date: Option<NaiveDate>,
    agreement_end_date: Option<NaiveDate>,
    agreement_type_id: i32,
    agreement_exemption_status_id: Option<i32>,
    ref_zone_id: i32,
    ref_zone_code: String,
    ref_zone_description: Option<String>,
    ref_zone_contact_name: Option<String>,
    ref_zone_district_id: i32,
    ref_zone_user_id: Option<i32>,
    ref_district_id: i32,
    ref_district_code: String,
    ref_district_description: Option<String>,
    ref_agreement_type_id: i32,
    ref_agreement_type_code: String,
    ref_agreement_type_description: Option<String>,
    ref_agreement_type_active: bool,
}

impl From<JoinedRow> for Agreement {
    fn from(row: JoinedRow) -> Self {
        Agreement {
            forest_file_id: row.forest_file_id,
            agreement_start_date: row.agreement_start_date,
            agreement_end_date: row.agreement_end_date,
            agreement_type_id: row.agreement_type_id,
            agreement_exemption_status_id: row.agreement_exemption_status_id,
            zone: Zone {
                id: row.ref_zone_id,
                code: row.ref_zone_code,
                description: row.ref_zone_description,
                contact_name: row.ref_zone_contact_name,
                district_id: row.ref_zone_district_id,
                user_id: row.ref_zone_user_id,
                district: Some(District {
                    id: row.ref_district_id,
                    code: row.ref_district_code,
                    description: row.ref_district_description,
                }),
            },
            agreement_type: AgreementType {
                id: row.ref_agreement_type_id,
                code: row.ref_agreement_type_code,
                description: row.ref_agreement_type_description,
                active: row.ref_agreement_type_active,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Query composer
// ---------------------------------------------------------------------------

impl Agreement {
    pub const TABLE: &'static str = "agreement";

    // primary key must be first
    pub const FIELDS: &'static [&'static str] = &[
        "forest_file_id",
        "agreement_start_date",
        "agreement_end_date",
        "agreement_type_id",
        "agreement_exemption_status_id",
    ];

    /// Columns a PUT body may touch.
    pub const UPDATABLE: &'static [&'static str] = &[
        "agreement_start_date",
        "agreement_end_date",
        "agreement_type_id",
        "agreement_exemption_status_id",
        "zone_id",
    ];

    /// Columns accepted in a find/update filter. `zone_id` joins rather
    /// than selects, so it is not in `FIELDS`, but filtering on it is the
    /// zone-scope hook.
    fn filter_columns() -> Vec<String> {
        let mut allowed = qualified(Self::TABLE, Self::FIELDS);
        allowed.push(format!("{}.zone_id", Self::TABLE));
        allowed
    }

    fn joined_select() -> String {
        let mut fields = qualified(Self::TABLE, Self::FIELDS);
        fields.extend(aliased(Zone::TABLE, Zone::FIELDS));
        fields.extend(aliased(District::TABLE, District::FIELDS));
        fields.extend(aliased(AgreementType::TABLE, AgreementType::FIELDS));
        format!(
            "SELECT {fields} FROM {t} \
             JOIN {zone} ON {t}.zone_id = {zone}.id \
             JOIN {district} ON {zone}.district_id = {district}.id \
             JOIN {atype} ON {t}.agreement_type_id = {atype}.id",
            fields = fields.join(", "),
            t = Self::TABLE,
            zone = Zone::TABLE,
            district = District::TABLE,
            atype = AgreementType::TABLE,
        )
    }

    /// Fetch agreements matching `filter` with their zone, district, and
    /// agreement type composed from the joined row. Pagination applies
    /// limit/offset when supplied; otherwise the result is unbounded.
    pub async fn find_with_type_zone_district<'e, E>(
        db: E,
        filter: Filter,
        pagination: Option<Pagination>,
    ) -> Result<Vec<Agreement>>
    where
        E: PgExecutor<'e>,
    {
        filter.check_columns(&Self::filter_columns())?;

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(Self::joined_select());
        filter.apply(&mut qb);
        if let Some(p) = pagination {
            p.apply(&mut qb);
        }

        let rows: Vec<JoinedRow> = qb.build_query_as().fetch_all(db).await?;
        Ok(rows.into_iter().map(Agreement::from).collect())
    }

    pub async fn find_by_id<'e, E>(db: E, forest_file_id: &str) -> Result<Option<Agreement>>
    where
        E: PgExecutor<'e>,
    {
        let filter = Filter::new().eq(format!("{}.forest_file_id", Self::TABLE), forest_file_id);
        let mut agreements = Self::find_with_type_zone_district(db, filter, None).await?;
        Ok(if agreements.is_empty() {
            None
        } else {
            Some(agreements.remove(0))
        })
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Fold a JSON body to (column, value) pairs restricted to `UPDATABLE`.
    /// Keys arrive camelCase. Unknown keys are dropped; a recognized
    /// column with a value that cannot bind is an error, never a silent
    /// drop. A JSON null clears the column.
    fn updatable_sets(
        values: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<(String, SetValue)>> {
        let mut sets = Vec::new();
        for (key, value) in values {
            let column = to_snake_case(key);
            if !Self::UPDATABLE.contains(&column.as_str()) {
                continue;
            }
            let set = SetValue::from_json(&column, value)
                .ok_or_else(|| MyraError::InvalidFieldValue(column.clone()))?;
            sets.push((column, set));
        }
        Ok(sets)
    }

    /// Partial update of the rows matching `filter`, then a re-fetch of
    /// each affected row through the query composer, all in one
    /// transaction. An empty result means no rows matched.
    pub async fn update(
        pool: &PgPool,
        filter: Filter,
        values: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<Agreement>> {
        let sets = Self::updatable_sets(values)?;
        if sets.is_empty() {
            return Err(MyraError::NoUpdatableFields);
        }
        filter.check_columns(&Self::filter_columns())?;

        let mut tx = pool.begin().await?;

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE agreement SET ");
        for (i, (column, value)) in sets.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(column.as_str());
            qb.push(" = ");
            value.push(&mut qb);
        }
        // qualified filter columns are valid here: UPDATE agreement may
        // reference agreement.<col> in its WHERE clause
        filter.apply(&mut qb);
        qb.push(" RETURNING forest_file_id");

        let keys: Vec<(String,)> = qb.build_query_as().fetch_all(&mut *tx).await?;

        let mut refreshed = Vec::with_capacity(keys.len());
        for (forest_file_id,) in keys {
            let filter =
                Filter::new().eq(format!("{}.forest_file_id", Self::TABLE), forest_file_id);
            let mut found =
                Self::find_with_type_zone_district(&mut *tx, filter, None).await?;
            refreshed.append(&mut found);
        }

        tx.commit().await?;
        Ok(refreshed)
    }

    /// Reassign the agreement's zone. Validates both sides, applies the
    /// update, and commits as one transaction; returns the new zone with
    /// its district.
    pub async fn set_zone(pool: &PgPool, forest_file_id: &str, zone_id: i32) -> Result<Zone> {
        let mut tx = pool.begin().await?;

        let exists: Option<(String,)> =
            sqlx::query_as("SELECT forest_file_id FROM agreement WHERE forest_file_id = $1")
                .bind(forest_file_id)
                .fetch_optional(&mut *tx)
                .await?;
        if exists.is_none() {
            return Err(MyraError::AgreementNotFound(forest_file_id.to_string()));
        }

        let zone = Zone::find_by_id(&mut *tx, zone_id)
            .await?
            .ok_or(MyraError::ZoneNotFound(zone_id))?;

        sqlx::query("UPDATE agreement SET zone_id = $1 WHERE forest_file_id = $2")
            .bind(zone_id)
            .bind(forest_file_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(zone)
    }

    /// Set the agreement's exemption status; returns the status record.
    pub async fn set_status(
        pool: &PgPool,
        forest_file_id: &str,
        status_id: i32,
    ) -> Result<RefRecord> {
        let mut tx = pool.begin().await?;

        let status = RefRecord::find_by_id(&mut *tx, "ref_agreement_status", status_id)
            .await?
            .ok_or(MyraError::AgreementStatusNotFound(status_id))?;

        let result = sqlx::query(
            "UPDATE agreement SET agreement_exemption_status_id = $1 WHERE forest_file_id = $2",
        )
        .bind(status_id)
        .bind(forest_file_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(MyraError::AgreementNotFound(forest_file_id.to_string()));
        }

        tx.commit().await?;
        Ok(status)
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Case-insensitive substring search across RAN, zone contact name, and
    /// client name. Returns `(total_count, page_of_forest_file_ids)`.
    /// An empty term matches everything.
    pub async fn search(
        pool: &PgPool,
        term: &str,
        pagination: Pagination,
    ) -> Result<(i64, Vec<String>)> {
        let pattern = format!("%{term}%");

        let (count,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(DISTINCT agreement.forest_file_id) {}",
            Self::search_from_where()
        ))
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

        let rows: Vec<(String,)> = sqlx::query_as(&format!(
            "SELECT DISTINCT agreement.forest_file_id {} \
             ORDER BY agreement.forest_file_id LIMIT $2 OFFSET $3",
            Self::search_from_where()
        ))
        .bind(&pattern)
        .bind(pagination.limit)
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

        Ok((count, rows.into_iter().map(|(id,)| id).collect()))
    }

    fn search_from_where() -> &'static str {
        "FROM agreement \
         JOIN ref_zone ON agreement.zone_id = ref_zone.id \
         LEFT JOIN client_agreement ON client_agreement.agreement_id = agreement.forest_file_id \
         LEFT JOIN client ON client.id = client_agreement.client_id \
         WHERE agreement.forest_file_id ILIKE $1 \
         OR ref_zone.contact_name ILIKE $1 \
         OR client.name ILIKE $1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_select_aliases_every_joined_table() {
        let sql = Agreement::joined_select();
        assert!(sql.contains("ref_zone.code AS ref_zone_code"));
        assert!(sql.contains("ref_district.code AS ref_district_code"));
        assert!(sql.contains("ref_agreement_type.code AS ref_agreement_type_code"));
        // agreement's own columns stay unaliased
        assert!(sql.contains("agreement.forest_file_id,"));
    }

    #[test]
    fn joined_select_joins_on_declared_keys() {
        let sql = Agreement::joined_select();
        assert!(sql.contains("JOIN ref_zone ON agreement.zone_id = ref_zone.id"));
        assert!(sql.contains("JOIN ref_district ON ref_zone.district_id = ref_district.id"));
        assert!(
            sql.contains("JOIN ref_agreement_type ON agreement.agreement_type_id = ref_agreement_type.id")
        );
    }

    #[test]
    fn primary_key_is_first_field() {
        assert_eq!(Agreement::FIELDS[0], "forest_file_id");
    }

    #[test]
    fn zone_scope_filter_is_allowed() {
        let filter = Filter::new().eq("agreement.zone_id", 12);
        assert!(filter.check_columns(&Agreement::filter_columns()).is_ok());
    }

    #[test]
    fn updatable_sets_folds_camel_case_and_drops_unknown_columns() {
        let body = serde_json::json!({
            "agreementStartDate": "2019-01-01",
            "zoneId": 5,
            "forestFileId": "RAN999999",
            "notAColumn": true,
        });
        let sets = Agreement::updatable_sets(body.as_object().unwrap()).unwrap();
        let columns: Vec<&str> = sets.iter().map(|(c, _)| c.as_str()).collect();
        assert!(columns.contains(&"agreement_start_date"));
        assert!(columns.contains(&"zone_id"));
        // primary key and unknown fields are not updatable
        assert!(!columns.contains(&"forest_file_id"));
        assert!(!columns.contains(&"not_a_column"));
    }

    #[test]
    fn updatable_sets_empty_for_foreign_body() {
        let body = serde_json::json!({ "name": "x", "rating": 3 });
        assert!(Agreement::updatable_sets(body.as_object().unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn invalid_value_on_recognized_column_is_an_error_not_a_drop() {
        let body = serde_json::json!({
            "agreementStartDate": "garbage",
            "zoneId": 5,
        });
        let err = Agreement::updatable_sets(body.as_object().unwrap()).unwrap_err();
        match err {
            MyraError::InvalidFieldValue(column) => assert_eq!(column, "agreement_start_date"),
            other => panic!("expected InvalidFieldValue, got {other:?}"),
        }
    }

    #[test]
    fn null_value_clears_a_nullable_column() {
        let body = serde_json::json!({ "agreementEndDate": null });
        let sets = Agreement::updatable_sets(body.as_object().unwrap()).unwrap();
        assert_eq!(sets, vec![("agreement_end_date".to_string(), SetValue::Null)]);
    }

    #[test]
    fn non_numeric_zone_id_is_an_error() {
        let body = serde_json::json!({ "zoneId": "abc" });
        let err = Agreement::updatable_sets(body.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, MyraError::InvalidFieldValue(c) if c == "zone_id"));
    }

    #[test]
    fn search_clause_covers_all_three_fields() {
        let sql = Agreement::search_from_where();
        assert!(sql.contains("agreement.forest_file_id ILIKE $1"));
        assert!(sql.contains("ref_zone.contact_name ILIKE $1"));
        assert!(sql.contains("client.name ILIKE $1"));
    }
}
