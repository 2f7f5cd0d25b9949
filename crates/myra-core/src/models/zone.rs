use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::{Postgres, QueryBuilder};

use crate::error::Result;
use crate::fields::{aliased, qualified};
use crate::query::Filter;

use super::district::District;

/// Range zone within a district. Reference data managed by seeds; the
/// only mutation path is reassigning an agreement's zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: i32,
    pub code: String,
    pub description: Option<String>,
    pub contact_name: Option<String>,
    pub district_id: i32,
    pub user_id: Option<i32>,
    pub district: Option<District>,
}

/// Flat row for the zone ⋈ district select. District columns carry the
/// `ref_district_` alias prefix.
#[derive(Debug, sqlx::FromRow)]
struct ZoneDistrictRow {
    id: i32,
    code: String,
    description: Option<String>,
    contact_name: Option<String>,
    district_id: i32,
    user_id: Option<i32>,
    ref_district_id: i32,
    ref_district_code: String,
    ref_district_description: Option<String>,
}

impl From<ZoneDistrictRow> for Zone {
    fn from(row: ZoneDistrictRow) -> Self {
        Zone {
            id: row.id,
            code: row.code,
            description: row.description,
            contact_name: row.contact_name,
            district_id: row.district_id,
            user_id: row.user_id,
            district: Some(District {
                id: row.ref_district_id,
                code: row.ref_district_code,
                description: row.ref_district_description,
            }),
        }
    }
}

impl Zone {
    pub const TABLE: &'static str = "ref_zone";

    // primary key must be first
    pub const FIELDS: &'static [&'static str] = &[
        "id",
        "code",
        "description",
        "contact_name",
        "district_id",
        "user_id",
    ];

    fn joined_select() -> String {
        let mut fields = qualified(Self::TABLE, Self::FIELDS);
        fields.extend(aliased(District::TABLE, District::FIELDS));
        format!(
            "SELECT {} FROM {} JOIN {} ON {}.district_id = {}.id",
            fields.join(", "),
            Self::TABLE,
            District::TABLE,
            Self::TABLE,
            District::TABLE,
        )
    }

    /// Fetch zones (each carrying its district) matching `filter`.
    pub async fn find<'e, E>(db: E, filter: Filter) -> Result<Vec<Zone>>
    where
        E: PgExecutor<'e>,
    {
        filter.check_columns(&qualified(Self::TABLE, Self::FIELDS))?;

        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(Self::joined_select());
        filter.apply(&mut qb);

        let rows: Vec<ZoneDistrictRow> = qb.build_query_as().fetch_all(db).await?;
        Ok(rows.into_iter().map(Zone::from).collect())
    }

    pub async fn find_by_id<'e, E>(db: E, id: i32) -> Result<Option<Zone>>
    where
        E: PgExecutor<'e>,
    {
        let filter = Filter::new().eq(format!("{}.id", Self::TABLE), id);
        let mut zones = Self::find(db, filter).await?;
        Ok(if zones.is_empty() {
            None
        } else {
            Some(zones.remove(0))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_select_aliases_district_columns() {
        let sql = Zone::joined_select();
        assert!(sql.contains("ref_district.id AS ref_district_id"));
        assert!(sql.contains("JOIN ref_district ON ref_zone.district_id = ref_district.id"));
        assert!(sql.starts_with("SELECT ref_zone.id"));
    }

    #[test]
    fn district_filter_column_is_allowed() {
        let filter = Filter::new().eq("ref_zone.district_id", 3);
        assert!(filter
            .check_columns(&qualified(Zone::TABLE, Zone::FIELDS))
            .is_ok());
    }
}
