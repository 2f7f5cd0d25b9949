use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::{MyraError, Result};
use crate::fields::to_snake_case;
use crate::query::SetValue;

/// Livestock identifier (brand, tag, etc.) registered under an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LivestockIdentifier {
    pub id: i32,
    pub agreement_id: String,
    pub livestock_identifier_type_id: Option<i32>,
    pub location_id: Option<i32>,
    pub description: Option<String>,
}

impl LivestockIdentifier {
    pub const TABLE: &'static str = "livestock_identifier";

    /// Columns a PUT body may touch.
    pub const UPDATABLE: &'static [&'static str] = &[
        "livestock_identifier_type_id",
        "location_id",
        "description",
    ];

    pub async fn find_for_agreement<'e, E>(
        db: E,
        agreement_id: &str,
    ) -> Result<Vec<LivestockIdentifier>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, LivestockIdentifier>(
            "SELECT id, agreement_id, livestock_identifier_type_id, location_id, description \
             FROM livestock_identifier WHERE agreement_id = $1 ORDER BY id",
        )
        .bind(agreement_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Fold a JSON body into SET-list pairs. Unknown keys are dropped;
    /// a recognized column with a value that won't bind is an error.
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

    /// Partial update scoped to `(agreement_id, id)`; returns the refreshed
    /// row, or `LivestockIdentifierNotFound` when nothing matched.
    pub async fn update(
        pool: &PgPool,
        agreement_id: &str,
        id: i32,
        values: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<LivestockIdentifier> {
        let sets = Self::updatable_sets(values)?;
        if sets.is_empty() {
            return Err(MyraError::NoUpdatableFields);
        }

        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE livestock_identifier SET ");
        for (i, (column, value)) in sets.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(column.as_str());
            qb.push(" = ");
            value.push(&mut qb);
        }
        qb.push(" WHERE agreement_id = ");
        qb.push_bind(agreement_id.to_string());
        qb.push(" AND id = ");
        qb.push_bind(id);
        qb.push(
            " RETURNING id, agreement_id, livestock_identifier_type_id, location_id, description",
        );

        qb.build_query_as::<LivestockIdentifier>()
            .fetch_optional(pool)
            .await?
            .ok_or(MyraError::LivestockIdentifierNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updatable_sets_drops_unknown_keys() {
        let body = serde_json::json!({
            "locationId": 2,
            "agreementId": "RAN072522",
            "somethingElse": "x",
        });
        let sets = LivestockIdentifier::updatable_sets(body.as_object().unwrap()).unwrap();
        let columns: Vec<&str> = sets.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(columns, vec!["location_id"]);
    }

    #[test]
    fn unbindable_value_on_known_column_is_an_error() {
        let body = serde_json::json!({ "locationId": "abc" });
        let err = LivestockIdentifier::updatable_sets(body.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, MyraError::InvalidFieldValue(c) if c == "location_id"));
    }

    #[test]
    fn null_clears_a_nullable_column() {
        let body = serde_json::json!({ "description": null });
        let sets = LivestockIdentifier::updatable_sets(body.as_object().unwrap()).unwrap();
        assert_eq!(sets, vec![("description".to_string(), SetValue::Null)]);
    }
}
