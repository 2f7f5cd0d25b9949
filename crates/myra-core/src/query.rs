//! Query-composition primitives shared by the model layer.
//!
//! Filters are whitelisted (column, value) equality pairs, AND-combined.
//! Values are always bound through [`sqlx::QueryBuilder`], never
//! interpolated into SQL text.

use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

use crate::error::{MyraError, Result};

// ---------------------------------------------------------------------------
// Bind — a value awaiting a bind slot
// ---------------------------------------------------------------------------

/// A typed value destined for a query bind slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Text(String),
    Int(i32),
    Bool(bool),
    Date(NaiveDate),
}

impl Bind {
    /// Push this value onto the builder as a bound parameter.
    pub fn push(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Bind::Text(v) => qb.push_bind(v.clone()),
            Bind::Int(v) => qb.push_bind(*v),
            Bind::Bool(v) => qb.push_bind(*v),
            Bind::Date(v) => qb.push_bind(*v),
        };
    }

    /// Map a JSON body value onto a bindable value for `column`.
    ///
    /// Date columns (`*_date`) accept ISO-8601 strings. Foreign-key
    /// columns (`*_id`) accept JSON numbers or numeric strings and must
    /// fit i32 (every numeric column in the schema is int4). Returns
    /// `None` for values that don't fit the column.
    pub fn from_json(column: &str, value: &serde_json::Value) -> Option<Bind> {
        match value {
            serde_json::Value::String(s) if column.ends_with("_date") => {
                s.parse::<NaiveDate>().ok().map(Bind::Date)
            }
            serde_json::Value::String(s) if column.ends_with("_id") => {
                s.parse::<i32>().ok().map(Bind::Int)
            }
            serde_json::Value::String(s) => Some(Bind::Text(s.clone())),
            serde_json::Value::Number(n) => {
                n.as_i64().and_then(|v| i32::try_from(v).ok()).map(Bind::Int)
            }
            serde_json::Value::Bool(b) => Some(Bind::Bool(*b)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SetValue — one slot of an UPDATE ... SET list
// ---------------------------------------------------------------------------

/// Value for an UPDATE SET slot: a bound value, or an explicit NULL to
/// clear a nullable column.
#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    Value(Bind),
    Null,
}

impl SetValue {
    /// Map a JSON body value for `column`. JSON `null` clears the column;
    /// anything else must bind, so `None` means the value is invalid for
    /// the column (the caller rejects the request, never drops the field).
    pub fn from_json(column: &str, value: &serde_json::Value) -> Option<SetValue> {
        if value.is_null() {
            return Some(SetValue::Null);
        }
        Bind::from_json(column, value).map(SetValue::Value)
    }

    pub fn push(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            SetValue::Value(bind) => bind.push(qb),
            SetValue::Null => {
                qb.push("NULL");
            }
        }
    }
}

impl From<&str> for Bind {
    fn from(v: &str) -> Self {
        Bind::Text(v.to_string())
    }
}

impl From<String> for Bind {
    fn from(v: String) -> Self {
        Bind::Text(v)
    }
}

impl From<i32> for Bind {
    fn from(v: i32) -> Self {
        Bind::Int(v)
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// AND-combined equality conditions against qualified column names.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, Bind)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Bind>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    /// Reject any condition whose column is not in `allowed`.
    pub fn check_columns(&self, allowed: &[String]) -> Result<()> {
        for (column, _) in &self.conditions {
            if !allowed.iter().any(|a| a == column) {
                return Err(MyraError::InvalidFilterColumn(column.clone()));
            }
        }
        Ok(())
    }

    /// Append ` WHERE c1 = $n AND c2 = $m ...` to the builder.
    /// Appends nothing when the filter is empty.
    pub fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, (column, value)) in self.conditions.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            qb.push(column.as_str());
            qb.push(" = ");
            value.push(qb);
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// 1-indexed page selection. `offset = limit * (page - 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Saturates instead of overflowing: `page` and `limit` come straight
    /// off the query string, and a saturated offset is simply past the
    /// end of any result set.
    pub fn offset(&self) -> i64 {
        self.limit.saturating_mul(self.page.saturating_sub(1))
    }

    /// Append ` LIMIT n OFFSET m` to the builder.
    pub fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" LIMIT ");
        qb.push_bind(self.limit);
        qb.push(" OFFSET ");
        qb.push_bind(self.offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_limit_times_page_minus_one() {
        assert_eq!(Pagination { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(Pagination { page: 3, limit: 25 }.offset(), 50);
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        let p = Pagination { page: i64::MAX, limit: i64::MAX };
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn filter_renders_where_clause_with_binds() {
        let filter = Filter::new()
            .eq("agreement.forest_file_id", "RAN072522")
            .eq("agreement.zone_id", 4);
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 FROM agreement");
        filter.apply(&mut qb);
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM agreement WHERE agreement.forest_file_id = $1 AND agreement.zone_id = $2"
        );
    }

    #[test]
    fn empty_filter_appends_nothing() {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1");
        Filter::new().apply(&mut qb);
        assert_eq!(qb.sql(), "SELECT 1");
    }

    #[test]
    fn check_columns_rejects_unknown_column() {
        let allowed = vec!["agreement.zone_id".to_string()];
        let ok = Filter::new().eq("agreement.zone_id", 1).check_columns(&allowed);
        assert!(ok.is_ok());
        let bad = Filter::new().eq("agreement.nope", 1).check_columns(&allowed);
        assert!(matches!(bad, Err(MyraError::InvalidFilterColumn(_))));
    }

    #[test]
    fn json_date_columns_parse_to_dates() {
        let v = serde_json::json!("2019-01-31");
        let bind = Bind::from_json("agreement_start_date", &v).unwrap();
        assert_eq!(bind, Bind::Date("2019-01-31".parse().unwrap()));
    }

    #[test]
    fn json_numbers_must_fit_i32() {
        let v = serde_json::json!(7);
        assert_eq!(Bind::from_json("zone_id", &v), Some(Bind::Int(7)));
        let too_big = serde_json::json!(i64::MAX);
        assert_eq!(Bind::from_json("zone_id", &too_big), None);
    }

    #[test]
    fn id_columns_accept_numeric_strings_only() {
        assert_eq!(Bind::from_json("zone_id", &serde_json::json!("5")), Some(Bind::Int(5)));
        assert_eq!(Bind::from_json("zone_id", &serde_json::json!("abc")), None);
    }

    #[test]
    fn malformed_date_is_not_bindable() {
        assert_eq!(Bind::from_json("agreement_start_date", &serde_json::json!("garbage")), None);
    }

    #[test]
    fn set_value_null_clears_and_invalid_is_rejected() {
        assert_eq!(
            SetValue::from_json("agreement_end_date", &serde_json::Value::Null),
            Some(SetValue::Null)
        );
        assert_eq!(SetValue::from_json("agreement_start_date", &serde_json::json!("garbage")), None);
    }

    #[test]
    fn set_value_null_renders_null_keyword() {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE agreement SET agreement_end_date = ");
        SetValue::Null.push(&mut qb);
        assert_eq!(qb.sql(), "UPDATE agreement SET agreement_end_date = NULL");
    }
}
