use serde::{Deserialize, Serialize};

/// Administrative district. Reference data, immutable after seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct District {
    pub id: i32,
    pub code: String,
    pub description: Option<String>,
}

impl District {
    pub const TABLE: &'static str = "ref_district";

    // primary key must be first
    pub const FIELDS: &'static [&'static str] = &["id", "code", "description"];
}
