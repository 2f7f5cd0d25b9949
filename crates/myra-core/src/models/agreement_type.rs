use serde::{Deserialize, Serialize};

/// Agreement type (grazing/haycutting licence or permit). Seeded once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AgreementType {
    pub id: i32,
    pub code: String,
    pub description: Option<String>,
    pub active: bool,
}

impl AgreementType {
    pub const TABLE: &'static str = "ref_agreement_type";

    // primary key must be first
    pub const FIELDS: &'static [&'static str] = &["id", "code", "description", "active"];
}
