//! Column-name plumbing shared by the model layer.
//!
//! Storage columns are snake_case; the external API is camelCase. Update
//! bodies arrive camelCase and must be folded back to columns before they
//! reach the query builder. Joined selects alias foreign columns as
//! `<table>_<column>` so rows stay flat and collision-free.

/// Convert a camelCase field name to its snake_case column name.
/// Already-snake_case input passes through unchanged.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Qualify `fields` with their table: `["id", "code"]` → `["ref_zone.id", ...]`.
pub fn qualified(table: &str, fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| format!("{table}.{f}")).collect()
}

/// Qualified-and-aliased select entries for a joined table:
/// `ref_zone.id AS ref_zone_id`. The alias doubles as the flat row
/// struct's column name.
pub fn aliased(table: &str, fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .map(|f| format!("{table}.{f} AS {table}_{f}"))
        .collect()
}
