//! Reference-data seeding. Deploy-time only: request handlers never touch
//! these tables.
//!
//! Each table is seeded delete-then-insert with ids assigned 1..n in
//! listed order, so re-running is safe and deterministic.

use sqlx::{PgPool, Postgres, Transaction};

use crate::error::Result;

/// (code, description) rows for one reference table.
type RefRows = &'static [(&'static str, &'static str)];

const AGREEMENT_TYPES: RefRows = &[
    ("E01", "Grazing Licence"),
    ("E02", "Grazing Permit"),
    ("H01", "Haycutting Licence"),
    ("H02", "Haycutting Permit"),
];

const AGREEMENT_STATUSES: RefRows = &[
    ("N", "Not Exempt"),
    ("P", "Pending Exemption"),
    ("E", "Exempt"),
];

const CLIENT_TYPES: RefRows = &[
    ("A", "Agreement Holder"),
    ("B", "Associate"),
    ("O", "Other"),
];

const LIVESTOCK_TYPES: RefRows = &[
    ("C1", "Cow with Calf"),
    ("B1", "Bull"),
    ("Y1", "Yearling"),
    ("H1", "Horse"),
    ("S1", "Sheep"),
];

const LIVESTOCK_IDENTIFIER_TYPES: RefRows = &[("BR", "Brand"), ("TG", "Ear Tag")];

const LIVESTOCK_IDENTIFIER_LOCATIONS: RefRows = &[
    ("LH", "Left Hip"),
    ("RH", "Right Hip"),
    ("LS", "Left Shoulder"),
    ("RS", "Right Shoulder"),
];

const PLAN_STATUSES: RefRows = &[
    ("C", "Created"),
    ("P", "Pending"),
    ("A", "Approved"),
];

const DISTRICTS: &[(&str, &str)] = &[
    ("DCC", "Cariboo-Chilcotin Natural Resource District"),
    ("DKA", "Thompson Rivers Natural Resource District"),
    ("DMH", "100 Mile House Natural Resource District"),
];

/// (code, description, contact_name, district_id)
const ZONES: &[(&str, &str, &str, i32)] = &[
    ("CHWK", "Chilcotin West", "Amanda Huddleston", 1),
    ("CHEA", "Chilcotin East", "Ron Surgeson", 1),
    ("KAMN", "Kamloops North", "Meredith Dunstan", 2),
    ("KAMS", "Kamloops South", "Harvey Olsen", 2),
    ("MILE", "100 Mile", "Priya Natarajan", 3),
];

async fn seed_ref_table(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    rows: RefRows,
) -> Result<()> {
    let delete = format!("DELETE FROM {table}");
    sqlx::query(&delete).execute(&mut **tx).await?;

    let insert = format!("INSERT INTO {table} (id, code, description, active) VALUES ($1, $2, $3, TRUE)");
    for (index, (code, description)) in rows.iter().enumerate() {
        sqlx::query(&insert)
            .bind(index as i32 + 1)
            .bind(code)
            .bind(description)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Seed every reference table in one transaction.
pub async fn seed_reference_data(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    seed_ref_table(&mut tx, "ref_agreement_type", AGREEMENT_TYPES).await?;
    seed_ref_table(&mut tx, "ref_agreement_status", AGREEMENT_STATUSES).await?;
    seed_ref_table(&mut tx, "ref_client_type", CLIENT_TYPES).await?;
    seed_ref_table(&mut tx, "ref_livestock_type", LIVESTOCK_TYPES).await?;
    seed_ref_table(&mut tx, "ref_livestock_identifier_type", LIVESTOCK_IDENTIFIER_TYPES).await?;
    seed_ref_table(
        &mut tx,
        "ref_livestock_identifier_location",
        LIVESTOCK_IDENTIFIER_LOCATIONS,
    )
    .await?;
    seed_ref_table(&mut tx, "ref_plan_status", PLAN_STATUSES).await?;

    // Districts and zones carry extra columns, seeded in dependency order.
    sqlx::query("DELETE FROM ref_zone").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM ref_district").execute(&mut *tx).await?;

    for (index, (code, description)) in DISTRICTS.iter().enumerate() {
        sqlx::query("INSERT INTO ref_district (id, code, description) VALUES ($1, $2, $3)")
            .bind(index as i32 + 1)
            .bind(code)
            .bind(description)
            .execute(&mut *tx)
            .await?;
    }

    for (index, (code, description, contact_name, district_id)) in ZONES.iter().enumerate() {
        sqlx::query(
            "INSERT INTO ref_zone (id, code, description, contact_name, district_id) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(index as i32 + 1)
        .bind(code)
        .bind(description)
        .bind(contact_name)
        .bind(district_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!("reference data seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreement_type_rows_match_deployed_codes() {
        let codes: Vec<&str> = AGREEMENT_TYPES.iter().map(|(c, _)| *c).collect();
        assert_eq!(codes, vec!["E01", "E02", "H01", "H02"]);
    }

    #[test]
    fn zone_district_ids_are_valid() {
        for (_, _, _, district_id) in ZONES {
            assert!(*district_id >= 1 && *district_id <= DISTRICTS.len() as i32);
        }
    }
}
