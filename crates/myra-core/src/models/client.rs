use serde::{Deserialize, Serialize};
use sqlx::postgres::PgExecutor;

use crate::error::Result;

/// A client joined through `client_agreement`; `client_type_id` is the
/// association attribute recording the client's role on that agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClientAssociation {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub client_type_id: Option<i32>,
}

impl ClientAssociation {
    /// Clients holding rights under `forest_file_id`, with their role id.
    pub async fn for_agreement<'e, E>(db: E, forest_file_id: &str) -> Result<Vec<ClientAssociation>>
    where
        E: PgExecutor<'e>,
    {
        let rows = sqlx::query_as::<_, ClientAssociation>(
            "SELECT client.id, client.name, client.location, \
             client_agreement.client_type_id \
             FROM client \
             JOIN client_agreement ON client_agreement.client_id = client.id \
             WHERE client_agreement.agreement_id = $1",
        )
        .bind(forest_file_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
