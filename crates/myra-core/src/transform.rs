//! Transform layer: reshape relation-decorated query results into the
//! external API contract.
//!
//! Every endpoint serializes an explicit DTO; bookkeeping columns never
//! appear because they are not on the DTOs.

use serde::Serialize;

use crate::models::{
    Agreement, AgreementType, ClientAssociation, GrazingSchedule, LivestockIdentifier, Pasture,
    Plan, RefRecord, Usage, Zone,
};

/// Client as the API presents it: the raw association row is dropped and
/// the role resolves to its code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: i32,
    pub name: String,
    pub location: Option<String>,
    pub client_type_code: Option<String>,
}

/// Agreement as the API presents it, with transformed clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementDto {
    pub forest_file_id: String,
    pub agreement_start_date: Option<chrono::NaiveDate>,
    pub agreement_end_date: Option<chrono::NaiveDate>,
    pub agreement_type_id: i32,
    pub agreement_exemption_status_id: Option<i32>,
    pub zone: Zone,
    pub agreement_type: AgreementType,
    pub clients: Vec<ClientDto>,
    // child collections attached only where the endpoint loads them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plans: Option<Vec<Plan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Vec<Usage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub livestock_identifiers: Option<Vec<LivestockIdentifier>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grazing_schedules: Option<Vec<GrazingSchedule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pastures: Option<Vec<Pasture>>,
}

/// Resolve each client's role code from the reference rows and sort by
/// `clientTypeCode` ascending. A `client_type_id` with no matching
/// reference row yields a null code and sorts after all known codes.
pub fn transform_clients(
    clients: &[ClientAssociation],
    client_types: &[RefRecord],
) -> Vec<ClientDto> {
    let mut out: Vec<ClientDto> = clients
        .iter()
        .map(|c| {
            let code = c
                .client_type_id
                .and_then(|id| client_types.iter().find(|t| t.id == id))
                .map(|t| t.code.clone());
            ClientDto {
                id: c.id,
                name: c.name.clone(),
                location: c.location.clone(),
                client_type_code: code,
            }
        })
        .collect();

    out.sort_by(|a, b| {
        let ka = (a.client_type_code.is_none(), &a.client_type_code, &a.name);
        let kb = (b.client_type_code.is_none(), &b.client_type_code, &b.name);
        ka.cmp(&kb)
    });
    out
}

/// Build the external agreement shape with `clients` replaced by the
/// transformed, sorted list.
pub fn transform_agreement(
    agreement: &Agreement,
    clients: &[ClientAssociation],
    client_types: &[RefRecord],
) -> AgreementDto {
    AgreementDto {
        forest_file_id: agreement.forest_file_id.clone(),
        agreement_start_date: agreement.agreement_start_date,
        agreement_end_date: agreement.agreement_end_date,
        agreement_type_id: agreement.agreement_type_id,
        agreement_exemption_status_id: agreement.agreement_exemption_status_id,
        zone: agreement.zone.clone(),
        agreement_type: agreement.agreement_type.clone(),
        clients: transform_clients(clients, client_types),
        plans: None,
        usage: None,
        livestock_identifiers: None,
        grazing_schedules: None,
        pastures: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: i32, name: &str, type_id: Option<i32>) -> ClientAssociation {
        ClientAssociation {
            id,
            name: name.to_string(),
            location: None,
            client_type_id: type_id,
        }
    }

    fn ctype(id: i32, code: &str) -> RefRecord {
        RefRecord {
            id,
            code: code.to_string(),
            description: None,
            active: true,
        }
    }

    fn sample_types() -> Vec<RefRecord> {
        vec![ctype(1, "A"), ctype(2, "L"), ctype(3, "O")]
    }

    #[test]
    fn clients_sort_ascending_by_type_code() {
        let clients = vec![
            client(1, "Lazy L Ranch", Some(2)),
            client(2, "Okanagan Cattle Co", Some(3)),
            client(3, "Aspen Grove", Some(1)),
        ];
        let out = transform_clients(&clients, &sample_types());
        let codes: Vec<_> = out
            .iter()
            .map(|c| c.client_type_code.as_deref().unwrap())
            .collect();
        assert_eq!(codes, vec!["A", "L", "O"]);
    }

    #[test]
    fn unknown_client_type_yields_null_code_and_sorts_last() {
        let clients = vec![
            client(1, "Nowhere Ranch", Some(99)),
            client(2, "Aspen Grove", Some(1)),
        ];
        let out = transform_clients(&clients, &sample_types());
        assert_eq!(out[0].client_type_code.as_deref(), Some("A"));
        assert_eq!(out[1].client_type_code, None);
    }

    #[test]
    fn transform_is_idempotent() {
        let clients = vec![
            client(1, "Lazy L Ranch", Some(2)),
            client(2, "Aspen Grove", Some(1)),
        ];
        let once = transform_clients(&clients, &sample_types());
        let twice = transform_clients(&clients, &sample_types());
        assert_eq!(once, twice);
    }

    #[test]
    fn unloaded_child_collections_are_absent_from_json() {
        use crate::models::{AgreementType, District, Zone};

        let agreement = Agreement {
            forest_file_id: "RAN072522".into(),
            agreement_start_date: None,
            agreement_end_date: None,
            agreement_type_id: 1,
            agreement_exemption_status_id: None,
            zone: Zone {
                id: 1,
                code: "CHWK".into(),
                description: None,
                contact_name: None,
                district_id: 1,
                user_id: None,
                district: Some(District {
                    id: 1,
                    code: "DCC".into(),
                    description: None,
                }),
            },
            agreement_type: AgreementType {
                id: 1,
                code: "E01".into(),
                description: None,
                active: true,
            },
        };

        let dto = transform_agreement(&agreement, &[], &sample_types());
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["forestFileId"], "RAN072522");
        assert!(json.get("plans").is_none());
        assert!(json.get("usage").is_none());
        assert!(json.get("grazingSchedules").is_none());
        assert!(json.get("pastures").is_none());
    }

    #[test]
    fn dto_serializes_camel_case() {
        let out = transform_clients(&[client(1, "Aspen Grove", Some(1))], &sample_types());
        let json = serde_json::to_value(&out[0]).unwrap();
        assert_eq!(json["clientTypeCode"], "A");
        assert!(json.get("client_type_code").is_none());
    }
}
