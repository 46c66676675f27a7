use serde::{Deserialize, Serialize};

use crate::contract::model::{Cabinet, ImportSummary, NewCabinet, RosterEntry, DEFAULT_CABINET_TYPE};

/// REST DTO for a roster entry.
#[derive(Debug, Clone, Serialize)]
pub struct RosterEntryDto {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub matricule: String,
}

/// REST DTO for a cabinet as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinetDto {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_featured: bool,
    #[serde(rename = "type")]
    pub cabinet_type: String,
    pub matricule: String,
}

/// REST DTO for creating or updating a cabinet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinetReq {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(rename = "type", default)]
    pub cabinet_type: Option<String>,
    pub matricule: String,
}

/// REST DTO summarizing one spreadsheet import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummaryDto {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub message: String,
}

/// Generic `{"message": …}` success body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub message: String,
}

impl From<RosterEntry> for RosterEntryDto {
    fn from(e: RosterEntry) -> Self {
        Self {
            id: e.id,
            nom: e.nom,
            prenom: e.prenom,
            matricule: e.matricule,
        }
    }
}

impl From<Cabinet> for CabinetDto {
    fn from(c: Cabinet) -> Self {
        Self {
            id: c.id,
            name: c.name,
            address: c.address,
            city: c.city,
            phone: c.phone,
            latitude: c.latitude,
            longitude: c.longitude,
            is_featured: c.is_featured,
            cabinet_type: c.cabinet_type,
            matricule: c.matricule,
        }
    }
}

impl From<CabinetReq> for NewCabinet {
    fn from(req: CabinetReq) -> Self {
        Self {
            name: req.name,
            address: req.address,
            city: req.city,
            phone: req.phone,
            latitude: req.latitude,
            longitude: req.longitude,
            is_featured: req.is_featured,
            cabinet_type: req
                .cabinet_type
                .unwrap_or_else(|| DEFAULT_CABINET_TYPE.to_string()),
            matricule: req.matricule,
        }
    }
}

impl From<ImportSummary> for ImportSummaryDto {
    fn from(s: ImportSummary) -> Self {
        Self {
            created: s.created,
            updated: s.updated,
            skipped: s.skipped,
            message: format!(
                "Import terminé: {} créés, {} mis à jour, {} ignorés",
                s.created, s.updated, s.skipped
            ),
        }
    }
}
