/// One row of the eligible-professional roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub id: i64,
    pub nom: String,
    pub prenom: String,
    pub matricule: String,
}

/// A geographic point, WGS84.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A veterinary cabinet (or shop) shown on the public map.
#[derive(Debug, Clone, PartialEq)]
pub struct Cabinet {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_featured: bool,
    pub cabinet_type: String,
    pub matricule: String,
}

/// Cabinet fields as submitted by a client or an import row; identity is
/// the canonical (name, address) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCabinet {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_featured: bool,
    pub cabinet_type: String,
    pub matricule: String,
}

pub const DEFAULT_CABINET_TYPE: &str = "BOUTIQUE";

/// A user's veterinary profile: optional portrait and plan hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub subscription_type_hint: Option<String>,
    pub image_path: Option<String>,
}

/// Result of one spreadsheet import: rows written vs. rows skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}
