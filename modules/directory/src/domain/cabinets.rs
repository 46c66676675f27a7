use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::contract::model::{Cabinet, Coordinates, ImportSummary, NewCabinet};
use crate::domain::error::DomainError;
use crate::domain::ports::Geocoder;
use crate::domain::repo::{CabinetsRepository, RosterRepository};
use crate::import::xlsx;

const CABINET_HEADERS: &[&str] = &[
    "name",
    "address",
    "city",
    "phone",
    "latitude",
    "longitude",
    "type",
    "matricule",
];

/// Geocoding policy: the queries escalate from precise to city-level, and a
/// hardcoded coordinate absorbs total failure so imports never stall on the
/// external service.
#[derive(Debug, Clone)]
pub struct GeocodeSettings {
    pub fallback_query: String,
    pub fallback: Coordinates,
    /// Minimum gap between external calls (the service asks for 1 req/s).
    pub throttle: Duration,
}

/// Manages cabinet listings: CRUD plus spreadsheet import with geocoding.
#[derive(Clone)]
pub struct CabinetService {
    repo: Arc<dyn CabinetsRepository>,
    roster: Arc<dyn RosterRepository>,
    geocoder: Arc<dyn Geocoder>,
    settings: GeocodeSettings,
}

impl CabinetService {
    pub fn new(
        repo: Arc<dyn CabinetsRepository>,
        roster: Arc<dyn RosterRepository>,
        geocoder: Arc<dyn Geocoder>,
        settings: GeocodeSettings,
    ) -> Self {
        Self {
            repo,
            roster,
            geocoder,
            settings,
        }
    }

    /// Save a cabinet submitted over the API; upserts on the canonical
    /// (name, address) pair. Rows lacking coordinates are geocoded.
    #[instrument(name = "directory.cabinets.save", skip(self, cabinet), fields(name = %cabinet.name))]
    pub async fn save(&self, cabinet: NewCabinet) -> Result<Cabinet, DomainError> {
        self.validate(&cabinet)?;
        self.require_roster_matricule(&cabinet.matricule).await?;

        let (latitude, longitude) = self.resolve_coordinates(&cabinet).await;

        match self
            .repo
            .find_by_name_and_address(&cabinet.name, &cabinet.address)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            Some(existing) => {
                info!("Mise à jour du cabinet vétérinaire: {}", cabinet.name);
                self.repo
                    .update(existing.id, cabinet, latitude, longitude)
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))
            }
            None => {
                info!("Création d'un nouveau cabinet vétérinaire: {}", cabinet.name);
                self.repo
                    .insert(cabinet, latitude, longitude)
                    .await
                    .map_err(|e| DomainError::database(e.to_string()))
            }
        }
    }

    /// Update an existing cabinet by id.
    #[instrument(name = "directory.cabinets.update", skip(self, cabinet))]
    pub async fn update(&self, id: i64, cabinet: NewCabinet) -> Result<Cabinet, DomainError> {
        self.validate(&cabinet)?;
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::CabinetNotFound { id })?;
        self.require_roster_matricule(&cabinet.matricule).await?;

        let (latitude, longitude) = self.resolve_coordinates(&cabinet).await;
        self.repo
            .update(id, cabinet, latitude, longitude)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    #[instrument(name = "directory.cabinets.delete", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or(DomainError::CabinetNotFound { id })?;
        self.repo
            .delete(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        info!("Cabinet vétérinaire {id} supprimé");
        Ok(())
    }

    #[instrument(name = "directory.cabinets.list", skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Cabinet>, DomainError> {
        self.repo
            .list_all()
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Import an XLSX cabinet sheet. Row-level faults (missing fields,
    /// matricule absent from the roster) skip the row; only an unreadable
    /// file aborts.
    #[instrument(name = "directory.cabinets.import", skip(self, bytes))]
    pub async fn import_xlsx(&self, bytes: &[u8]) -> Result<ImportSummary, DomainError> {
        let rows = xlsx::read_rows(bytes, CABINET_HEADERS)?;
        self.import_rows(rows).await
    }

    /// Row-level half of the import, also the seam the tests drive.
    pub async fn import_rows(
        &self,
        rows: Vec<xlsx::SheetRow>,
    ) -> Result<ImportSummary, DomainError> {
        let mut summary = ImportSummary::default();

        for (index, row) in rows.iter().enumerate() {
            let line = index + 2;
            let cabinet = match row_to_cabinet(row) {
                Ok(c) => c,
                Err(reason) => {
                    warn!("Ligne {line} ignorée: {reason}");
                    summary.skipped += 1;
                    continue;
                }
            };

            if !self
                .roster_has(&cabinet.matricule)
                .await
                .map_err(|e| DomainError::database(e.to_string()))?
            {
                warn!(
                    "Ligne {line} ignorée: matricule {} absent de la liste des vétérinaires",
                    cabinet.matricule
                );
                summary.skipped += 1;
                continue;
            }

            let (latitude, longitude) = self.resolve_coordinates(&cabinet).await;

            let existing = self
                .repo
                .find_by_name_and_address(&cabinet.name, &cabinet.address)
                .await
                .map_err(|e| DomainError::database(e.to_string()))?;
            match existing {
                Some(found) => {
                    self.repo
                        .update(found.id, cabinet, latitude, longitude)
                        .await
                        .map_err(|e| DomainError::database(e.to_string()))?;
                    summary.updated += 1;
                }
                None => {
                    self.repo
                        .insert(cabinet, latitude, longitude)
                        .await
                        .map_err(|e| DomainError::database(e.to_string()))?;
                    summary.created += 1;
                }
            }
        }

        info!(
            "Cabinet import: {} created, {} updated, {} skipped",
            summary.created, summary.updated, summary.skipped
        );
        Ok(summary)
    }

    fn validate(&self, cabinet: &NewCabinet) -> Result<(), DomainError> {
        if cabinet.name.trim().is_empty() {
            return Err(DomainError::missing_field("Le nom du cabinet"));
        }
        if cabinet.address.trim().is_empty() {
            return Err(DomainError::missing_field("L'adresse du cabinet"));
        }
        if cabinet.matricule.trim().is_empty() {
            return Err(DomainError::missing_field("Le matricule du cabinet"));
        }
        Ok(())
    }

    async fn roster_has(&self, matricule: &str) -> anyhow::Result<bool> {
        Ok(self.roster.find_by_matricule(matricule).await?.is_some())
    }

    async fn require_roster_matricule(&self, matricule: &str) -> Result<(), DomainError> {
        if self
            .roster_has(matricule)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            Ok(())
        } else {
            Err(DomainError::matricule_not_in_roster(matricule))
        }
    }

    /// Supplied coordinates win; otherwise escalate through three queries and
    /// finally the hardcoded fallback. Never fails the caller.
    async fn resolve_coordinates(&self, cabinet: &NewCabinet) -> (f64, f64) {
        if let (Some(lat), Some(lon)) = (cabinet.latitude, cabinet.longitude) {
            return (lat, lon);
        }

        for query in self.escalating_queries(cabinet) {
            tokio::time::sleep(self.settings.throttle).await;
            match self.geocoder.geocode(&query).await {
                Ok(Some(coords)) => {
                    info!("Geocoded '{query}' to ({}, {})", coords.latitude, coords.longitude);
                    return (coords.latitude, coords.longitude);
                }
                Ok(None) => {
                    warn!("Geocoder found nothing for '{query}'");
                }
                Err(e) => {
                    warn!("Geocoding '{query}' failed: {e}");
                }
            }
        }

        warn!(
            "All geocoding attempts failed for '{}', using fallback coordinate",
            cabinet.address
        );
        (
            self.settings.fallback.latitude,
            self.settings.fallback.longitude,
        )
    }

    fn escalating_queries(&self, cabinet: &NewCabinet) -> Vec<String> {
        let full = normalize_address(&cabinet.address, cabinet.city.as_deref());
        let mut queries = vec![full.clone()];
        let without_number = strip_leading_house_number(&full);
        if without_number != full {
            queries.push(without_number);
        }
        queries.push(self.settings.fallback_query.clone());
        queries
    }
}

fn normalize_address(address: &str, city: Option<&str>) -> String {
    let mut query = address.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some(city) = city {
        let city = city.trim();
        if !city.is_empty() && !query.to_lowercase().contains(&city.to_lowercase()) {
            query = format!("{query}, {city}");
        }
    }
    query
}

fn strip_leading_house_number(address: &str) -> String {
    let trimmed = address.trim_start();
    let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == trimmed.len() {
        return trimmed.to_string();
    }
    rest.trim_start_matches([' ', ',']).to_string()
}

fn row_to_cabinet(row: &[String]) -> Result<NewCabinet, String> {
    if row.len() < CABINET_HEADERS.len() {
        return Err(format!(
            "{} colonnes attendues, {} reçues",
            CABINET_HEADERS.len(),
            row.len()
        ));
    }
    let name = row[0].clone();
    let address = row[1].clone();
    let matricule = row[7].clone();
    if name.is_empty() || address.is_empty() || matricule.is_empty() {
        return Err("les champs name, address et matricule doivent être remplis".to_string());
    }

    let latitude = parse_optional_f64(&row[4], "latitude")?;
    let longitude = parse_optional_f64(&row[5], "longitude")?;
    let cabinet_type = if row[6].is_empty() {
        crate::contract::model::DEFAULT_CABINET_TYPE.to_string()
    } else {
        row[6].clone()
    };

    Ok(NewCabinet {
        name,
        address,
        city: non_empty(&row[2]),
        phone: non_empty(&row[3]),
        latitude,
        longitude,
        is_featured: false,
        cabinet_type,
        matricule,
    })
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_optional_f64(s: &str, field: &str) -> Result<Option<f64>, String> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("{field} invalide: '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_normalization_appends_missing_city() {
        assert_eq!(
            normalize_address("12  rue des   Lilas", Some("Tunis")),
            "12 rue des Lilas, Tunis"
        );
        assert_eq!(
            normalize_address("12 rue des Lilas, Tunis", Some("Tunis")),
            "12 rue des Lilas, Tunis"
        );
    }

    #[test]
    fn house_number_stripping() {
        assert_eq!(
            strip_leading_house_number("12 rue des Lilas, Tunis"),
            "rue des Lilas, Tunis"
        );
        assert_eq!(
            strip_leading_house_number("rue des Lilas"),
            "rue des Lilas"
        );
    }

    #[test]
    fn cabinet_row_defaults_type_when_blank() {
        let row: Vec<String> = [
            "Clinique A",
            "12 rue des Lilas",
            "Tunis",
            "",
            "",
            "",
            "",
            "MAT-001",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let cabinet = row_to_cabinet(&row).unwrap();
        assert_eq!(cabinet.cabinet_type, "BOUTIQUE");
        assert_eq!(cabinet.phone, None);
        assert_eq!(cabinet.latitude, None);
    }

    #[test]
    fn cabinet_row_rejects_truncated_rows() {
        let row: Vec<String> = ["Clinique A", "12 rue des Lilas"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let err = row_to_cabinet(&row).unwrap_err();
        assert!(err.contains("colonnes"));
    }

    #[test]
    fn cabinet_row_rejects_bad_coordinates() {
        let row: Vec<String> = [
            "Clinique A",
            "12 rue des Lilas",
            "",
            "",
            "north",
            "10.18",
            "",
            "MAT-001",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert!(row_to_cabinet(&row).is_err());
    }
}
