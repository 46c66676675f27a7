use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::contract::model::{ImportSummary, RosterEntry};
use crate::domain::error::DomainError;
use crate::domain::repo::RosterRepository;
use crate::import::xlsx;

const ROSTER_HEADERS: &[&str] = &["nom", "prenom", "matricule"];

/// Maintains the eligible-professional roster; registration checks against it.
#[derive(Clone)]
pub struct RosterService {
    repo: Arc<dyn RosterRepository>,
}

impl RosterService {
    pub fn new(repo: Arc<dyn RosterRepository>) -> Self {
        Self { repo }
    }

    pub async fn matricule_exists(&self, matricule: &str) -> Result<bool, DomainError> {
        Ok(self
            .repo
            .find_by_matricule(matricule)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .is_some())
    }

    #[instrument(name = "directory.roster.list", skip(self))]
    pub async fn list_all(&self) -> Result<Vec<RosterEntry>, DomainError> {
        self.repo
            .list_all()
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Import an XLSX roster: upsert by matricule, so re-importing the same
    /// file is idempotent. Incomplete rows are skipped, not fatal.
    #[instrument(name = "directory.roster.import", skip(self, bytes))]
    pub async fn import_xlsx(&self, bytes: &[u8]) -> Result<ImportSummary, DomainError> {
        let rows = xlsx::read_rows(bytes, ROSTER_HEADERS)?;
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
            if row.len() < ROSTER_HEADERS.len() {
                warn!("Ligne {line} tronquée ({} colonnes), ignorée", row.len());
                summary.skipped += 1;
                continue;
            }
            let (nom, prenom, matricule) = (&row[0], &row[1], &row[2]);

            if nom.is_empty() || prenom.is_empty() || matricule.is_empty() {
                warn!("Ligne {line} incomplète (nom, prenom, matricule requis), ignorée");
                summary.skipped += 1;
                continue;
            }

            let created = self
                .repo
                .upsert(nom, prenom, matricule)
                .await
                .map_err(|e| DomainError::database(e.to_string()))?;
            if created {
                summary.created += 1;
            } else {
                summary.updated += 1;
            }
        }

        info!(
            "Roster import: {} created, {} updated, {} skipped",
            summary.created, summary.updated, summary.skipped
        );
        Ok(summary)
    }
}
