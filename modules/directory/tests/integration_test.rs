use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use directory::{
    contract::model::{Cabinet, Coordinates, NewCabinet, Profile, RosterEntry},
    domain::cabinets::{CabinetService, GeocodeSettings},
    domain::error::DomainError,
    domain::ports::Geocoder,
    domain::profiles::{ProfileImage, ProfileService},
    domain::repo::{CabinetsRepository, ProfilesRepository, RosterRepository},
    domain::roster::RosterService,
};

#[derive(Default)]
struct InMemoryRoster {
    rows: Mutex<Vec<RosterEntry>>,
}

#[async_trait]
impl RosterRepository for InMemoryRoster {
    async fn find_by_matricule(&self, matricule: &str) -> Result<Option<RosterEntry>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.matricule == matricule)
            .cloned())
    }

    async fn upsert(&self, nom: &str, prenom: &str, matricule: &str) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = rows.iter_mut().find(|e| e.matricule == matricule) {
            existing.nom = nom.to_string();
            existing.prenom = prenom.to_string();
            Ok(false)
        } else {
            let id = rows.len() as i64 + 1;
            rows.push(RosterEntry {
                id,
                nom: nom.to_string(),
                prenom: prenom.to_string(),
                matricule: matricule.to_string(),
            });
            Ok(true)
        }
    }

    async fn list_all(&self) -> Result<Vec<RosterEntry>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct InMemoryCabinets {
    rows: Mutex<Vec<Cabinet>>,
}

#[async_trait]
impl CabinetsRepository for InMemoryCabinets {
    async fn find_by_id(&self, id: i64) -> Result<Option<Cabinet>> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name_and_address(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Option<Cabinet>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name && c.address == address)
            .cloned())
    }

    async fn insert(&self, cabinet: NewCabinet, latitude: f64, longitude: f64) -> Result<Cabinet> {
        let mut rows = self.rows.lock().unwrap();
        let stored = Cabinet {
            id: rows.len() as i64 + 1,
            name: cabinet.name,
            address: cabinet.address,
            city: cabinet.city,
            phone: cabinet.phone,
            latitude,
            longitude,
            is_featured: cabinet.is_featured,
            cabinet_type: cabinet.cabinet_type,
            matricule: cabinet.matricule,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: i64,
        cabinet: NewCabinet,
        latitude: f64,
        longitude: f64,
    ) -> Result<Cabinet> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| anyhow::anyhow!("no cabinet {id}"))?;
        row.name = cabinet.name;
        row.address = cabinet.address;
        row.city = cabinet.city;
        row.phone = cabinet.phone;
        row.latitude = latitude;
        row.longitude = longitude;
        row.is_featured = cabinet.is_featured;
        row.cabinet_type = cabinet.cabinet_type;
        row.matricule = cabinet.matricule;
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.rows.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Cabinet>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

/// Geocoder stub that records queries and answers from a script.
struct ScriptedGeocoder {
    answers: Mutex<Vec<Option<Coordinates>>>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    fn new(answers: Vec<Option<Coordinates>>) -> Self {
        Self {
            answers: Mutex::new(answers),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>> {
        self.queries.lock().unwrap().push(query.to_string());
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            Ok(None)
        } else {
            Ok(answers.remove(0))
        }
    }
}

fn settings() -> GeocodeSettings {
    GeocodeSettings {
        fallback_query: "Tunis, Tunisia".to_string(),
        fallback: Coordinates {
            latitude: 36.8065,
            longitude: 10.1815,
        },
        throttle: Duration::ZERO,
    }
}

fn roster_with(matricules: &[&str]) -> Arc<InMemoryRoster> {
    let roster = Arc::new(InMemoryRoster::default());
    {
        let mut rows = roster.rows.lock().unwrap();
        for (i, m) in matricules.iter().enumerate() {
            rows.push(RosterEntry {
                id: i as i64 + 1,
                nom: "Dupont".to_string(),
                prenom: "Alice".to_string(),
                matricule: m.to_string(),
            });
        }
    }
    roster
}

fn cabinet(name: &str, matricule: &str) -> NewCabinet {
    NewCabinet {
        name: name.to_string(),
        address: "12 rue des Lilas".to_string(),
        city: Some("Tunis".to_string()),
        phone: None,
        latitude: None,
        longitude: None,
        is_featured: false,
        cabinet_type: "BOUTIQUE".to_string(),
        matricule: matricule.to_string(),
    }
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

// --- roster import ---

#[tokio::test]
async fn roster_reimport_is_idempotent() -> Result<()> {
    let repo = Arc::new(InMemoryRoster::default());
    let service = RosterService::new(repo.clone());

    let rows = vec![
        row(&["Dupont", "Alice", "MAT-001"]),
        row(&["Martin", "Bob", "MAT-002"]),
    ];
    let first = service.import_rows(rows.clone()).await?;
    assert_eq!((first.created, first.updated, first.skipped), (2, 0, 0));

    let second = service.import_rows(rows).await?;
    assert_eq!((second.created, second.updated, second.skipped), (0, 2, 0));
    assert_eq!(repo.list_all().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn roster_import_updates_names_in_place() -> Result<()> {
    let repo = Arc::new(InMemoryRoster::default());
    let service = RosterService::new(repo.clone());

    service
        .import_rows(vec![row(&["Dupont", "Alice", "MAT-001"])])
        .await?;
    service
        .import_rows(vec![row(&["Durand", "Alice", "MAT-001"])])
        .await?;

    let all = repo.list_all().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].nom, "Durand");

    Ok(())
}

#[tokio::test]
async fn roster_import_skips_incomplete_rows() -> Result<()> {
    let repo = Arc::new(InMemoryRoster::default());
    let service = RosterService::new(repo.clone());

    let summary = service
        .import_rows(vec![
            row(&["Dupont", "Alice", "MAT-001"]),
            row(&["", "Bob", "MAT-002"]),
            row(&["Martin", "Bob", ""]),
        ])
        .await?;
    assert_eq!((summary.created, summary.skipped), (1, 2));

    Ok(())
}

#[tokio::test]
async fn roster_import_skips_truncated_rows() -> Result<()> {
    let repo = Arc::new(InMemoryRoster::default());
    let service = RosterService::new(repo.clone());

    let summary = service
        .import_rows(vec![
            row(&["Dupont", "Alice", "MAT-001"]),
            row(&["Martin", "Bob"]),
            row(&[]),
        ])
        .await?;
    assert_eq!((summary.created, summary.skipped), (1, 2));
    assert_eq!(repo.list_all().await?.len(), 1);

    Ok(())
}

// --- cabinets ---

#[tokio::test]
async fn cabinet_save_requires_roster_matricule() -> Result<()> {
    let cabinets = Arc::new(InMemoryCabinets::default());
    let geocoder = Arc::new(ScriptedGeocoder::new(vec![]));
    let service = CabinetService::new(cabinets, roster_with(&[]), geocoder, settings());

    let err = service.save(cabinet("Clinique A", "MAT-404")).await.unwrap_err();
    assert!(matches!(err, DomainError::MatriculeNotInRoster { .. }));

    Ok(())
}

#[tokio::test]
async fn cabinet_save_geocodes_missing_coordinates() -> Result<()> {
    let cabinets = Arc::new(InMemoryCabinets::default());
    let geocoder = Arc::new(ScriptedGeocoder::new(vec![Some(Coordinates {
        latitude: 36.9,
        longitude: 10.2,
    })]));
    let service = CabinetService::new(
        cabinets,
        roster_with(&["MAT-001"]),
        geocoder.clone(),
        settings(),
    );

    let saved = service.save(cabinet("Clinique A", "MAT-001")).await?;
    assert_eq!((saved.latitude, saved.longitude), (36.9, 10.2));
    assert_eq!(geocoder.queries(), vec!["12 rue des Lilas, Tunis"]);

    Ok(())
}

#[tokio::test]
async fn geocoding_escalates_and_falls_back_to_fixed_coordinate() -> Result<()> {
    let cabinets = Arc::new(InMemoryCabinets::default());
    let geocoder = Arc::new(ScriptedGeocoder::new(vec![None, None, None]));
    let service = CabinetService::new(
        cabinets,
        roster_with(&["MAT-001"]),
        geocoder.clone(),
        settings(),
    );

    let saved = service.save(cabinet("Clinique A", "MAT-001")).await?;
    assert_eq!((saved.latitude, saved.longitude), (36.8065, 10.1815));
    assert_eq!(
        geocoder.queries(),
        vec![
            "12 rue des Lilas, Tunis",
            "rue des Lilas, Tunis",
            "Tunis, Tunisia"
        ]
    );

    Ok(())
}

#[tokio::test]
async fn cabinet_save_upserts_on_name_and_address() -> Result<()> {
    let cabinets = Arc::new(InMemoryCabinets::default());
    let geocoder = Arc::new(ScriptedGeocoder::new(vec![]));
    let service = CabinetService::new(
        cabinets.clone(),
        roster_with(&["MAT-001"]),
        geocoder,
        settings(),
    );

    let mut c = cabinet("Clinique A", "MAT-001");
    c.latitude = Some(36.0);
    c.longitude = Some(10.0);
    let first = service.save(c.clone()).await?;

    c.phone = Some("21612345".to_string());
    let second = service.save(c).await?;
    assert_eq!(first.id, second.id);
    assert_eq!(cabinets.list_all().await?.len(), 1);
    assert_eq!(second.phone.as_deref(), Some("21612345"));

    Ok(())
}

#[tokio::test]
async fn cabinet_import_skips_rows_with_unknown_matricule() -> Result<()> {
    let cabinets = Arc::new(InMemoryCabinets::default());
    let geocoder = Arc::new(ScriptedGeocoder::new(vec![]));
    let service = CabinetService::new(
        cabinets.clone(),
        roster_with(&["MAT-001"]),
        geocoder,
        settings(),
    );

    let summary = service
        .import_rows(vec![
            row(&[
                "Clinique A",
                "12 rue des Lilas",
                "Tunis",
                "",
                "36.8",
                "10.1",
                "",
                "MAT-001",
            ]),
            row(&[
                "Clinique B",
                "3 avenue Bourguiba",
                "Tunis",
                "",
                "36.8",
                "10.2",
                "",
                "MAT-404",
            ]),
            row(&["", "", "", "", "", "", "", ""]),
            row(&["Clinique C", "9 rue du Lac"]),
        ])
        .await?;

    assert_eq!((summary.created, summary.updated, summary.skipped), (1, 0, 3));
    assert_eq!(cabinets.list_all().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn cabinet_delete_unknown_id_fails() -> Result<()> {
    let cabinets = Arc::new(InMemoryCabinets::default());
    let geocoder = Arc::new(ScriptedGeocoder::new(vec![]));
    let service = CabinetService::new(cabinets, roster_with(&[]), geocoder, settings());

    let err = service.delete(9).await.unwrap_err();
    assert!(matches!(err, DomainError::CabinetNotFound { id: 9 }));

    Ok(())
}

// --- profiles ---

#[derive(Default)]
struct InMemoryProfiles {
    rows: Mutex<Vec<Profile>>,
}

#[async_trait]
impl ProfilesRepository for InMemoryProfiles {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Profile>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn insert(
        &self,
        user_id: i64,
        subscription_type_hint: Option<String>,
        image_path: Option<String>,
    ) -> Result<Profile> {
        let mut rows = self.rows.lock().unwrap();
        let stored = Profile {
            id: rows.len() as i64 + 1,
            user_id,
            subscription_type_hint,
            image_path,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: i64,
        subscription_type_hint: Option<String>,
        image_path: Option<String>,
    ) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| anyhow::anyhow!("no profile {id}"))?;
        row.subscription_type_hint = subscription_type_hint;
        row.image_path = image_path;
        Ok(())
    }
}

#[tokio::test]
async fn profile_update_creates_then_merges() -> Result<()> {
    let media = tempfile::tempdir()?;
    let repo = Arc::new(InMemoryProfiles::default());
    let service = ProfileService::new(repo.clone(), media.path().to_path_buf());

    let created = service
        .update_profile(1, None, Some("MONTHLY".to_string()))
        .await?;
    assert_eq!(created.subscription_type_hint.as_deref(), Some("MONTHLY"));
    assert_eq!(created.image_path, None);

    let updated = service
        .update_profile(
            1,
            Some(ProfileImage {
                file_name: "portrait.png".to_string(),
                bytes: vec![1, 2, 3],
            }),
            None,
        )
        .await?;
    // The earlier hint survives an image-only update.
    assert_eq!(updated.subscription_type_hint.as_deref(), Some("MONTHLY"));
    let path = updated.image_path.expect("image stored");
    assert!(path.starts_with("veterinaires/1_"));
    assert_eq!(std::fs::read(media.path().join(&path))?, vec![1, 2, 3]);

    Ok(())
}
