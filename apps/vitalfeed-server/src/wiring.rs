//! Builds the full application router: repositories over the shared
//! connection, domain services, the authorization gate, and the background
//! reminder job.

use anyhow::{Context, Result};
use axum::{middleware, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use accounts::auth::gate::{authorize, AuthGate};
use accounts::auth::token::TokenCodec;
use accounts::contract::model::{AccountStatus, Registration};
use accounts::domain::repo::UsersRepository;
use directory::contract::model::Coordinates;
use directory::domain::cabinets::{CabinetService, GeocodeSettings};
use directory::domain::profiles::ProfileService;
use directory::domain::roster::RosterService;
use mailer::{Mailer, NullMailer, SmtpMailer};
use runtime::AppConfig;
use subscriptions::job::reminder::ReminderJob;

use crate::adapters::{RosterAdapter, SubscriptionGateAdapter, UserDirectoryAdapter};

// Nominatim's usage policy caps anonymous clients at one request per second.
const GEOCODE_THROTTLE: Duration = Duration::from_secs(1);

pub async fn build(config: &AppConfig, conn: Arc<DatabaseConnection>) -> Result<Router> {
    let tokens = TokenCodec::new(&config.auth.jwt_secret, config.auth.token_ttl_minutes);

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail) => Arc::new(SmtpMailer::from_config(mail).context("SMTP setup failed")?),
        None => {
            tracing::warn!("No mail section configured, outbound mail is disabled");
            Arc::new(NullMailer)
        }
    };

    // Repositories over the shared connection.
    let users_repo: Arc<dyn UsersRepository> = Arc::new(
        accounts::infra::storage::repo::SeaOrmUsersRepository::new(conn.clone()),
    );
    let subscriptions_repo = Arc::new(
        subscriptions::infra::storage::repo::SeaOrmSubscriptionsRepository::new(conn.clone()),
    );
    let roster_repo = Arc::new(directory::infra::storage::repo::SeaOrmRosterRepository::new(
        conn.clone(),
    ));
    let cabinets_repo = Arc::new(
        directory::infra::storage::repo::SeaOrmCabinetsRepository::new(conn.clone()),
    );
    let profiles_repo = Arc::new(
        directory::infra::storage::repo::SeaOrmProfilesRepository::new(conn.clone()),
    );
    let products_repo = Arc::new(catalog::infra::storage::repo::SeaOrmProductsRepository::new(
        conn.clone(),
    ));

    seed_admin(config, users_repo.as_ref()).await?;

    // Directory services.
    let roster_service = Arc::new(RosterService::new(roster_repo.clone()));
    let geocoder = Arc::new(
        directory::infra::geocode::NominatimGeocoder::from_config(&config.geocoder)
            .context("Geocoder setup failed")?,
    );
    let cabinet_service = Arc::new(CabinetService::new(
        cabinets_repo,
        roster_repo,
        geocoder,
        GeocodeSettings {
            fallback_query: config.geocoder.fallback_query.clone(),
            fallback: Coordinates {
                latitude: config.geocoder.fallback_latitude,
                longitude: config.geocoder.fallback_longitude,
            },
            throttle: GEOCODE_THROTTLE,
        },
    ));
    let profile_service = Arc::new(ProfileService::new(profiles_repo, config.media_dir()));

    // Accounts: registration is gated on the directory's roster.
    let (portal_url, app_download_url) = config
        .mail
        .as_ref()
        .map(|m| (m.portal_url.clone(), m.app_download_url.clone()))
        .unwrap_or_else(|| {
            (
                "https://vitalfeed.tn/espace-veterinaire".to_string(),
                "https://vitalfeed.tn/telechargement".to_string(),
            )
        });
    let accounts_service = Arc::new(accounts::domain::service::Service::new(
        users_repo.clone(),
        Arc::new(RosterAdapter(roster_service.clone())),
        mailer.clone(),
        tokens.clone(),
        accounts::domain::service::ServiceConfig {
            portal_url,
            app_download_url,
        },
    ));

    // Subscriptions see accounts only through the directory adapter.
    let user_directory = Arc::new(UserDirectoryAdapter(users_repo.clone()));
    let subscriptions_service = Arc::new(subscriptions::domain::service::Service::new(
        subscriptions_repo.clone(),
        user_directory.clone(),
    ));

    // Catalog.
    let image_lookup = Arc::new(
        catalog::infra::scrape::HttpImageLookup::new().context("Scraper setup failed")?,
    );
    let catalog_service = Arc::new(catalog::domain::service::Service::new(
        products_repo,
        image_lookup,
    ));

    let gate = Arc::new(AuthGate::new(
        tokens,
        users_repo.clone(),
        Arc::new(SubscriptionGateAdapter {
            users: users_repo,
            subscriptions: subscriptions_service.clone(),
        }),
    ));

    tokio::spawn(
        ReminderJob::new(subscriptions_repo, user_directory, mailer).run(),
    );

    let api = Router::new()
        .merge(accounts::api::rest::routes::router(accounts_service))
        .nest(
            "/subscriptions",
            subscriptions::api::rest::routes::router(subscriptions_service),
        )
        .nest(
            "/cabinets",
            directory::api::rest::routes::cabinets_router(cabinet_service),
        )
        .nest(
            "/veterinaires",
            directory::api::rest::routes::veterinaires_router(roster_service, profile_service),
        )
        .nest(
            "/products",
            catalog::api::rest::routes::router(catalog_service),
        );

    Ok(Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(gate, authorize))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http()))
}

/// Seed the configured admin account on first start. The hash comes from the
/// config, so no credential is generated or mailed here.
async fn seed_admin(config: &AppConfig, users: &dyn UsersRepository) -> Result<()> {
    let Some(admin) = &config.admin else {
        return Ok(());
    };

    if users
        .email_exists(&admin.email)
        .await
        .context("Admin lookup failed")?
    {
        return Ok(());
    }

    let seeded = users
        .insert(
            Registration {
                nom: "Admin".to_string(),
                prenom: "VitalFeed".to_string(),
                email: admin.email.clone(),
                telephone: None,
                adresse_cabinet: "-".to_string(),
                num_matricule: "ADMIN".to_string(),
            },
            admin.password_hash.clone(),
            true,
            AccountStatus::Active,
        )
        .await
        .context("Admin seed failed")?;
    tracing::info!("Seeded admin account {} (id={})", admin.email, seeded.id);
    Ok(())
}
