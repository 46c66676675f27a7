use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::token::TokenCodec;
use crate::contract::model::AccountStatus;
use crate::domain::ports::SubscriptionGate;
use crate::domain::repo::UsersRepository;

/// Endpoints reachable without any credentials, matched by prefix so query
/// strings and trailing slashes pass.
const PUBLIC_PREFIXES: &[&str] = &[
    "/api/login",
    "/api/users/register",
    "/api/products/all",
    "/api/cabinets/all",
];

/// Identity attached to the request once the gate accepts it.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub is_admin: bool,
}

/// Intercepts every inbound request and decides whether it reaches business
/// logic: public endpoints pass unconditionally, everything else needs a
/// valid token, and non-admin active users additionally need an unexpired
/// subscription.
pub struct AuthGate {
    tokens: TokenCodec,
    users: Arc<dyn UsersRepository>,
    subscriptions: Arc<dyn SubscriptionGate>,
}

impl AuthGate {
    pub fn new(
        tokens: TokenCodec,
        users: Arc<dyn UsersRepository>,
        subscriptions: Arc<dyn SubscriptionGate>,
    ) -> Self {
        Self {
            tokens,
            users,
            subscriptions,
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Axum middleware entry point; wire with `middleware::from_fn_with_state`.
pub async fn authorize(
    State(gate): State<Arc<AuthGate>>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    debug!("Processing request for {path}");

    if PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        debug!("Skipping authentication for public endpoint {path}");
        return next.run(req).await;
    }

    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let mut identity: Option<AuthUser> = None;

    if let Some(token) = bearer {
        let email = match gate.tokens.verify(token) {
            Ok(email) => email,
            Err(e) => {
                warn!("Token rejected: {e}");
                return error_response(StatusCode::UNAUTHORIZED, "Invalid token format");
            }
        };

        match gate.users.find_by_email(&email).await {
            Ok(Some(user)) => {
                // Token validity and subscription validity are independent
                // gates: an otherwise valid token is refused once the
                // subscription has lapsed.
                if !user.is_admin && user.status == AccountStatus::Active {
                    match gate.subscriptions.end_date_for(&email).await {
                        Ok(Some(end)) if end < Utc::now() => {
                            warn!("Subscription expired for {email}");
                            return error_response(StatusCode::FORBIDDEN, "Subscription expired");
                        }
                        Ok(Some(_)) => {}
                        Ok(None) => {
                            // Active status with no subscription row is a
                            // data-integrity fault, not a client error.
                            warn!("No subscription found for active user {email}");
                            return error_response(
                                StatusCode::INTERNAL_SERVER_ERROR,
                                "No subscription found for user",
                            );
                        }
                        Err(e) => {
                            warn!("Subscription lookup failed for {email}: {e}");
                            return error_response(
                                StatusCode::INTERNAL_SERVER_ERROR,
                                "Subscription lookup failed",
                            );
                        }
                    }
                }
                identity = Some(AuthUser {
                    id: user.id,
                    email: user.email,
                    is_admin: user.is_admin,
                });
            }
            Ok(None) => {
                warn!("Token names unknown user {email}");
            }
            Err(e) => {
                warn!("User lookup failed for {email}: {e}");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "User lookup failed");
            }
        }
    } else {
        debug!("No bearer token present for {path}");
    }

    // Role-based path restrictions, evaluated after identity resolution.
    match identity {
        Some(user) => {
            if path.starts_with("/api/users") && !user.is_admin {
                return error_response(
                    StatusCode::FORBIDDEN,
                    "Access denied: Insufficient permissions",
                );
            }
            debug!("Authenticated user: {}", user.email);
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => error_response(
            StatusCode::UNAUTHORIZED,
            "Authentication failed: Full authentication is required",
        ),
    }
}
