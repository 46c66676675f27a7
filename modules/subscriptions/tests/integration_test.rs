use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use tower::ServiceExt;

use mailer::RecordingMailer;
use subscriptions::{
    contract::model::{Subscription, SubscriptionType, UserSummary},
    domain::error::DomainError,
    domain::ports::UserDirectory,
    domain::repo::SubscriptionsRepository,
    domain::service::Service,
    job::reminder::ReminderJob,
};

#[derive(Default)]
struct InMemorySubscriptions {
    rows: Mutex<Vec<Subscription>>,
    next_id: Mutex<i64>,
}

impl InMemorySubscriptions {
    fn snapshot(&self) -> Vec<Subscription> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubscriptionsRepository for InMemorySubscriptions {
    async fn find_by_id(&self, id: i64) -> Result<Option<Subscription>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Option<Subscription>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn insert(
        &self,
        user_id: i64,
        subscription_type: SubscriptionType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Subscription> {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let subscription = Subscription {
            id: *next,
            user_id,
            subscription_type,
            start_date,
            end_date,
            last_reminder_sent_at: None,
        };
        self.rows.lock().unwrap().push(subscription.clone());
        Ok(subscription)
    }

    async fn update_plan(
        &self,
        id: i64,
        subscription_type: SubscriptionType,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow::anyhow!("no subscription {id}"))?;
        row.subscription_type = subscription_type;
        row.start_date = start_date;
        row.end_date = end_date;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.rows.lock().unwrap().retain(|s| s.id != id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Subscription>> {
        Ok(self.snapshot())
    }

    async fn set_last_reminder(&self, id: i64, at: Option<DateTime<Utc>>) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow::anyhow!("no subscription {id}"))?;
        row.last_reminder_sent_at = at;
        Ok(())
    }
}

struct FakeUsers {
    users: Vec<UserSummary>,
    active: Mutex<Vec<i64>>,
}

impl FakeUsers {
    fn new(users: Vec<UserSummary>) -> Self {
        Self {
            users,
            active: Mutex::new(Vec::new()),
        }
    }

    fn with_active(users: Vec<UserSummary>) -> Self {
        let ids = users.iter().map(|u| u.id).collect();
        Self {
            users,
            active: Mutex::new(ids),
        }
    }

    fn activated(&self, id: i64) -> bool {
        self.active.lock().unwrap().contains(&id)
    }
}

#[async_trait]
impl UserDirectory for FakeUsers {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserSummary>> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn activate(&self, id: i64) -> Result<()> {
        self.active.lock().unwrap().push(id);
        Ok(())
    }

    async fn active_users(&self) -> Result<Vec<UserSummary>> {
        let active = self.active.lock().unwrap();
        Ok(self
            .users
            .iter()
            .filter(|u| active.contains(&u.id))
            .cloned()
            .collect())
    }
}

fn vet(id: i64, email: &str) -> UserSummary {
    UserSummary {
        id,
        nom: "Dupont".to_string(),
        prenom: "Alice".to_string(),
        email: email.to_string(),
    }
}

#[tokio::test]
async fn annual_assignment_ends_365_days_after_start() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::new(vec![vet(5, "vet@example.com")]));
    let service = Service::new(repo.clone(), users.clone());

    let assigned = service.assign(5, SubscriptionType::Annual).await?;
    let s = &assigned.subscription;
    assert_eq!(s.end_date - s.start_date, Duration::days(365));
    assert_eq!(assigned.user.as_ref().map(|u| u.id), Some(5));
    assert!(users.activated(5));

    Ok(())
}

#[tokio::test]
async fn assign_to_unknown_user_fails() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::new(vec![]));
    let service = Service::new(repo, users);

    let err = service
        .assign(99, SubscriptionType::Monthly)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::UserNotFound));

    Ok(())
}

#[tokio::test]
async fn duplicate_assignment_mutates_nothing() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::new(vec![vet(1, "vet@example.com")]));
    let service = Service::new(repo.clone(), users);

    service.assign(1, SubscriptionType::Monthly).await?;
    let before = repo.snapshot();

    let err = service
        .assign(1, SubscriptionType::Annual)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadySubscribed));
    assert_eq!(repo.snapshot(), before);

    Ok(())
}

#[tokio::test]
async fn update_recomputes_window_from_now() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::new(vec![vet(1, "vet@example.com")]));
    let service = Service::new(repo.clone(), users);

    let assigned = service.assign(1, SubscriptionType::Monthly).await?;
    let updated = service
        .update(assigned.subscription.id, SubscriptionType::Quarterly)
        .await?;

    let s = &updated.subscription;
    assert_eq!(s.subscription_type, SubscriptionType::Quarterly);
    assert_eq!(s.end_date - s.start_date, Duration::days(90));
    assert!(s.start_date >= assigned.subscription.start_date);

    Ok(())
}

#[tokio::test]
async fn delete_unknown_subscription_fails() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::new(vec![]));
    let service = Service::new(repo, users);

    let err = service.delete(42).await.unwrap_err();
    assert!(matches!(err, DomainError::SubscriptionNotFound));

    Ok(())
}

// --- router surface ---

fn test_router(repo: Arc<InMemorySubscriptions>, users: Arc<FakeUsers>) -> Router {
    let service = Arc::new(Service::new(repo, users));
    subscriptions::api::rest::routes::router(service)
}

#[tokio::test]
async fn rest_assign_returns_created_with_nested_user() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::new(vec![vet(7, "vet@example.com")]));
    let router = test_router(repo, users);

    let request = Request::builder()
        .method("POST")
        .uri("/assign/7?subscriptionType=ANNUAL")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["subscriptionType"], "ANNUAL");
    assert_eq!(body["user"]["email"], "vet@example.com");

    Ok(())
}

#[tokio::test]
async fn rest_rejects_unknown_subscription_type() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::new(vec![vet(7, "vet@example.com")]));
    let router = test_router(repo, users);

    let request = Request::builder()
        .method("POST")
        .uri("/assign/7?subscriptionType=WEEKLY")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

// --- reminder sweep ---

async fn seed_subscription(
    repo: &InMemorySubscriptions,
    user_id: i64,
    end_in: Duration,
) -> Subscription {
    let now = Utc::now();
    repo.insert(user_id, SubscriptionType::Monthly, now - Duration::days(23), now + end_in)
        .await
        .unwrap()
}

#[tokio::test]
async fn reminder_fires_exactly_once_per_window() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::with_active(vec![vet(1, "vet@example.com")]));
    let mailer = Arc::new(RecordingMailer::new());
    seed_subscription(&repo, 1, Duration::days(3)).await;

    let job = ReminderJob::new(repo.clone(), users, mailer.clone());

    assert_eq!(job.sweep().await?, 1);
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "vet@example.com");
    assert!(sent[0].subject.contains("expiration"));

    // Second sweep inside the same window sends nothing.
    assert_eq!(job.sweep().await?, 0);
    assert_eq!(mailer.sent().len(), 1);

    Ok(())
}

#[tokio::test]
async fn reminder_skips_subscriptions_outside_the_window() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::with_active(vec![vet(1, "vet@example.com")]));
    let mailer = Arc::new(RecordingMailer::new());
    seed_subscription(&repo, 1, Duration::days(30)).await;

    let job = ReminderJob::new(repo.clone(), users, mailer.clone());
    assert_eq!(job.sweep().await?, 0);
    assert!(mailer.sent().is_empty());

    Ok(())
}

#[tokio::test]
async fn expired_subscription_clears_marker_without_sending() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::with_active(vec![vet(1, "vet@example.com")]));
    let mailer = Arc::new(RecordingMailer::new());
    let s = seed_subscription(&repo, 1, Duration::days(-1)).await;
    repo.set_last_reminder(s.id, Some(Utc::now() - Duration::days(8)))
        .await?;

    let job = ReminderJob::new(repo.clone(), users, mailer.clone());
    assert_eq!(job.sweep().await?, 0);
    assert!(mailer.sent().is_empty());
    assert_eq!(
        repo.find_by_id(s.id).await?.unwrap().last_reminder_sent_at,
        None
    );

    Ok(())
}

#[tokio::test]
async fn active_user_without_subscription_is_skipped() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::with_active(vec![vet(1, "vet@example.com")]));
    let mailer = Arc::new(RecordingMailer::new());

    let job = ReminderJob::new(repo, users, mailer.clone());
    assert_eq!(job.sweep().await?, 0);
    assert!(mailer.sent().is_empty());

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn run_waits_a_full_period_before_the_first_sweep() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::with_active(vec![vet(1, "vet@example.com")]));
    let mailer = Arc::new(RecordingMailer::new());
    seed_subscription(&repo, 1, Duration::days(3)).await;

    tokio::spawn(ReminderJob::new(repo, users, mailer.clone()).run());

    // The clock is paused: the job parks on its first tick without sending.
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(mailer.sent().is_empty());

    tokio::time::advance(std::time::Duration::from_secs(24 * 60 * 60)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(mailer.sent().len(), 1);

    Ok(())
}

#[tokio::test]
async fn send_failure_leaves_marker_unset_so_next_sweep_retries() -> Result<()> {
    let repo = Arc::new(InMemorySubscriptions::default());
    let users = Arc::new(FakeUsers::with_active(vec![vet(1, "vet@example.com")]));
    let mailer = Arc::new(RecordingMailer::new());
    let s = seed_subscription(&repo, 1, Duration::days(3)).await;

    let job = ReminderJob::new(repo.clone(), users, mailer.clone());

    mailer.set_failing(true);
    assert_eq!(job.sweep().await?, 0);
    assert_eq!(
        repo.find_by_id(s.id).await?.unwrap().last_reminder_sent_at,
        None
    );

    mailer.set_failing(false);
    assert_eq!(job.sweep().await?, 1);
    assert_eq!(mailer.sent().len(), 1);

    Ok(())
}
