//! Daily sweep that mails users whose subscription lapses within a week.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use crate::domain::ports::UserDirectory;
use crate::domain::repo::SubscriptionsRepository;
use crate::infra::email;
use mailer::Mailer;

const SWEEP_PERIOD: StdDuration = StdDuration::from_secs(24 * 60 * 60);
const REMINDER_WINDOW_DAYS: i64 = 7;

pub struct ReminderJob {
    repo: Arc<dyn SubscriptionsRepository>,
    users: Arc<dyn UserDirectory>,
    mailer: Arc<dyn Mailer>,
}

impl ReminderJob {
    pub fn new(
        repo: Arc<dyn SubscriptionsRepository>,
        users: Arc<dyn UserDirectory>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            repo,
            users,
            mailer,
        }
    }

    /// Run forever, sweeping once per day. Spawned by the server. The first
    /// sweep waits a full period instead of firing at startup.
    pub async fn run(self) {
        let start = tokio::time::Instant::now() + SWEEP_PERIOD;
        let mut ticker = tokio::time::interval_at(start, SWEEP_PERIOD);
        loop {
            ticker.tick().await;
            if let Err(e) = self.sweep().await {
                warn!("Reminder sweep failed: {e}");
            }
        }
    }

    /// One pass over all ACTIVE users. Returns how many reminders were sent.
    ///
    /// The dedup marker is the persisted `last_reminder_sent_at` column, so
    /// a restart never re-sends inside the same window; expiry clears the
    /// marker so a renewed subscription gets reminded again.
    #[instrument(name = "subscriptions.reminder.sweep", skip(self))]
    pub async fn sweep(&self) -> anyhow::Result<usize> {
        let now = Utc::now();
        let window_end = now + Duration::days(REMINDER_WINDOW_DAYS);
        let mut sent = 0usize;

        for user in self.users.active_users().await? {
            let subscription = match self.repo.find_by_user(user.id).await {
                Ok(Some(s)) => s,
                Ok(None) => {
                    warn!("Active user {} has no subscription, skipping", user.email);
                    continue;
                }
                Err(e) => {
                    warn!("Subscription lookup failed for {}: {e}", user.email);
                    continue;
                }
            };

            if subscription.end_date < now {
                // Lapsed: clear the marker so a later renewal re-arms the
                // reminder. Status is not touched here.
                if subscription.last_reminder_sent_at.is_some() {
                    if let Err(e) = self.repo.set_last_reminder(subscription.id, None).await {
                        warn!("Failed to clear reminder marker for {}: {e}", user.email);
                    }
                }
                continue;
            }

            if subscription.end_date > window_end || subscription.last_reminder_sent_at.is_some() {
                continue;
            }

            let body = email::reminder_email(&user.prenom, subscription.end_date);
            match self
                .mailer
                .send_html(&user.email, email::REMINDER_SUBJECT, body)
                .await
            {
                Ok(()) => {
                    if let Err(e) = self.repo.set_last_reminder(subscription.id, Some(now)).await {
                        warn!("Reminder sent but marker not stored for {}: {e}", user.email);
                    }
                    info!("Expiry reminder sent to {}", user.email);
                    sent += 1;
                }
                Err(e) => {
                    // One bad mailbox must not starve the rest of the batch.
                    warn!("Failed to send reminder to {}: {e}", user.email);
                }
            }
        }

        Ok(sent)
    }
}
