use crate::events::{reminder_embed, EventData, EventStore};
use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;

const CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub struct ReminderScheduler {
    events: EventStore,
}

impl ReminderScheduler {
    pub fn new(events: EventStore) -> Self {
        Self { events }
    }

    /// Start the event reminder loop
    /// This should be spawned as a tokio task
    pub async fn run(&self, http: Arc<Http>) {
        let mut check_interval = interval(CHECK_INTERVAL);

        info!("⏰ Event reminder scheduler started");

        loop {
            check_interval.tick().await;
            self.process_due_reminders(&http).await;
        }
    }

    async fn process_due_reminders(&self, http: &Arc<Http>) {
        // Events are marked as reminded before delivery so a failing channel
        // doesn't get retried every tick.
        let due = self.events.take_due_reminders(Utc::now().naive_utc()).await;

        if due.is_empty() {
            debug!("⏰ No event reminders due");
            return;
        }

        info!("⏰ Sending {} event reminder(s)", due.len());

        for event in due {
            match self.deliver_reminder(http, &event).await {
                Ok(_) => info!("✅ Sent reminder for event {}", event.event_id),
                Err(e) => warn!("⚠️ Failed to send reminder for event {}: {}", event.event_id, e),
            }
        }
    }

    async fn deliver_reminder(&self, http: &Arc<Http>, event: &EventData) -> Result<()> {
        let embed = reminder_embed(event);
        ChannelId(event.channel_id)
            .send_message(http, |m| m.set_embed(embed))
            .await?;
        Ok(())
    }
}
