//! Server-side state for interactive messages.
//!
//! A view is a message carrying buttons or menus plus the state behind them.
//! Views are keyed by message id and expire after a period of inactivity;
//! every interaction pushes the deadline back. On expiry the message is edited
//! with the view's timeout rendering (usually disabled controls).

use dashmap::DashMap;
use log::{debug, warn};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::http::Http;
use serenity::model::id::{ChannelId, MessageId};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a message looks once its view has expired.
pub struct ViewTimeout {
    pub content: Option<String>,
    pub embed: Option<CreateEmbed>,
    pub components: CreateComponents,
}

pub trait Expiring: Send + Sync + 'static {
    fn timeout(&self) -> Duration;

    fn on_timeout(&self) -> ViewTimeout;
}

pub struct ViewEntry<T> {
    pub state: T,
    pub channel_id: u64,
    deadline: Instant,
}

pub enum Expiry<T> {
    Gone,
    Pending(Instant),
    Expired(ViewEntry<T>),
}

pub struct ViewStore<T> {
    views: Arc<DashMap<u64, ViewEntry<T>>>,
}

impl<T> Clone for ViewStore<T> {
    fn clone(&self) -> Self {
        ViewStore {
            views: Arc::clone(&self.views),
        }
    }
}

impl<T: Expiring> Default for ViewStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Expiring> ViewStore<T> {
    pub fn new() -> Self {
        ViewStore {
            views: Arc::new(DashMap::new()),
        }
    }

    pub fn insert(&self, message_id: u64, channel_id: u64, state: T) {
        let deadline = Instant::now() + state.timeout();
        self.views.insert(
            message_id,
            ViewEntry {
                state,
                channel_id,
                deadline,
            },
        );
    }

    pub fn contains(&self, message_id: u64) -> bool {
        self.views.contains_key(&message_id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Runs `f` against a live view and refreshes its idle deadline.
    pub fn with_view<R>(&self, message_id: u64, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut entry = self.views.get_mut(&message_id)?;
        let now = Instant::now();
        if entry.deadline <= now {
            return None;
        }
        let timeout = entry.state.timeout();
        entry.deadline = now + timeout;
        Some(f(&mut entry.state))
    }

    pub fn remove(&self, message_id: u64) -> Option<T> {
        self.views.remove(&message_id).map(|(_, entry)| entry.state)
    }

    pub fn check_expiry(&self, message_id: u64, now: Instant) -> Expiry<T> {
        let deadline = match self.views.get(&message_id) {
            Some(entry) => entry.deadline,
            None => return Expiry::Gone,
        };

        if deadline > now {
            return Expiry::Pending(deadline);
        }

        match self.views.remove_if(&message_id, |_, entry| entry.deadline <= now) {
            Some((_, entry)) => Expiry::Expired(entry),
            None => self
                .views
                .get(&message_id)
                .map(|entry| Expiry::Pending(entry.deadline))
                .unwrap_or(Expiry::Gone),
        }
    }

    /// Watches one view and renders its timeout state when it lapses.
    pub fn spawn_expiry(&self, http: Arc<Http>, message_id: u64) {
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                let deadline = match store.check_expiry(message_id, Instant::now()) {
                    Expiry::Gone => return,
                    Expiry::Pending(deadline) => deadline,
                    Expiry::Expired(entry) => {
                        let timeout = entry.state.on_timeout();
                        let result = ChannelId(entry.channel_id)
                            .edit_message(&http, MessageId(message_id), |m| {
                                if let Some(content) = timeout.content {
                                    m.content(content);
                                }
                                if let Some(embed) = timeout.embed {
                                    m.set_embed(embed);
                                }
                                m.set_components(timeout.components)
                            })
                            .await;

                        match result {
                            Ok(_) => debug!("⌛ View on message {} timed out", message_id),
                            Err(e) => warn!("⚠️ Failed to expire view on message {}: {}", message_id, e),
                        }
                        return;
                    }
                };

                tokio::time::sleep(deadline.saturating_duration_since(Instant::now())).await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        hits: u32,
        timeout: Duration,
    }

    impl Expiring for Counter {
        fn timeout(&self) -> Duration {
            self.timeout
        }

        fn on_timeout(&self) -> ViewTimeout {
            ViewTimeout {
                content: Some(format!("stopped at {}", self.hits)),
                embed: None,
                components: CreateComponents::default(),
            }
        }
    }

    fn counter(ms: u64) -> Counter {
        Counter {
            hits: 0,
            timeout: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_with_view_mutates_state() {
        let store = ViewStore::new();
        store.insert(1, 10, counter(10_000));

        assert_eq!(store.with_view(1, |c| { c.hits += 1; c.hits }), Some(1));
        assert_eq!(store.with_view(1, |c| { c.hits += 1; c.hits }), Some(2));
        assert_eq!(store.with_view(2, |c| c.hits), None);
    }

    #[test]
    fn test_remove() {
        let store = ViewStore::new();
        store.insert(1, 10, counter(10_000));
        assert!(store.remove(1).is_some());
        assert!(!store.contains(1));
        assert!(store.is_empty());
        assert!(store.remove(1).is_none());
    }

    #[test]
    fn test_only_one_concurrent_remover_claims_the_view() {
        let store = Arc::new(ViewStore::new());
        store.insert(1, 10, counter(10_000));

        let claims: usize = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.remove(1).is_some())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap() as usize)
            .sum();
        assert_eq!(claims, 1);
    }

    #[tokio::test]
    async fn test_expiry_after_idle() {
        let store = ViewStore::new();
        store.insert(1, 10, counter(30));

        assert!(matches!(store.check_expiry(1, Instant::now()), Expiry::Pending(_)));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(store.with_view(1, |c| c.hits).is_none());
        match store.check_expiry(1, Instant::now()) {
            Expiry::Expired(entry) => {
                assert_eq!(entry.channel_id, 10);
                assert_eq!(entry.state.on_timeout().content.as_deref(), Some("stopped at 0"));
            }
            _ => panic!("view should have expired"),
        }
        assert!(matches!(store.check_expiry(1, Instant::now()), Expiry::Gone));
    }

    #[tokio::test]
    async fn test_interaction_refreshes_deadline() {
        let store = ViewStore::new();
        store.insert(1, 10, counter(60));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(store.with_view(1, |c| c.hits += 1).is_some());
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(matches!(store.check_expiry(1, Instant::now()), Expiry::Pending(_)));
    }
}
