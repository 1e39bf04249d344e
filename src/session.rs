//! Conversation registry — routes host turns to `run` or `follow_up`.
//!
//! One `Conversation` per user. A turn that matches the trigger vocabulary
//! always opens a fresh conversation; anything else continues the open one.
//! Idle conversations are pruned lazily on each turn.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::dialog::{ConversationState, RestaurantDialog};
use crate::error::Result;
use crate::input::{Trigger, Turn};

/// An open conversation with one user.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: Uuid,
    pub state: ConversationState,
    /// Last response sent to the user, handed back on the next follow-up.
    pub last_response: String,
    pub last_active: DateTime<Utc>,
}

impl Conversation {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: ConversationState::default(),
            last_response: String::new(),
            last_active: Utc::now(),
        }
    }
}

/// Owns every open conversation and the dialog that serves them.
///
/// Turns for one user run one at a time; different users proceed
/// independently.
pub struct ConversationManager {
    dialog: RestaurantDialog,
    trigger: Trigger,
    idle_timeout: Duration,
    conversations: Mutex<HashMap<String, Arc<Mutex<Conversation>>>>,
}

impl ConversationManager {
    pub fn new(dialog: RestaurantDialog, trigger: Trigger, idle_timeout: std::time::Duration) -> Self {
        Self {
            dialog,
            trigger,
            idle_timeout: Duration::from_std(idle_timeout).unwrap_or(Duration::seconds(1800)),
            conversations: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one turn, returning the response to send, if any.
    pub async fn handle(&self, turn: &Turn) -> Result<Option<String>> {
        let (handle, starts_new) = self.checkout(turn).await;
        let mut conversation = handle.lock().await;
        conversation.last_active = Utc::now();

        let response = if starts_new {
            tracing::info!(
                user = %turn.user,
                conversation = %conversation.id,
                query = %turn.input.query(),
                "Starting restaurant conversation"
            );
            let outcome = self.dialog.run(turn, &mut conversation.state).await;
            match outcome {
                Ok(response) => response,
                Err(e) => {
                    // A half-reset state would read the next sentence as a location.
                    drop(conversation);
                    self.discard(&turn.user, &handle).await;
                    return Err(e);
                }
            }
        } else {
            let Conversation {
                state,
                last_response,
                ..
            } = &mut *conversation;
            self.dialog.follow_up(turn, state, last_response).await?
        };

        if let Some(text) = &response {
            conversation.last_response.clone_from(text);
        }
        Ok(response)
    }

    /// Find or open the conversation this turn belongs to, pruning idle ones.
    async fn checkout(&self, turn: &Turn) -> (Arc<Mutex<Conversation>>, bool) {
        let now = Utc::now();
        let mut conversations = self.conversations.lock().await;
        conversations.retain(|user, c| {
            // A conversation mid-turn is never idle.
            let Ok(c) = c.try_lock() else {
                return true;
            };
            let keep = now - c.last_active <= self.idle_timeout;
            if !keep {
                tracing::debug!(user = %user, conversation = %c.id, "Pruned idle conversation");
            }
            keep
        });

        let starts_new =
            self.trigger.matches(&turn.input) || !conversations.contains_key(&turn.user);
        if starts_new {
            conversations.insert(turn.user.clone(), Arc::new(Mutex::new(Conversation::new())));
        }
        let conversation = conversations
            .entry(turn.user.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Conversation::new())));
        (Arc::clone(conversation), starts_new)
    }

    /// Remove `conversation` if it is still the one registered for `user`.
    async fn discard(&self, user: &str, conversation: &Arc<Mutex<Conversation>>) {
        let mut conversations = self.conversations.lock().await;
        if conversations
            .get(user)
            .is_some_and(|current| Arc::ptr_eq(current, conversation))
        {
            conversations.remove(user);
            tracing::debug!(user = %user, "Discarded conversation after failed turn");
        }
    }

    /// Discard a user's conversation. Returns whether one was open.
    pub async fn end(&self, user: &str) -> bool {
        self.conversations.lock().await.remove(user).is_some()
    }

    /// Snapshot of a user's conversation state.
    pub async fn state(&self, user: &str) -> Option<ConversationState> {
        let conversation = self.conversations.lock().await.get(user).cloned()?;
        let state = conversation.lock().await.state.clone();
        Some(state)
    }

    /// Number of open conversations.
    pub async fn open_count(&self) -> usize {
        self.conversations.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::config::DialogConfig;
    use crate::error::{LocationError, SearchError};
    use crate::input::StructuredInput;
    use crate::location::{LocationResolver, Resolution};
    use crate::search::{Business, BusinessSearch, SearchRequest};

    struct FixedResolver;

    #[async_trait]
    impl LocationResolver for FixedResolver {
        async fn resolve(&self, _user: &str) -> std::result::Result<Resolution, LocationError> {
            Ok(Resolution::resolved("Austin"))
        }
    }

    /// Fails every lookup while `down` is set.
    #[derive(Default)]
    struct FlakyResolver {
        down: AtomicBool,
    }

    #[async_trait]
    impl LocationResolver for FlakyResolver {
        async fn resolve(&self, user: &str) -> std::result::Result<Resolution, LocationError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(LocationError::Unavailable(format!("no lookup for {user}")));
            }
            Ok(Resolution::resolved("Austin"))
        }
    }

    #[derive(Default)]
    struct CountingSearch {
        requests: StdMutex<Vec<SearchRequest>>,
    }

    #[async_trait]
    impl BusinessSearch for CountingSearch {
        fn name(&self) -> &str {
            "counting"
        }

        async fn search(
            &self,
            request: &SearchRequest,
        ) -> std::result::Result<Vec<Business>, SearchError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok((0..request.limit)
                .map(|i| Business {
                    name: format!("Place {i}"),
                    location: crate::search::BusinessLocation {
                        city: "Austin".into(),
                        display_address: vec![format!("{i} Main St")],
                    },
                    ..Default::default()
                })
                .collect())
        }
    }

    fn manager(idle: std::time::Duration) -> (ConversationManager, Arc<CountingSearch>) {
        let search = Arc::new(CountingSearch::default());
        let dialog = RestaurantDialog::new(
            Arc::new(FixedResolver),
            search.clone(),
            DialogConfig::default(),
        );
        (
            ConversationManager::new(dialog, Trigger::default(), idle),
            search,
        )
    }

    fn find_tacos(user: &str) -> Turn {
        Turn::new(user, "find tacos", StructuredInput::new(["find"], ["tacos"]))
    }

    #[tokio::test]
    async fn first_turn_opens_conversation() {
        let (mgr, search) = manager(std::time::Duration::from_secs(60));
        let resp = mgr.handle(&find_tacos("alice")).await.unwrap();
        assert_eq!(
            resp.as_deref(),
            Some("Ok. How does this place look? Place 0 at 0 Main St")
        );
        assert_eq!(mgr.open_count().await, 1);
        assert_eq!(search.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn trigger_restarts_conversation() {
        let (mgr, _search) = manager(std::time::Duration::from_secs(60));
        mgr.handle(&find_tacos("alice")).await.unwrap();

        // Advance via a follow-up whose prior response contains "else".
        {
            let conversations = mgr.conversations.lock().await;
            let mut c = conversations["alice"].lock().await;
            c.last_response = "Something else?".into();
        }
        let resp = mgr
            .handle(&Turn::new("alice", "sure", StructuredInput::default()))
            .await
            .unwrap();
        assert_eq!(resp.as_deref(), Some("What about Place 1 instead?"));
        assert_eq!(mgr.state("alice").await.unwrap().offset, 1);

        mgr.handle(&find_tacos("alice")).await.unwrap();
        assert_eq!(mgr.state("alice").await.unwrap().offset, 0);
    }

    #[tokio::test]
    async fn users_are_independent() {
        let (mgr, _search) = manager(std::time::Duration::from_secs(60));
        mgr.handle(&find_tacos("alice")).await.unwrap();
        mgr.handle(&find_tacos("bob")).await.unwrap();
        assert_eq!(mgr.open_count().await, 2);

        assert!(mgr.end("alice").await);
        assert!(!mgr.end("alice").await);
        assert!(mgr.state("alice").await.is_none());
        assert_eq!(mgr.state("bob").await.unwrap().location, "Austin");
    }

    #[tokio::test]
    async fn idle_conversations_are_pruned() {
        let (mgr, _search) = manager(std::time::Duration::from_secs(0));
        mgr.handle(&find_tacos("alice")).await.unwrap();
        {
            let conversations = mgr.conversations.lock().await;
            let mut c = conversations["alice"].lock().await;
            c.last_active = Utc::now() - Duration::seconds(5);
        }
        mgr.handle(&find_tacos("bob")).await.unwrap();
        assert!(mgr.state("alice").await.is_none());
        assert_eq!(mgr.open_count().await, 1);
    }

    #[tokio::test]
    async fn non_trigger_turn_without_conversation_runs_fresh() {
        let (mgr, search) = manager(std::time::Duration::from_secs(60));
        let resp = mgr
            .handle(&Turn::new("carol", "hello", StructuredInput::default()))
            .await
            .unwrap();
        // No objects: an empty query is still searched.
        assert!(resp.is_some());
        assert_eq!(search.requests.lock().unwrap()[0].terms, "");
    }

    #[tokio::test]
    async fn failed_run_does_not_leave_conversation_open() {
        let resolver = Arc::new(FlakyResolver {
            down: AtomicBool::new(true),
        });
        let search = Arc::new(CountingSearch::default());
        let dialog = RestaurantDialog::new(resolver.clone(), search.clone(), DialogConfig::default());
        let mgr = ConversationManager::new(dialog, Trigger::default(), std::time::Duration::from_secs(60));

        assert!(mgr.handle(&find_tacos("alice")).await.is_err());
        assert!(mgr.state("alice").await.is_none());
        assert_eq!(mgr.open_count().await, 0);

        // The next sentence starts over instead of being read as a place.
        resolver.down.store(false, Ordering::SeqCst);
        mgr.handle(&Turn::new("alice", "hmm ok", StructuredInput::default()))
            .await
            .unwrap();
        let requests = search.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].location, "Austin");
        assert_eq!(requests[0].terms, "");
    }
}
