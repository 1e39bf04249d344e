//! Dialog controller — drives one turn of a restaurant conversation.
//!
//! A new query goes through `run`: resolve the user's location (possibly
//! asking where they are), then search. Everything after that goes through
//! `follow_up`, which either takes the reply as the missing location or
//! answers questions about the current result by keyword.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::DialogConfig;
use crate::dialog::classifier::{self, FollowUpAction};
use crate::dialog::state::ConversationState;
use crate::error::Result;
use crate::input::Turn;
use crate::language;
use crate::location::{LocationResolver, Resolution};
use crate::search::{BusinessSearch, SearchRequest};

/// The restaurant dialog. Holds collaborators only; all per-conversation
/// data lives in the `ConversationState` passed to each call.
pub struct RestaurantDialog {
    locations: Arc<dyn LocationResolver>,
    provider: Arc<dyn BusinessSearch>,
    config: DialogConfig,
}

impl RestaurantDialog {
    pub fn new(
        locations: Arc<dyn LocationResolver>,
        provider: Arc<dyn BusinessSearch>,
        config: DialogConfig,
    ) -> Self {
        Self {
            locations,
            provider,
            config,
        }
    }

    /// Handle a new top-level query.
    ///
    /// Location failures abort the turn. Search failures leave the turn
    /// unanswered (`Ok(None)`).
    pub async fn run(&self, turn: &Turn, state: &mut ConversationState) -> Result<Option<String>> {
        *state = ConversationState::new(turn.input.query());

        let resolution = self.locations.resolve(&turn.user).await?;
        if let Some(question) = Self::clarify(&resolution, state) {
            return Ok(Some(question));
        }
        state.location = resolved_name(resolution);

        // "nearby" and similar with no earlier context come back resolved
        // but nameless; a second lookup may expand them.
        if state.location.is_empty() {
            debug!(user = %turn.user, "Location resolved without a name, retrying");
            let retry = self.locations.resolve(&turn.user).await?;
            if let Some(question) = Self::clarify(&retry, state) {
                return Ok(Some(question));
            }
            state.location = resolved_name(retry);
        }

        Ok(self.search(state).await)
    }

    /// Handle a reply within an open conversation.
    ///
    /// `prior_response` is the response text the host hands back for this
    /// turn. Keywords are matched against it rather than the user's
    /// sentence unless `scan_user_reply` is set.
    pub async fn follow_up(
        &self,
        turn: &Turn,
        state: &mut ConversationState,
        prior_response: &str,
    ) -> Result<Option<String>> {
        // We asked where they are; take the whole reply as the answer.
        // TODO: validate the reply as a place before searching on it.
        if state.awaiting_location() {
            state.location = turn.sentence.clone();
            self.locations.remember(&turn.user, &state.location).await;
            return Ok(self.search(state).await);
        }

        if state.businesses.is_empty() {
            return Ok(Some(language::NOTHING_FOUND.to_string()));
        }

        let text = if self.config.scan_user_reply {
            turn.sentence.as_str()
        } else {
            prior_response
        };

        for word in classifier::words(text) {
            let Some(action) = classifier::classify(&word) else {
                continue;
            };
            debug!(word = %word, ?action, "Follow-up keyword matched");
            if let Some(response) = self.perform(action, state).await {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }

    async fn perform(&self, action: FollowUpAction, state: &mut ConversationState) -> Option<String> {
        match action {
            FollowUpAction::Detail(detail) => Some(match state.current_business() {
                Some(business) => detail.render(business),
                None => language::NOTHING_MORE.to_string(),
            }),
            FollowUpAction::ShowAnother => {
                state.advance();
                self.search(state).await
            }
            FollowUpAction::Acknowledge => Some(language::POSITIVE.to_string()),
            FollowUpAction::Thanks => Some(language::WELCOME.to_string()),
        }
    }

    /// Search at the current offset and describe the result.
    ///
    /// Provider failures are logged and swallowed: the turn gets no
    /// response and the state is left as it was.
    async fn search(&self, state: &mut ConversationState) -> Option<String> {
        let request = SearchRequest::for_offset(&state.query, &state.location, state.offset);
        debug!(
            provider = self.provider.name(),
            query = %request.terms,
            location = %request.location,
            offset = state.offset,
            "Searching businesses"
        );

        let businesses = match self.provider.search(&request).await {
            Ok(businesses) => businesses,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Search failed, leaving turn unanswered");
                return None;
            }
        };
        state.businesses = businesses;

        if state.businesses.is_empty() {
            return Some(language::NO_PLACES_NEARBY.to_string());
        }
        let Some(business) = state.current_business() else {
            return Some(language::NOTHING_MORE.to_string());
        };
        Some(if state.offset == 0 {
            format!(
                "Ok. How does this place look? {} at {}",
                business.name,
                business.street_address()
            )
        } else {
            format!("What about {} instead?", business.name)
        })
    }

    /// If the resolver asked a question, keep any partial place name and
    /// return the question.
    fn clarify(resolution: &Resolution, state: &mut ConversationState) -> Option<String> {
        if !resolution.needs_clarification() {
            return None;
        }
        if let Some(partial) = resolution.partial_name() {
            state.location = partial.to_string();
        }
        Some(resolution.question.clone())
    }
}

fn resolved_name(resolution: Resolution) -> String {
    resolution.location.map(|l| l.name).unwrap_or_default()
}
