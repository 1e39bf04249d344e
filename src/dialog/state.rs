//! Per-conversation dialog state.

use serde::{Deserialize, Serialize};

use crate::search::Business;

/// Everything the dialog remembers between turns of one conversation.
///
/// One instance per active conversation; the host owns its lifetime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Search terms from the turn that opened the conversation.
    pub query: String,
    /// Resolved place name. Empty while waiting for the user to tell us.
    pub location: String,
    /// Index of the business currently being discussed.
    pub offset: usize,
    /// Results of the most recent search. Empty means nothing was found.
    pub businesses: Vec<Business>,
}

impl ConversationState {
    /// Fresh state for a new top-level query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Whether the conversation is still waiting on a location.
    pub fn awaiting_location(&self) -> bool {
        self.location.is_empty()
    }

    /// The business at `offset`, if the last search reached that far.
    pub fn current_business(&self) -> Option<&Business> {
        self.businesses.get(self.offset)
    }

    /// Move on to the next result.
    pub fn advance(&mut self) -> usize {
        self.offset += 1;
        self.offset
    }
}
