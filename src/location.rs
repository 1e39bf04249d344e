//! Location resolution collaborator.
//!
//! The dialog controller asks a `LocationResolver` where the user is before
//! searching. A resolver either returns a place or a clarifying question to
//! put to the user.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::LocationError;

/// A resolved place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Place name passed to the search provider. May be empty when the user
    /// referred to a contextual place ("nearby") with nothing to expand it.
    pub name: String,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Outcome of one resolution attempt.
///
/// An empty `question` means resolution succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub location: Option<Location>,
    pub question: String,
}

impl Resolution {
    /// A successfully resolved place.
    pub fn resolved(name: impl Into<String>) -> Self {
        Self {
            location: Some(Location::new(name)),
            question: String::new(),
        }
    }

    /// A clarifying question, optionally carrying a partial place name.
    pub fn ask(question: impl Into<String>, partial: Option<&str>) -> Self {
        Self {
            location: partial.map(Location::new),
            question: question.into(),
        }
    }

    pub fn needs_clarification(&self) -> bool {
        !self.question.is_empty()
    }

    /// Partial place name that accompanied a clarifying question, if any.
    pub fn partial_name(&self) -> Option<&str> {
        self.location
            .as_ref()
            .map(|l| l.name.as_str())
            .filter(|n| !n.is_empty())
    }
}

/// Resolves the current location of a user.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, user: &str) -> Result<Resolution, LocationError>;

    /// Record a place the user told us directly. Resolvers without local
    /// storage ignore it.
    async fn remember(&self, _user: &str, _place: &str) {}
}

/// Question asked when a user's location is unknown.
pub const ASK_LOCATION: &str = "Where are you?";

/// Resolver backed by an in-memory table of user locations.
///
/// Unknown users get `fallback` when one is set, otherwise a clarifying
/// question.
pub struct MemoryLocationResolver {
    known: RwLock<HashMap<String, String>>,
    fallback: Option<String>,
}

impl MemoryLocationResolver {
    pub fn new(fallback: Option<String>) -> Self {
        Self {
            known: RwLock::new(HashMap::new()),
            fallback,
        }
    }
}

#[async_trait]
impl LocationResolver for MemoryLocationResolver {
    async fn resolve(&self, user: &str) -> Result<Resolution, LocationError> {
        if let Some(place) = self.known.read().await.get(user) {
            return Ok(Resolution::resolved(place.clone()));
        }
        Ok(match &self.fallback {
            Some(place) => Resolution::resolved(place.clone()),
            None => Resolution::ask(ASK_LOCATION, None),
        })
    }

    async fn remember(&self, user: &str, place: &str) {
        self.known
            .write()
            .await
            .insert(user.to_string(), place.to_string());
        tracing::debug!(user, place, "Stored user location");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_name_ignores_empty() {
        assert_eq!(Resolution::ask("Where?", Some("")).partial_name(), None);
        assert_eq!(
            Resolution::ask("Which Springfield?", Some("Springfield")).partial_name(),
            Some("Springfield")
        );
        assert!(!Resolution::resolved("Austin").needs_clarification());
    }

    #[tokio::test]
    async fn memory_resolver_asks_for_unknown_user() {
        let resolver = MemoryLocationResolver::new(None);
        let res = resolver.resolve("alice").await.unwrap();
        assert!(res.needs_clarification());
        assert_eq!(res.question, ASK_LOCATION);
        assert!(res.location.is_none());
    }

    #[tokio::test]
    async fn memory_resolver_prefers_remembered_place() {
        let resolver = MemoryLocationResolver::new(Some("Boston".into()));
        assert_eq!(
            resolver.resolve("alice").await.unwrap(),
            Resolution::resolved("Boston")
        );

        resolver.remember("alice", "Austin").await;
        assert_eq!(
            resolver.resolve("alice").await.unwrap(),
            Resolution::resolved("Austin")
        );
        assert_eq!(
            resolver.resolve("bob").await.unwrap(),
            Resolution::resolved("Boston")
        );
    }
}
