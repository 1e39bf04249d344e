//! Per-turn input from the host: the raw sentence plus its structured tags.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::language;

static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9']+").expect("word regex is valid")
});

/// Commands and objects tagged in a sentence by the host framework.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredInput {
    /// Command tokens ("find", "recommend").
    pub commands: Vec<String>,
    /// Object tokens, treated as opaque search terms.
    pub objects: Vec<String>,
}

impl StructuredInput {
    pub fn new<C, O>(commands: C, objects: O) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            objects: objects.into_iter().map(Into::into).collect(),
        }
    }

    /// Search terms: every object token followed by a single space.
    pub fn query(&self) -> String {
        self.objects.iter().map(|o| format!("{o} ")).collect()
    }
}

/// One user message delivered by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Identity of the user the conversation belongs to.
    pub user: String,
    /// Raw sentence as typed.
    pub sentence: String,
    pub input: StructuredInput,
}

impl Turn {
    pub fn new(user: &str, sentence: &str, input: StructuredInput) -> Self {
        Self {
            user: user.to_string(),
            sentence: sentence.to_string(),
            input,
        }
    }
}

/// The vocabulary that routes a sentence to this plugin.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub commands: Vec<String>,
    pub objects: Vec<String>,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            commands: [
                "find",
                "where",
                "show",
                "recommend",
                "recommendation",
                "recommendations",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            objects: language::FOODS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Trigger {
    /// True when the input carries at least one trigger command and one
    /// trigger object.
    pub fn matches(&self, input: &StructuredInput) -> bool {
        let has_command = input
            .commands
            .iter()
            .any(|c| self.commands.iter().any(|t| t.eq_ignore_ascii_case(c)));
        let has_object = input
            .objects
            .iter()
            .any(|o| self.objects.iter().any(|t| t.eq_ignore_ascii_case(o)));
        has_command && has_object
    }

    /// Tag a raw sentence against this trigger's vocabulary.
    ///
    /// Stand-in for the host's extraction when running locally: words are
    /// lower-cased and kept in sentence order.
    pub fn extract(&self, sentence: &str) -> StructuredInput {
        let mut input = StructuredInput::default();
        for m in WORD.find_iter(sentence) {
            let word = m.as_str().to_lowercase();
            if self.commands.contains(&word) {
                input.commands.push(word);
            } else if self.objects.contains(&word) {
                input.objects.push(word);
            }
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_joins_objects_with_trailing_space() {
        let input = StructuredInput::new(["find"], ["thai", "noodles"]);
        assert_eq!(input.query(), "thai noodles ");

        let single = StructuredInput::new(["find"], ["tacos"]);
        assert_eq!(single.query(), "tacos ");
    }

    #[test]
    fn query_preserves_token_order() {
        let objects = ["b", "a", "c", "a"];
        let input = StructuredInput::new(Vec::<String>::new(), objects);
        assert_eq!(input.query(), "b a c a ");
    }

    #[test]
    fn query_empty_without_objects() {
        assert_eq!(StructuredInput::default().query(), "");
    }

    #[test]
    fn trigger_requires_command_and_object() {
        let trigger = Trigger::default();
        assert!(trigger.matches(&StructuredInput::new(["find"], ["tacos"])));
        assert!(trigger.matches(&StructuredInput::new(["Recommend"], ["Sushi"])));
        assert!(!trigger.matches(&StructuredInput::new(["find"], Vec::<String>::new())));
        assert!(!trigger.matches(&StructuredInput::new(Vec::<String>::new(), ["tacos"])));
        assert!(!trigger.matches(&StructuredInput::new(["buy"], ["tacos"])));
    }

    #[test]
    fn extract_tags_commands_and_objects() {
        let trigger = Trigger::default();
        let input = trigger.extract("Can you find me some Tacos, or maybe BBQ?");
        assert_eq!(input.commands, vec!["find"]);
        assert_eq!(input.objects, vec!["tacos", "bbq"]);
        assert!(trigger.matches(&input));
    }

    #[test]
    fn extract_ignores_unknown_words() {
        let trigger = Trigger::default();
        let input = trigger.extract("what's the phone number?");
        assert!(input.commands.is_empty());
        assert!(input.objects.is_empty());
    }
}
