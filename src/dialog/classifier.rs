//! Keyword classifier for follow-up questions.
//!
//! Each word is checked against an ordered keyword table; the first row that
//! contains the word decides the action. There is no NLU here.

use crate::search::Business;

/// A question about the business currently being discussed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    Rating,
    Phone,
    Call,
    Info,
    Address,
    Pictures,
    Menu,
}

/// What to do with a follow-up word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpAction {
    /// Answer from the current business.
    Detail(Detail),
    /// Move to the next result and search again.
    ShowAnother,
    /// The user liked the suggestion.
    Acknowledge,
    Thanks,
}

/// Keyword rows in priority order.
const KEYWORDS: &[(&[&str], FollowUpAction)] = &[
    (
        &["rated", "rating", "review", "recommend", "recommended"],
        FollowUpAction::Detail(Detail::Rating),
    ),
    (&["number", "phone"], FollowUpAction::Detail(Detail::Phone)),
    (&["call"], FollowUpAction::Detail(Detail::Call)),
    (&["information", "info"], FollowUpAction::Detail(Detail::Info)),
    (
        &["where", "location", "address", "direction", "directions", "addr"],
        FollowUpAction::Detail(Detail::Address),
    ),
    (&["pictures", "pic", "pics"], FollowUpAction::Detail(Detail::Pictures)),
    (&["menu", "have"], FollowUpAction::Detail(Detail::Menu)),
    (
        &["not", "else", "no", "anything", "something"],
        FollowUpAction::ShowAnother,
    ),
    (&["good", "great", "yes", "perfect"], FollowUpAction::Acknowledge),
    (&["thanks", "thank"], FollowUpAction::Thanks),
];

const TRAILING_PUNCTUATION: &[char] = &[')', '.', ',', ';', '?', '!', ':'];

/// Strip trailing punctuation and lower-case.
pub fn normalize(word: &str) -> String {
    word.trim_end_matches(TRAILING_PUNCTUATION).to_lowercase()
}

/// Whitespace-separated, normalized words of `text`, left to right.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(normalize)
}

/// Action bound to an already-normalized word, if any.
pub fn classify(word: &str) -> Option<FollowUpAction> {
    KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.contains(&word))
        .map(|(_, action)| *action)
}

impl Detail {
    /// Answer this question about `business`.
    pub fn render(self, business: &Business) -> String {
        match self {
            Self::Rating => format!("It has a {} star review", business.rating_display()),
            Self::Phone => business.display_phone.clone(),
            Self::Call => format!("You can reach them here: {}", business.display_phone),
            Self::Info => format!("Here's some more info: {}", business.info_url),
            Self::Address => format!("It's at {}", business.full_address()),
            Self::Pictures => format!("I found some pics here: {}", business.info_url),
            Self::Menu => format!("Yelp might have a menu... {}", business.info_url),
        }
    }
}
