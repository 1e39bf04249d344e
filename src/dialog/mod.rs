//! Restaurant dialog — state, follow-up classification, and the turn controller.

pub mod classifier;
pub mod controller;
pub mod state;

pub use classifier::{Detail, FollowUpAction};
pub use controller::RestaurantDialog;
pub use state::ConversationState;
