//! Message domain: the `messages` table and its single entity.

mod store;
mod types;

pub use store::{MessageStore, SEED_MESSAGES};
pub use types::{CreateMessageRequest, Message};
