//! Persistent storage for conversation history

pub mod conversations;

pub use conversations::ConversationStore;
