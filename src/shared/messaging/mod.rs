//! Messaging Data Model
//!
//! Conversations, messages and users as the backend exposes them, plus the
//! request/response DTOs for the messaging endpoints. The backend owns these
//! entities; the client holds a read-mostly cached copy.

pub mod conversation;
pub mod message;
pub mod user;

pub use conversation::{
    Conversation, CreateConversationRequest, ListConversationsResponse, Participant,
};
pub use message::{
    ChatMessage, DeliveryState, ListMessagesResponse, SendMessageRequest, UnreadCountResponse,
    UpdateMessageRequest,
};
pub use user::{AuthResponse, LoginRequest, Role, SearchUsersResponse, UserInfo};
