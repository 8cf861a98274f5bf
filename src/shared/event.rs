/**
 * Real-time Event Names
 *
 * Event and channel naming for the realtime notification layer. Events
 * arrive on the current user's private channel and carry a payload matching
 * the backend entity shape (a message for message events).
 */

/// New message created in one of the user's conversations
pub const EVENT_MESSAGE_CREATED: &str = "message.new";

/// An existing message got its read timestamp set
pub const EVENT_MESSAGE_READ: &str = "message.read";

/// A message was deleted
pub const EVENT_MESSAGE_DELETED: &str = "message.deleted";

/// Name of the private notification channel for a user.
///
/// Private channels require authentication through the backend's
/// broadcasting-auth endpoint before the broadcaster accepts the
/// subscription.
pub fn user_channel(user_id: u64) -> String {
    format!("private-App.Models.User.{}", user_id)
}
