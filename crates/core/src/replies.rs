//! Fixed reply strings the dispatcher and transport hand back without
//! going through the intent table.

/// Returned for any greeting-phrase hit.
pub const GREETING_REPLY: &str = "Hi! 👋 How can I help you today?";

/// Returned for any thanks-phrase hit.
pub const THANKS_REPLY: &str = "You're welcome! 😊 Let me know if you need anything else.";

/// Returned when the incoming message is empty after trimming.
pub const EMPTY_PROMPT: &str = "Please type a message.";

/// System instruction sent with every completion-provider fallback.
pub const SYSTEM_INSTRUCTION: &str = "You are a clothing brand support assistant.";

/// What the transport shows when the completion provider fails. The
/// dispatcher itself never emits this; translation happens at the HTTP
/// boundary.
pub const PROVIDER_APOLOGY: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";
