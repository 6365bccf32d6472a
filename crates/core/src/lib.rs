pub mod intent;
pub mod models;
pub mod replies;
pub mod table;

pub use intent::{match_message, normalize_message, GREETING_PHRASES, THANKS_PHRASES};
pub use models::{ChatReply, ChatRequest, IntentRecord, MatchResult};
pub use table::IntentTable;
