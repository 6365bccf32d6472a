use serde::{Deserialize, Serialize};

/// One configured FAQ rule: trigger phrases mapped to canned replies.
///
/// Only `responses[0]` is ever returned to a user. Entries beyond the
/// first are carried so existing intent files load unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentRecord {
    pub patterns: Vec<String>,
    pub responses: Vec<String>,
}

impl IntentRecord {
    /// The reply this record produces on a hit. A record with no
    /// responses answers with an empty string.
    pub fn reply(&self) -> &str {
        self.responses.first().map(String::as_str).unwrap_or("")
    }
}

/// Outcome of running one message through the intent matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    Greeting,
    Thanks,
    FaqHit(String),
    NoMatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}
