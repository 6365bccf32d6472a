use crate::models::MatchResult;
use crate::table::IntentTable;

/// Phrases answered with the canned greeting before the table is
/// consulted.
pub const GREETING_PHRASES: [&str; 5] = ["hi", "hello", "hey", "good morning", "good evening"];

/// Phrases answered with the canned acknowledgment.
pub const THANKS_PHRASES: [&str; 3] = ["thank you", "thanks", "thx"];

/// Lowercase the raw message. Containment checks run against this
/// form; punctuation and whitespace are left alone on purpose.
pub fn normalize_message(input: &str) -> String {
    input.to_lowercase()
}

/// Resolve a user message against the greeting/thanks phrase sets and
/// then the FAQ table, first match wins.
///
/// Matching is plain substring containment, not whole-word: "this is
/// hilarious" greets because "hi" is contained in it. That looseness is
/// inherited behavior the shipped intent files rely on, so it stays.
pub fn match_message(table: &IntentTable, user_message: &str) -> MatchResult {
    let msg = normalize_message(user_message);

    if contains_any(&msg, &GREETING_PHRASES) {
        return MatchResult::Greeting;
    }

    if contains_any(&msg, &THANKS_PHRASES) {
        return MatchResult::Thanks;
    }

    for record in table.records() {
        for pattern in &record.patterns {
            if msg.contains(pattern.as_str()) {
                return MatchResult::FaqHit(record.reply().to_string());
            }
        }
    }

    MatchResult::NoMatch
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
