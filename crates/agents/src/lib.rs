use std::sync::Arc;
use std::time::Instant;

use hemline_core::replies;
use hemline_core::{match_message, IntentTable, MatchResult};
use hemline_observability::AppMetrics;
use hemline_provider::{CompletionProvider, ProviderError};
use tracing::{info, instrument};

/// The response dispatcher: canned matching first, completion-provider
/// fallback second.
///
/// Provider failures are neither swallowed nor retried here; they
/// surface as `Err` for the transport to translate into a user-safe
/// reply.
pub struct SupportAgent<P>
where
    P: CompletionProvider,
{
    table: Arc<IntentTable>,
    provider: Arc<P>,
    metrics: Arc<AppMetrics>,
}

impl<P> Clone for SupportAgent<P>
where
    P: CompletionProvider,
{
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            provider: Arc::clone(&self.provider),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<P> SupportAgent<P>
where
    P: CompletionProvider,
{
    pub fn new(table: IntentTable, provider: Arc<P>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            table: Arc::new(table),
            provider,
            metrics,
        }
    }

    pub fn table(&self) -> &IntentTable {
        &self.table
    }

    #[instrument(skip(self, raw_message))]
    pub async fn handle_message(&self, raw_message: &str) -> Result<String, ProviderError> {
        let started = Instant::now();
        self.metrics.inc_request();

        let message = raw_message.trim();
        if message.is_empty() {
            return Ok(replies::EMPTY_PROMPT.to_string());
        }

        let matched = match_message(&self.table, message);
        let reply = match matched {
            MatchResult::Greeting => {
                self.metrics.inc_faq_hit();
                replies::GREETING_REPLY.to_string()
            }
            MatchResult::Thanks => {
                self.metrics.inc_faq_hit();
                replies::THANKS_REPLY.to_string()
            }
            MatchResult::FaqHit(reply) => {
                self.metrics.inc_faq_hit();
                reply
            }
            MatchResult::NoMatch => {
                self.metrics.inc_fallback();
                match self
                    .provider
                    .complete(replies::SYSTEM_INSTRUCTION, message)
                    .await
                {
                    Ok(text) => text,
                    Err(error) => {
                        self.metrics.inc_provider_failure();
                        return Err(error);
                    }
                }
            }
        };

        self.metrics.observe_latency(started.elapsed());
        info!(chars = message.len(), "message handled");

        Ok(reply)
    }
}
