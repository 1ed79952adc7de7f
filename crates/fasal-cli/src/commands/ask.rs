use fasal_core::assistant::{
    Assistant, Connectivity, GeminiAdvisor, OfflineGuide, ReplySource, TurnOutcome,
};
use fasal_core::error::FasalError;
use std::sync::Arc;

use crate::config::{self, Config};
use crate::output;

pub async fn run(
    query: &str,
    offline: bool,
    output_format: &str,
    cfg: &Config,
) -> Result<(), FasalError> {
    let guide = Arc::new(OfflineGuide::builtin()?);
    let mut assistant = Assistant::new(guide).with_timeout(cfg.assistant_timeout());

    match config::api_key() {
        Some(key) => {
            let advisor = GeminiAdvisor::with_endpoint(
                key,
                &cfg.assistant.base_url,
                &cfg.assistant.model,
                cfg.assistant_timeout(),
            )?;
            assistant = assistant.with_advisor(Arc::new(advisor));
        }
        None => tracing::info!("no API key in {}, answering offline", config::API_KEY_ENV),
    }
    if offline {
        assistant.set_connectivity(Connectivity::Offline);
    }

    let Some(outcome) = assistant.ask(query).await else {
        return Err(FasalError::InvalidInput("question must not be blank".into()));
    };

    if output_format == "json" {
        return output::json::print(&outcome);
    }
    match outcome {
        TurnOutcome::Answered(reply) => {
            if reply.source == ReplySource::Remote {
                tracing::debug!(seq = reply.seq, "answered by remote advisor");
            }
            println!("{}", reply.text);
        }
        // Single-turn CLI: nothing newer can overtake this turn
        TurnOutcome::Stale { .. } => {}
    }
    Ok(())
}
