//! Tag a raw batch and feed it straight into the insights pipeline

use crate::tagger::TaggerHandle;
use chatgalaxy_core::{insights_from_tagged, EngineConfig, InsightsOutcome, Progress};
use chatgalaxy_records::{RawMessage, SenderRoster};

/// Progress across both phases of [`tag_and_generate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunProgress {
    Tagging(u8),
    Aggregating(Progress),
}

/// Tag `raw` on the worker, then aggregate whatever came back.
///
/// A worker failure ends the run with [`InsightsOutcome::Failed`]; a short
/// or partly malformed result is recorded in the diagnostics instead.
pub async fn tag_and_generate(
    tagger: &mut TaggerHandle,
    raw: Vec<RawMessage>,
    roster: &SenderRoster,
    config: &EngineConfig,
    mut on_progress: impl FnMut(RunProgress),
) -> InsightsOutcome {
    let tagged = match tagger
        .process(raw, |percent| on_progress(RunProgress::Tagging(percent)))
        .await
    {
        Ok(tagged) => tagged,
        Err(e) => {
            tracing::warn!("tagging failed: {}", e);
            return InsightsOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    let mut outcome = insights_from_tagged(
        tagged.messages,
        roster,
        tagged.shortfall,
        config,
        |p| on_progress(RunProgress::Aggregating(p)),
    )
    .await;
    if let InsightsOutcome::Ready(insights) = &mut outcome {
        insights.diagnostics.skipped_records = tagged.skipped;
    }
    outcome
}
