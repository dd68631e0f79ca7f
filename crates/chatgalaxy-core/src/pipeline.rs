//! Top-level orchestration
//!
//! Loads a dataset, validates records, scans, builds (or reuses) the graph
//! and assembles the report. Every error is caught here and turned into a
//! single [`InsightsOutcome::Failed`]; callers never see a partial report.

use crate::aggregator::{aggregate, aggregate_cooperative, AggregateOutput, Progress};
use crate::config::EngineConfig;
use crate::graph::{build_graph, GraphLimits};
use crate::insights::assemble;
use crate::report::InsightsReport;
use chatgalaxy_records::{ingest, Graph, Message, MessageStore, Result, SenderRoster};
use tracing::{info, warn};

/// The tagger returned fewer messages than it was asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagShortfall {
    pub requested: usize,
    pub received: usize,
}

impl TagShortfall {
    /// `None` unless `received < requested`
    pub fn check(requested: usize, received: usize) -> Option<Self> {
        (received < requested).then_some(Self {
            requested,
            received,
        })
    }

    pub fn missing(&self) -> usize {
        self.requested - self.received
    }
}

/// Recoverable conditions met during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Records that failed validation
    pub skipped_records: usize,
    /// Lines the store could not parse
    pub unreadable_lines: usize,
    pub tag_shortfall: Option<TagShortfall>,
    /// A stored graph was used instead of building one
    pub graph_reused: bool,
}

/// A finished run
#[derive(Debug, Clone)]
pub struct Insights {
    pub report: InsightsReport,
    pub graph: Graph,
    pub diagnostics: Diagnostics,
}

/// Terminal outcome of one run
#[derive(Debug, Clone)]
pub enum InsightsOutcome {
    Ready(Box<Insights>),
    Failed { reason: String },
}

impl InsightsOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, InsightsOutcome::Ready(_))
    }

    pub fn report(&self) -> Option<&InsightsReport> {
        match self {
            InsightsOutcome::Ready(insights) => Some(&insights.report),
            InsightsOutcome::Failed { .. } => None,
        }
    }

    pub fn into_result(self) -> std::result::Result<Insights, String> {
        match self {
            InsightsOutcome::Ready(insights) => Ok(*insights),
            InsightsOutcome::Failed { reason } => Err(reason),
        }
    }

    fn from_result(result: Result<Insights>) -> Self {
        match result {
            Ok(insights) => InsightsOutcome::Ready(Box::new(insights)),
            Err(e) => {
                warn!("insights run failed: {}", e);
                InsightsOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Validated input for one run
struct Prepared {
    messages: Vec<Message>,
    roster: SenderRoster,
    stored_graph: Option<Graph>,
    diagnostics: Diagnostics,
}

fn prepare(store: &dyn MessageStore, dataset_id: &str, config: &EngineConfig) -> Result<Prepared> {
    config.validate()?;
    let loaded = store.load(dataset_id)?;
    let ingested = ingest(&loaded.records);
    if ingested.skipped > 0 {
        warn!(
            "dataset {}: skipped {} malformed records",
            dataset_id, ingested.skipped
        );
    }
    Ok(Prepared {
        messages: ingested.messages,
        roster: loaded.roster,
        stored_graph: loaded.graph,
        diagnostics: Diagnostics {
            skipped_records: ingested.skipped,
            unreadable_lines: loaded.unreadable,
            ..Diagnostics::default()
        },
    })
}

/// Graph build + assembly once the scan is done
fn finish(
    output: AggregateOutput,
    messages: &[Message],
    stored_graph: Option<Graph>,
    config: &EngineConfig,
    mut diagnostics: Diagnostics,
) -> Insights {
    let graph = match stored_graph.filter(|g| !g.is_empty()) {
        Some(graph) => {
            diagnostics.graph_reused = true;
            graph
        }
        None => build_graph(&output.keywords, messages, &GraphLimits::from(config)),
    };
    let report = assemble(&output, &graph, config);
    info!(
        "insights ready: {} messages, {} senders, {} nodes, {} links",
        report.basic_stats.total_messages,
        report.basic_stats.unique_senders,
        graph.nodes.len(),
        graph.links.len()
    );
    Insights {
        report,
        graph,
        diagnostics,
    }
}

/// Run over a dataset from `store`
pub fn generate_insights(
    store: &dyn MessageStore,
    dataset_id: &str,
    config: &EngineConfig,
    on_progress: impl FnMut(Progress),
) -> InsightsOutcome {
    info!("generating insights for dataset {}", dataset_id);
    let result = prepare(store, dataset_id, config).map(|prepared| {
        let output = aggregate(&prepared.messages, &prepared.roster, config, on_progress);
        finish(
            output,
            &prepared.messages,
            prepared.stored_graph,
            config,
            prepared.diagnostics,
        )
    });
    InsightsOutcome::from_result(result)
}

/// Like [`generate_insights`], yielding to the tokio scheduler between chunks
pub async fn generate_insights_cooperative(
    store: &dyn MessageStore,
    dataset_id: &str,
    config: &EngineConfig,
    on_progress: impl FnMut(Progress),
) -> InsightsOutcome {
    info!("generating insights for dataset {}", dataset_id);
    let prepared = match prepare(store, dataset_id, config) {
        Ok(prepared) => prepared,
        Err(e) => return InsightsOutcome::from_result(Err(e)),
    };
    let output =
        aggregate_cooperative(&prepared.messages, &prepared.roster, config, on_progress).await;
    InsightsOutcome::Ready(Box::new(finish(
        output,
        &prepared.messages,
        prepared.stored_graph,
        config,
        prepared.diagnostics,
    )))
}

/// Run over messages that were just tagged. A shortfall is reported in the
/// diagnostics; whatever was received is still processed.
pub async fn insights_from_tagged(
    messages: Vec<Message>,
    roster: &SenderRoster,
    shortfall: Option<TagShortfall>,
    config: &EngineConfig,
    on_progress: impl FnMut(Progress),
) -> InsightsOutcome {
    if let Err(e) = config.validate() {
        return InsightsOutcome::from_result(Err(e));
    }
    if let Some(s) = shortfall {
        warn!(
            "tagger returned {} of {} messages, continuing with what arrived",
            s.received, s.requested
        );
    }
    let output = aggregate_cooperative(&messages, roster, config, on_progress).await;
    let diagnostics = Diagnostics {
        tag_shortfall: shortfall,
        ..Diagnostics::default()
    };
    InsightsOutcome::Ready(Box::new(finish(output, &messages, None, config, diagnostics)))
}
