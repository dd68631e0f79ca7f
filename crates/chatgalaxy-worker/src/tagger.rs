//! Tagger worker: a dedicated thread behind a typed request/response channel

use crate::protocol::{TaggerEvent, TaggerRequest};
use chatgalaxy_core::TagShortfall;
use chatgalaxy_records::{ingest, GalaxyError, Message, RawMessage, Result, WireMessage};
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Assigns sentiment and keywords to raw messages.
///
/// Implementations may return fewer tuples than they were given; the caller
/// treats that as a shortfall, not a failure.
pub trait Tagger: Send + 'static {
    fn tag_batch(
        &mut self,
        batch: &[RawMessage],
        progress: &mut dyn FnMut(u8),
    ) -> std::result::Result<Vec<WireMessage>, String>;
}

/// What came back from one `process` request
#[derive(Debug, Clone, Default)]
pub struct TagOutcome {
    pub messages: Vec<Message>,
    /// Returned tuples that failed validation
    pub skipped: usize,
    pub shortfall: Option<TagShortfall>,
}

fn encode<T: serde::Serialize>(frame: &T) -> Option<String> {
    match serde_json::to_string(frame) {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("dropping unencodable tagger frame: {}", e);
            None
        }
    }
}

/// Worker loop; runs until the request channel closes
fn run_worker<T: Tagger>(
    mut tagger: T,
    mut requests: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<String>,
) {
    debug!("tagger worker started");
    let send = |event: TaggerEvent| {
        if let Some(text) = encode(&event) {
            // receiver gone means nobody is waiting for this batch
            let _ = events.send(text);
        }
    };

    while let Some(frame) = requests.blocking_recv() {
        let request: TaggerRequest = match serde_json::from_str(&frame) {
            Ok(request) => request,
            Err(e) => {
                send(TaggerEvent::Error {
                    message: format!("unreadable request: {}", e),
                });
                continue;
            }
        };

        match request {
            TaggerRequest::Process(batch) => {
                let mut report = |percent: u8| send(TaggerEvent::Progress { percent });
                match tagger.tag_batch(&batch, &mut report) {
                    Ok(tagged) => {
                        let values = tagged
                            .iter()
                            .filter_map(|wire| serde_json::to_value(wire).ok())
                            .collect();
                        send(TaggerEvent::Result(values));
                    }
                    Err(message) => send(TaggerEvent::Error { message }),
                }
            }
        }
    }
    debug!("tagger worker stopped - channel closed");
}

/// Start a worker thread running `tagger`
pub fn spawn_tagger<T: Tagger>(tagger: T) -> Result<TaggerHandle> {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let thread = std::thread::Builder::new()
        .name("chatgalaxy-tagger".to_string())
        .spawn(move || run_worker(tagger, request_rx, event_tx))?;
    Ok(TaggerHandle {
        requests: request_tx,
        events: event_rx,
        thread,
    })
}

/// Caller side of the worker. One request is in flight at a time.
pub struct TaggerHandle {
    requests: mpsc::UnboundedSender<String>,
    events: mpsc::UnboundedReceiver<String>,
    thread: JoinHandle<()>,
}

impl TaggerHandle {
    /// Send a batch and wait for its terminal event, forwarding progress
    pub async fn process(
        &mut self,
        batch: Vec<RawMessage>,
        mut on_progress: impl FnMut(u8),
    ) -> Result<TagOutcome> {
        let requested = batch.len();
        let frame = serde_json::to_string(&TaggerRequest::Process(batch))?;
        self.requests
            .send(frame)
            .map_err(|_| GalaxyError::Worker("tagger worker is not running".into()))?;

        while let Some(text) = self.events.recv().await {
            match serde_json::from_str::<TaggerEvent>(&text)? {
                TaggerEvent::Progress { percent } => on_progress(percent),
                TaggerEvent::Error { message } => return Err(GalaxyError::Worker(message)),
                TaggerEvent::Result(values) => {
                    let ingested = ingest(&values);
                    let shortfall = TagShortfall::check(requested, values.len());
                    if let Some(s) = shortfall {
                        warn!("tagger returned {} of {} messages", s.received, s.requested);
                    }
                    info!(
                        "tagged {} messages ({} rejected)",
                        ingested.messages.len(),
                        ingested.skipped
                    );
                    return Ok(TagOutcome {
                        messages: ingested.messages,
                        skipped: ingested.skipped,
                        shortfall,
                    });
                }
            }
        }
        Err(GalaxyError::Worker("tagger worker hung up".into()))
    }

    /// Close the channel and wait for the thread to exit
    pub fn shutdown(self) -> Result<()> {
        let TaggerHandle {
            requests,
            events,
            thread,
        } = self;
        drop(requests);
        drop(events);
        thread
            .join()
            .map_err(|_| GalaxyError::Worker("tagger worker panicked".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatgalaxy_records::Sentiment;

    /// Tags every message positive with its words as keywords
    struct WordTagger;

    impl Tagger for WordTagger {
        fn tag_batch(
            &mut self,
            batch: &[RawMessage],
            progress: &mut dyn FnMut(u8),
        ) -> std::result::Result<Vec<WireMessage>, String> {
            progress(50);
            Ok(batch
                .iter()
                .map(|m| {
                    WireMessage(
                        m.id,
                        m.sender_index,
                        m.timestamp,
                        m.text.clone(),
                        Sentiment::Positive.code(),
                        m.text.split_whitespace().map(String::from).collect(),
                    )
                })
                .collect())
        }
    }

    struct FailingTagger;

    impl Tagger for FailingTagger {
        fn tag_batch(
            &mut self,
            _batch: &[RawMessage],
            _progress: &mut dyn FnMut(u8),
        ) -> std::result::Result<Vec<WireMessage>, String> {
            Err("lexicon missing".into())
        }
    }

    struct PanickingTagger;

    impl Tagger for PanickingTagger {
        fn tag_batch(
            &mut self,
            _batch: &[RawMessage],
            _progress: &mut dyn FnMut(u8),
        ) -> std::result::Result<Vec<WireMessage>, String> {
            panic!("tagger crashed");
        }
    }

    fn raw(n: u64) -> Vec<RawMessage> {
        (0..n)
            .map(|i| RawMessage {
                id: i,
                sender_index: i % 2,
                timestamp: 1_700_000_000 + i as i64,
                text: format!("hello w{}", i),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_round_trip_with_progress() {
        let mut handle = spawn_tagger(WordTagger).unwrap();
        let mut seen = Vec::new();
        let outcome = handle.process(raw(3), |p| seen.push(p)).await.unwrap();
        assert_eq!(seen, vec![50]);
        assert_eq!(outcome.messages.len(), 3);
        assert_eq!(outcome.messages[2].keywords, vec!["hello", "w2"]);
        assert_eq!(outcome.messages[0].sentiment, Sentiment::Positive);
        assert!(outcome.shortfall.is_none());

        let again = handle.process(raw(1), |_| {}).await.unwrap();
        assert_eq!(again.messages.len(), 1);
        handle.shutdown().unwrap();
    }

    #[tokio::test]
    async fn test_error_event_is_worker_error() {
        let mut handle = spawn_tagger(FailingTagger).unwrap();
        let err = handle.process(raw(2), |_| {}).await.unwrap_err();
        assert!(matches!(err, GalaxyError::Worker(ref m) if m == "lexicon missing"));
    }

    #[tokio::test]
    async fn test_crashed_worker_hangs_up() {
        let mut handle = spawn_tagger(PanickingTagger).unwrap();
        let err = handle.process(raw(2), |_| {}).await.unwrap_err();
        assert!(matches!(err, GalaxyError::Worker(_)));
        assert!(handle.shutdown().is_err());
    }
}
