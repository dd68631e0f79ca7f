//! Message records, graph wire shapes and dataset storage access

mod error;
mod graph;
mod io;
mod message;
mod paths;
mod sender;
mod store;

pub use error::{GalaxyError, Result};
pub use graph::{Graph, GraphLink, GraphNode, NodeRef};
pub use io::{append_jsonl, atomic_write, read_jsonl_values, JsonlLines};
pub use message::{ingest, Ingested, Message, RawMessage, Sentiment, WireMessage};
pub use paths::{Paths, HOME_ENV};
pub use sender::{RosterEntry, SenderRoster};
pub use store::{
    DatasetRecords, JsonlStore, MemoryStore, MessageStore, GRAPH_FILE, MESSAGES_FILE,
    SENDERS_FILE,
};
