//! Text tagger boundary: typed worker protocol and a channel-backed worker

mod protocol;
mod run;
mod tagger;

pub use protocol::{TaggerEvent, TaggerRequest};
pub use run::{tag_and_generate, RunProgress};
pub use tagger::{spawn_tagger, TagOutcome, Tagger, TaggerHandle};
