//! Line-delimited JSON protocol spoken with the orchestrator.
//!
//! Requests arrive one JSON object per line on stdin; replies and progress
//! go to stdout as `PREFIX:{json}` lines, failures to stderr as `ERROR:`.

pub mod command;
pub mod writer;
pub mod dispatcher;

pub use command::{parse_bytes, parse_line, Command, ParsedLine};
pub use dispatcher::{CommandHandler, DispatchExit, DispatchSummary, Dispatcher};
pub use writer::{emit, emit_error, emit_ready, ProtocolProgressCallback};
