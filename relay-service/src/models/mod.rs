pub mod event;

pub use event::{parse_batch, EventData, LogBatch, LogEntry};
