//! Pooled database execution: connection setup, reads, and batch writes.

pub mod pool;
pub mod reader;
pub mod writer;

pub use pool::{connect, health_check};
pub use reader::{RowConverter, RowReader};
pub use writer::{BatchReport, BatchWriter, RowBinding};
