//! Result persistence: the sink the driver hands finished bundles to.

mod sink;

pub use sink::{load_results, JsonFileSink, MemorySink, ResultSink};
