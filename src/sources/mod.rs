pub mod aggregator;
pub mod map;

pub use aggregator::SourceAggregator;
pub use map::{SourceEntry, SourceKey, SourceMap};
