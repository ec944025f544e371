pub mod aggregator;

pub use aggregator::IAggregatorV3;
