pub mod aggregator;
pub mod window;
