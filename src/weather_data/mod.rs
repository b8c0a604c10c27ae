pub mod error;
pub mod fetcher;
pub mod radiation;
pub mod range_reader;
