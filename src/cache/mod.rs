pub mod error;
mod key;
pub mod stats;
pub mod store;
