//! Quote model, error taxonomy and persistence abstractions

pub mod config;
pub mod error;
pub mod log;
pub mod quote;
pub mod store;

// Re-export main types for cleaner imports
pub use error::QuoteError;
pub use quote::{QuoteResponse, RateQuote};
pub use store::{QuoteHook, QuoteStore, RateStorage, StoredQuote};
