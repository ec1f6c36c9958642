pub mod fetcher;

pub use fetcher::QuoteFetcher;
