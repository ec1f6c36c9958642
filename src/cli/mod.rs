pub mod report;
pub mod server;
pub mod setup;
