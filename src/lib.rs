pub mod chatbot;
pub mod config;
pub mod dashboard;
pub mod eonet;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod metrics;
pub mod neo;
pub mod notify;
pub mod render;
pub mod schema;
pub mod stats;

#[cfg(test)]
mod test_server;
