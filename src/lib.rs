// Library modules, shared by the binary and integration tests
pub mod chunking;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod provider;
pub mod server;
pub mod services;
pub mod utils;
