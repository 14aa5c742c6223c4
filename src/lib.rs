// Library crate for integration tests.
pub mod ci;
pub mod classify;
pub mod config;
pub mod deploy;
pub mod error;
pub mod prober;
pub mod report;
pub mod routes;
pub mod server;
pub mod state;
pub mod targets;
pub mod upstream;
