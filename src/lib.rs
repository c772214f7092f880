pub mod api;
pub mod confidence;
pub mod config;
pub mod demo_api;
pub mod history_export;
pub mod http_client;
pub mod provider;
pub mod session;
pub mod state;
