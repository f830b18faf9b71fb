pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod oauth;
pub mod service;
pub mod store;
