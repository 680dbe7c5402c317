pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod models;
pub mod services;
