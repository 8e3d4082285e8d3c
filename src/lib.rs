// src/lib.rs

pub mod access;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod utils;

pub use routes::create_router;
pub use service::AttemptSearchService;
