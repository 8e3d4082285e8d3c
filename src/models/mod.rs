// src/models/mod.rs

pub mod attempt;
pub mod context;
pub mod quiz;
pub mod request;
pub mod user;
