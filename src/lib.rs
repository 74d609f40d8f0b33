//! Tender marketplace backend: companies post tenders, other companies apply,
//! owners accept or reject. All state lives in process memory.

pub mod app;
pub mod applications;
pub mod auth;
pub mod companies;
pub mod config;
pub mod envelope;
pub mod error;
pub mod search;
pub mod seed;
pub mod state;
pub mod storage;
pub mod store;
pub mod tenders;
pub mod validate;
