//! Movie catalog service: cache-aside reads over pluggable storage, with
//! ratings and watchlists.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod service;
pub mod state;
pub mod storage;

pub use error::{Result, ServiceError};
