pub mod common;
pub mod config;
pub mod indicator;
pub mod market;
pub mod signal;
pub mod store;
