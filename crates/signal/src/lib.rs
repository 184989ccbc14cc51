pub mod cascade;
pub mod classifier;
pub mod classify;
pub mod snapshot;
