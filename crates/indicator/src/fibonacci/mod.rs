pub mod signal;
pub mod zone;
