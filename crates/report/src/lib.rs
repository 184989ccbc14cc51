pub mod error;
pub mod render;
mod sections;
