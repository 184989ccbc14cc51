pub mod columns;
pub mod entity;
pub mod error;
pub mod fibonacci;
