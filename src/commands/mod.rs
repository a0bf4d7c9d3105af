//! Command implementations

pub mod render;
pub mod up;
pub mod validate;
pub mod version;
