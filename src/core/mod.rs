//! Core types and utilities shared by every scene system

pub mod types;
pub mod error;
pub mod logging;
pub mod time;
pub mod shared;
pub mod approach;

pub use types::*;
pub use error::Error;
