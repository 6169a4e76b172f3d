//! Shoreline - day/night driven environment state for an ocean scene

pub mod core;
pub mod atmosphere;
pub mod ocean;
pub mod fire;
pub mod audio;
pub mod scene;
