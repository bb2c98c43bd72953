//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod footer;
pub mod header;
pub mod logs;
pub mod mood_bar;
pub mod sensors;
pub mod songs;
