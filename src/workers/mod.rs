pub mod auth_gate;
pub mod controls;
pub mod core;
pub mod push;
pub mod song_sync;
pub mod widgets;
