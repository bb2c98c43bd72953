mod app;
pub mod dashboard;
mod login;
pub mod splash;

pub use app::{App, UIConfig, run};
