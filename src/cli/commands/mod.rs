//! CLI command implementations.

mod clip;
mod config;
mod doctor;

pub use clip::{run_clip, ClipArgs};
pub use config::run_config;
pub use doctor::run_doctor;
