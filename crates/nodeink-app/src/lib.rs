//! NodeInk Application
//!
//! Headless application shell: configuration, keyboard shortcuts and
//! replay of gesture scripts through an editor session.

mod config;
mod script;
mod shortcuts;

pub use config::{AppConfig, AppError, AppResult};
pub use script::{ReplayReport, ScriptCommand, graph_summary, parse_script, replay};
pub use shortcuts::{Shortcut, ShortcutRegistry};
