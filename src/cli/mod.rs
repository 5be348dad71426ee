pub mod commands;
pub mod core;
mod help;
pub mod io;
pub mod output;
mod shell;
pub mod shell_context;

pub use shell::{run_cli, SCRIPT_ENV};
