//! CLI layer: argument parsing, command dispatch and the session front end

pub mod args;
pub mod commands;
pub mod error;
pub mod output;
pub mod script;
pub mod session;

pub use args::{Cli, Commands};
pub use error::{CliError, CliResult};
pub use session::{RunReport, Session};
