//! Command-line interface: argument parsing and routing to the jobs

pub mod args;
pub mod help;
pub mod router;

pub use args::{Cli, Commands};
pub use help::get_log_level;
pub use router::{execute_command, run_job};
