//! CLI module for algoscope.
//!
//! All CLI logic lives here so it can be tested; `main.rs` only installs
//! logging and calls [`run_cli`].

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RunOptions};
pub use commands::{apply_speed, build_trace, exit_code_for, load_config, run_cli};
pub use output::{
    format_algorithms, format_cells, format_footer, format_header, format_outcome, format_step,
    format_version, print_algorithms, print_help, print_trace, print_version, ConsoleRenderer,
    ConsoleSpeech,
};
