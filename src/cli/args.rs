//! CLI argument parsing.
//!
//! Hand-rolled so it can be tested from any iterator of strings.

use std::path::PathBuf;

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// The command to execute.
    pub command: Command,
}

/// Options shared by `trace` and `play`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Algorithm name or alias.
    pub algorithm: String,
    /// Raw values text, e.g. `"5,3,8"`.
    pub values: String,
    /// Raw search target.
    pub target: Option<String>,
    /// YAML configuration file.
    pub config: Option<PathBuf>,
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List algorithms
    List,
    /// Print a full trace
    Trace {
        /// Algorithm and input.
        run: RunOptions,
        /// Emit JSON instead of text.
        json: bool,
    },
    /// Play a trace step by step
    Play {
        /// Algorithm and input.
        run: RunOptions,
        /// Speed preset or delay in milliseconds.
        speed: Option<String>,
        /// Skip the wall-clock delay between steps.
        instant: bool,
        /// Silence narration.
        quiet: bool,
    },
    /// Show help
    Help,
    /// Show version
    Version,
}

impl Args {
    /// Parse command-line arguments from an iterator.
    ///
    /// This method is testable as it accepts any iterator of strings,
    /// not just `std::env::args()`.
    #[must_use]
    pub fn parse_from<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    /// Parse command-line arguments from the environment.
    #[must_use]
    pub fn parse() -> Self {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Self {
        if args.len() < 2 {
            return Self {
                command: Command::Help,
            };
        }

        let command = match args[1].as_str() {
            "list" | "ls" => Command::List,
            "trace" => Self::parse_trace_command(args),
            "play" => Self::parse_play_command(args),
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => {
                eprintln!("Unknown command: {unknown}");
                Command::Help
            }
        };

        Self { command }
    }

    /// `<algorithm> <values>` followed by flags. Returns the options and the
    /// flags not consumed here.
    fn parse_run_options(name: &str, args: &[String]) -> Option<(RunOptions, Vec<String>)> {
        if args.len() < 4 {
            eprintln!("Error: '{name}' command requires an algorithm and values");
            return None;
        }

        let mut run = RunOptions {
            algorithm: args[2].clone(),
            values: args[3].clone(),
            ..RunOptions::default()
        };
        let mut rest = Vec::new();

        let mut i = 4;
        while i < args.len() {
            match args[i].as_str() {
                "-t" | "--target" | "--config" | "-c" if i + 1 >= args.len() => {
                    eprintln!("Error: '{}' requires a value", args[i]);
                    i += 1;
                }
                "-t" | "--target" => {
                    run.target = Some(args[i + 1].clone());
                    i += 2;
                }
                "-c" | "--config" => {
                    run.config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                }
                _ => {
                    rest.push(args[i].clone());
                    i += 1;
                }
            }
        }

        Some((run, rest))
    }

    fn parse_trace_command(args: &[String]) -> Command {
        let Some((run, rest)) = Self::parse_run_options("trace", args) else {
            return Command::Help;
        };
        let json = rest.iter().any(|a| a == "--json");
        Command::Trace { run, json }
    }

    fn parse_play_command(args: &[String]) -> Command {
        let Some((run, rest)) = Self::parse_run_options("play", args) else {
            return Command::Help;
        };

        let mut speed = None;
        let mut instant = false;
        let mut quiet = false;

        let mut i = 0;
        while i < rest.len() {
            match rest[i].as_str() {
                "-s" | "--speed" => {
                    if i + 1 < rest.len() {
                        speed = Some(rest[i + 1].clone());
                        i += 2;
                    } else {
                        eprintln!("Error: '--speed' requires a value");
                        i += 1;
                    }
                }
                "--instant" => {
                    instant = true;
                    i += 1;
                }
                "-q" | "--quiet" => {
                    quiet = true;
                    i += 1;
                }
                _ => i += 1,
            }
        }

        Command::Play {
            run,
            speed,
            instant,
            quiet,
        }
    }
}
