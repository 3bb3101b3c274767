//! CLI command handlers.

use std::process::ExitCode;

use crate::algorithms::Algorithm;
use crate::config::ScopeConfig;
use crate::error::{ScopeError, ScopeResult};
use crate::narration::SpeechNarrator;
use crate::playback::{PlaybackController, RealtimeDriver, SpeedPreset};
use crate::trace::{Trace, TraceInput};

use super::args::RunOptions;
use super::output::{
    format_footer, format_header, print_algorithms, print_help, print_trace, print_version,
    ConsoleRenderer, ConsoleSpeech,
};
use super::{Args, Command};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    let result = match args.command {
        Command::List => {
            print_algorithms();
            Ok(())
        }
        Command::Trace { run, json } => trace_command(&run, json),
        Command::Play {
            run,
            speed,
            instant,
            quiet,
        } => play_command(&run, speed.as_deref(), instant, quiet),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code_for(&e)
        }
    }
}

/// 2 for input the user can fix, 1 for everything else.
#[must_use]
pub fn exit_code_for(error: &ScopeError) -> ExitCode {
    if error.is_input_error() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

/// Load the configuration named by `run`, or defaults.
///
/// # Errors
///
/// Returns error if the file cannot be read or fails validation.
pub fn load_config(run: &RunOptions) -> ScopeResult<ScopeConfig> {
    run.config
        .as_ref()
        .map_or_else(|| Ok(ScopeConfig::default()), ScopeConfig::load)
}

/// Resolve the algorithm, parse the input and generate the trace.
///
/// # Errors
///
/// Returns an input error for an unknown algorithm, malformed values or a
/// missing target.
pub fn build_trace(run: &RunOptions, config: &ScopeConfig) -> ScopeResult<Trace> {
    let algorithm: Algorithm = run.algorithm.parse()?;
    let input = TraceInput::parse(&run.values, run.target.as_deref())?;
    algorithm.generate(&input, &config.trace_options())
}

fn trace_command(run: &RunOptions, json: bool) -> ScopeResult<()> {
    let config = load_config(run)?;
    let trace = build_trace(run, &config)?;
    if json {
        println!("{}", trace.to_json()?);
    } else {
        print_trace(&trace);
    }
    Ok(())
}

/// Apply a `--speed` argument: preset label first, then milliseconds
/// checked against the configured bounds.
///
/// # Errors
///
/// Returns an input error for an unknown label or an out-of-range delay.
pub fn apply_speed(controller: &mut PlaybackController, text: &str) -> ScopeResult<()> {
    if let Ok(preset) = text.parse::<SpeedPreset>() {
        controller.set_speed(preset.into());
        return Ok(());
    }
    let digits = text.trim().trim_end_matches("ms").trim();
    let millis = digits.parse::<u64>().map_err(|_| {
        ScopeError::invalid_input(format!(
            "unknown speed '{text}' (expected a preset or milliseconds)"
        ))
    })?;
    controller.set_speed_millis(millis)
}

fn play_command(run: &RunOptions, speed: Option<&str>, instant: bool, quiet: bool) -> ScopeResult<()> {
    let config = load_config(run)?;
    let trace = build_trace(run, &config)?;

    let mut controller = PlaybackController::from_config(&config.playback)?;
    if let Some(speed) = speed {
        apply_speed(&mut controller, speed)?;
    }
    print!("{}", format_header(&trace));
    println!("Speed:     {}\n", controller.speed());

    // Attached after load so step 0 is printed once, by play()
    let total = trace.len();
    controller.load(trace);
    controller.set_renderer(ConsoleRenderer::new(total));
    if !quiet && config.narration.enabled {
        controller.subscribe(SpeechNarrator::from_config(
            ConsoleSpeech::default(),
            &config.narration,
        ));
    }

    controller.play()?;
    if instant {
        controller.run_to_end();
    } else {
        RealtimeDriver::new().run(&mut controller);
    }

    if let Some(trace) = controller.unload() {
        print!("{}", format_footer(&trace));
    }
    Ok(())
}
