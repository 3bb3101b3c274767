//! CLI output formatting.
//!
//! `format_*` functions build strings so they can be tested; `print_*`
//! functions write them to stdout.

use std::fmt::Write as _;

use crate::algorithms::Algorithm;
use crate::narration::{SpeechBackend, SpeechError};
use crate::playback::Renderer;
use crate::trace::{Markers, Outcome, Step, Trace};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print version information.
pub fn print_version() {
    println!("{}", format_version());
}

/// Version line, with the git hash when the build recorded one.
#[must_use]
pub fn format_version() -> String {
    let version = option_env!("ALGOSCOPE_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    match option_env!("GIT_HASH").filter(|h| !h.is_empty()) {
        Some(hash) => format!("algoscope {version} ({})", &hash[..hash.len().min(12)]),
        None => format!("algoscope {version}"),
    }
}

/// Print help message.
pub fn print_help() {
    println!(
        r"algoscope - step through classic algorithms one decision at a time

USAGE:
    algoscope <COMMAND> [OPTIONS]

COMMANDS:
    list                                List available algorithms

    trace <algorithm> <values>          Print every step of a trace
        -t, --target <N>                Search target (search algorithms)
        -c, --config <file.yaml>        Load configuration
        --json                          Emit the trace as JSON

    play <algorithm> <values>           Play the trace with narration
        -t, --target <N>                Search target (search algorithms)
        -c, --config <file.yaml>        Load configuration
        -s, --speed <S>                 very_slow, slow, normal, fast, very_fast
                                        or a delay in milliseconds
        --instant                       Do not wait between steps
        -q, --quiet                     Disable narration

    help                                Show this help message
    version                             Show version information

EXAMPLES:
    algoscope trace binary_search 1,3,5,7,9,11,13,15,17,19 --target 7
    algoscope play bubble_sort '5 1 4 2 8' --speed fast
    algoscope trace quick_sort 3,6,1,5 --json

LOGGING:
    Set ALGOSCOPE_LOG (e.g. ALGOSCOPE_LOG=debug) to see controller logs on stderr.
"
    );
}

/// Print the algorithm table.
pub fn print_algorithms() {
    print!("{}", format_algorithms());
}

/// Table of supported algorithms.
#[must_use]
pub fn format_algorithms() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:<8} {:<12} {:<12} {:<12} {}", "ALGORITHM", "TARGET", "BEST", "AVERAGE", "WORST", "SPACE");
    for algorithm in Algorithm::ALL {
        let c = algorithm.generator().complexity();
        let _ = writeln!(
            out,
            "{:<16} {:<8} {:<12} {:<12} {:<12} {}",
            algorithm.name(),
            if algorithm.needs_target() { "yes" } else { "no" },
            c.best,
            c.average,
            c.worst,
            c.space
        );
    }
    out
}

/// Array cells with marker decorations:
/// `<v>` compared, `{v}` swapped, `|v|` pivot, `_v_` minimum, `^v` current,
/// `v*` sorted, `·` eliminated by a search.
#[must_use]
pub fn format_cells(values: &[i64], markers: &Markers) -> String {
    let cells: Vec<String> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if markers.eliminated.iter().any(|span| span.contains(i)) {
                return "·".to_string();
            }
            let in_pair = |pair: Option<(usize, usize)>| pair.is_some_and(|(a, b)| a == i || b == i);
            let mut cell = if in_pair(markers.swap) {
                format!("{{{v}}}")
            } else if in_pair(markers.compare) {
                format!("<{v}>")
            } else if markers.pivot == Some(i) {
                format!("|{v}|")
            } else if markers.min_index == Some(i) {
                format!("_{v}_")
            } else {
                v.to_string()
            };
            if markers.current == Some(i) {
                cell.insert(0, '^');
            }
            if markers.sorted.contains(&i) {
                cell.push('*');
            }
            cell
        })
        .collect();
    format!("[{}]", cells.join(" "))
}

/// One step as a block of text.
#[must_use]
pub fn format_step(step: &Step, index: usize, total: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{:>3}/{total}] {}", index + 1, step.title);
    let _ = writeln!(out, "          {}", format_cells(&step.data.values, &step.data.markers));

    let markers = &step.data.markers;
    let mut extras = Vec::new();
    if let Some(target) = step.data.target {
        extras.push(format!("target={target}"));
    }
    if let Some(range) = markers.range {
        let mid = range.mid.map_or_else(|| "-".to_string(), |m| m.to_string());
        extras.push(format!("left={} right={} mid={mid}", range.left, range.right));
    }
    if let Some(key) = markers.held {
        extras.push(format!("key={key}"));
    }
    if let Some(span) = markers.partition {
        extras.push(format!("range=[{}, {}]", span.start, span.end));
    }
    if !extras.is_empty() {
        let _ = writeln!(out, "          {}", extras.join("  "));
    }

    let _ = writeln!(out, "          {}", step.description);
    if let Some(highlight) = &step.highlight {
        let _ = writeln!(out, "          > {highlight}");
    }
    if let Some(code) = &step.code {
        let _ = writeln!(out, "          code: {code}");
    }
    out
}

/// One-line summary of a terminal outcome.
#[must_use]
pub fn format_outcome(outcome: Option<Outcome>) -> String {
    match outcome {
        Some(Outcome::Found { index }) => format!("✓ Found at index {index}"),
        Some(Outcome::NotFound) => "✗ Not found".to_string(),
        Some(Outcome::Sorted { early_exit: true }) => "✓ Sorted (stopped early)".to_string(),
        Some(Outcome::Sorted { early_exit: false }) => "✓ Sorted".to_string(),
        None => "-".to_string(),
    }
}

/// Header block for a trace.
#[must_use]
pub fn format_header(trace: &Trace) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Algorithm: {}", trace.algorithm());
    let _ = writeln!(out, "Input:     {:?}", trace.input());
    if let Some(target) = trace.target() {
        let _ = writeln!(out, "Target:    {target}");
    }
    if let Some(complexity) = trace.get(0).and_then(|s| s.complexity.as_ref()) {
        let _ = writeln!(out, "Complexity: {complexity}");
    }
    let _ = writeln!(out, "Steps:     {}", trace.len());
    let _ = writeln!(out, "{RULE}");
    out
}

/// Footer block with the outcome and fingerprint.
#[must_use]
pub fn format_footer(trace: &Trace) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", format_outcome(trace.outcome()));
    if let Ok(hex) = trace.fingerprint_hex() {
        let _ = writeln!(out, "Fingerprint: {}", &hex[..16]);
    }
    let _ = writeln!(out, "{RULE}");
    out
}

/// Print a whole trace.
pub fn print_trace(trace: &Trace) {
    print!("{}", format_header(trace));
    for (index, step) in trace.iter().enumerate() {
        println!("{}", format_step(step, index, trace.len()));
    }
    print!("{}", format_footer(trace));
}

/// Renderer that prints each step to stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleRenderer {
    total: usize,
}

impl ConsoleRenderer {
    /// Renderer for a trace of `total` steps.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self { total }
    }
}

impl Renderer for ConsoleRenderer {
    fn render(&mut self, step: &Step, index: usize) {
        println!("{}", format_step(step, index, self.total));
    }
}

/// Speech backend that prints utterances instead of speaking them.
#[derive(Debug, Default)]
pub struct ConsoleSpeech {
    spoken: Vec<String>,
}

impl ConsoleSpeech {
    /// Everything spoken so far.
    #[must_use]
    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }
}

impl SpeechBackend for ConsoleSpeech {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        println!("          ♪ {text}\n");
        self.spoken.push(text.to_string());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }
}
