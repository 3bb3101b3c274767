//! Immutable algorithm traces.
//!
//! A [`Trace`] is the full, ordered sequence of [`Step`]s produced by one
//! generator run. Each step owns a deep copy of the working buffer and every
//! marker, so a renderer can redraw from a single step without looking at its
//! neighbours.
//!
//! Steps are only created through [`builder::StepBuilder`], which takes the
//! snapshot, and a trace is never mutated after [`builder::StepBuilder::finish`].

pub mod builder;
pub mod input;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

pub use builder::{StepBuilder, StepDraft};
pub use input::{parse_target, parse_values, TraceInput};

/// What kind of decision point a step captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Starting state, before any decision.
    Initial,
    /// Two values (or a value and the target) are compared.
    Compare,
    /// Two positions exchanged values.
    Swap,
    /// A value moved one slot right to open a gap.
    Shift,
    /// A held value was written into its slot.
    Insert,
    /// A key, minimum or candidate was selected.
    Select,
    /// A partition range and pivot were chosen.
    Partition,
    /// A range was split around a placed pivot.
    Split,
    /// Search bounds moved.
    RangeUpdate,
    /// A full pass finished and fixed at least one position.
    PassComplete,
    /// The algorithm stopped before its worst-case number of passes.
    EarlyExit,
    /// Final state.
    Complete,
}

impl StepKind {
    /// Whether a step of this kind ends a trace.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::EarlyExit | Self::Complete)
    }
}

/// Inclusive index span, e.g. an eliminated half or a partition range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpan {
    /// First index in the span.
    pub start: usize,
    /// Last index in the span (inclusive).
    pub end: usize,
}

impl IndexSpan {
    /// Create a span covering `start..=end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `index` lies inside the span.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

/// Live search bounds.
///
/// Bounds are signed: once the range is exhausted `right` may be `-1` and
/// `left > right` has to be representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRange {
    /// Lower bound (inclusive).
    pub left: i64,
    /// Upper bound (inclusive).
    pub right: i64,
    /// Midpoint under inspection, if one was computed.
    pub mid: Option<usize>,
}

impl SearchRange {
    /// Bounds with no midpoint yet.
    #[must_use]
    pub const fn new(left: i64, right: i64) -> Self {
        Self {
            left,
            right,
            mid: None,
        }
    }

    /// No candidates remain.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.left > self.right
    }
}

/// Index markers attached to a step.
///
/// Which fields are populated depends on the algorithm; renderers treat
/// `None`/empty as "not shown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    /// Pair of indices being compared.
    pub compare: Option<(usize, usize)>,
    /// Pair of indices that were just swapped.
    pub swap: Option<(usize, usize)>,
    /// Pivot index.
    pub pivot: Option<usize>,
    /// Index of the current minimum.
    pub min_index: Option<usize>,
    /// Index under the cursor (scan position, key slot, gap).
    pub current: Option<usize>,
    /// Value lifted out of the array (insertion sort key).
    pub held: Option<i64>,
    /// Indices known to be in their final position.
    pub sorted: BTreeSet<usize>,
    /// Search bounds.
    pub range: Option<SearchRange>,
    /// Spans ruled out by the search so far.
    pub eliminated: Vec<IndexSpan>,
    /// Range being partitioned.
    pub partition: Option<IndexSpan>,
}

impl Markers {
    /// Empty marker set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every index in `0..len` as sorted.
    pub fn sort_all(&mut self, len: usize) {
        self.sorted = (0..len).collect();
    }

    /// Drop the per-decision markers (compare/swap/current), keeping the
    /// ones that persist across steps.
    pub fn clear_transient(&mut self) {
        self.compare = None;
        self.swap = None;
        self.current = None;
    }
}

/// Terminal result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Search target located.
    Found {
        /// Index of the target.
        index: usize,
    },
    /// Search target absent.
    NotFound,
    /// Array is sorted.
    Sorted {
        /// Stopped before running every pass.
        early_exit: bool,
    },
}

impl Outcome {
    /// Whether a search located its target. Always false for sorts.
    #[must_use]
    pub const fn found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Index of the target for a successful search.
    #[must_use]
    pub const fn found_index(&self) -> Option<usize> {
        match self {
            Self::Found { index } => Some(*index),
            _ => None,
        }
    }
}

/// Algorithm-specific state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepData {
    /// Full array contents at this instant.
    pub values: Vec<i64>,
    /// Search target, for search algorithms.
    pub target: Option<i64>,
    /// Index markers.
    pub markers: Markers,
    /// Result, present on terminal steps.
    pub outcome: Option<Outcome>,
}

/// Static complexity annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    /// Best-case time.
    pub best: String,
    /// Average-case time.
    pub average: String,
    /// Worst-case time.
    pub worst: String,
    /// Auxiliary space.
    pub space: String,
}

impl Complexity {
    /// Build an annotation from its four orders.
    #[must_use]
    pub fn new(best: &str, average: &str, worst: &str, space: &str) -> Self {
        Self {
            best: best.to_string(),
            average: average.to_string(),
            worst: worst.to_string(),
            space: space.to_string(),
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "time best {} / avg {} / worst {}, space {}",
            self.best, self.average, self.worst, self.space
        )
    }
}

/// One immutable snapshot of algorithm state plus narration metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Position-stable id, strictly increasing within a trace.
    pub id: u32,
    /// Decision point captured.
    pub kind: StepKind,
    /// Short label.
    pub title: String,
    /// One or two sentences explaining the decision.
    pub description: String,
    /// Optional emphasis, e.g. the comparison result.
    pub highlight: Option<String>,
    /// State snapshot.
    pub data: StepData,
    /// Complexity annotation, identical on every step of a trace.
    pub complexity: Option<Complexity>,
    /// Pseudocode line matching this step.
    pub code: Option<String>,
}

impl Step {
    /// Text read aloud for this step: title, description and highlight.
    #[must_use]
    pub fn narration_text(&self) -> String {
        let mut text = format!("{}. {}", self.title, self.description);
        if let Some(highlight) = &self.highlight {
            text.push(' ');
            text.push_str(highlight);
        }
        text
    }

    /// Whether this step ends its trace.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }
}

/// Options every generator receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceOptions {
    /// Inputs longer than this are rejected.
    pub max_input_len: usize,
    /// Attach a pseudocode line to each step.
    pub attach_code: bool,
    /// Attach the complexity annotation to each step.
    pub attach_complexity: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            max_input_len: 64,
            attach_code: true,
            attach_complexity: true,
        }
    }
}

/// Ordered, non-empty, immutable sequence of steps for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    algorithm: String,
    input: Vec<i64>,
    target: Option<i64>,
    steps: Vec<Step>,
}

impl Trace {
    /// Assemble a trace.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NoSteps`] for an empty sequence and
    /// [`ScopeError::MalformedTrace`] if ids are not strictly increasing or
    /// the sequence does not end in exactly one terminal step.
    pub fn new(
        algorithm: impl Into<String>,
        input: Vec<i64>,
        target: Option<i64>,
        steps: Vec<Step>,
    ) -> ScopeResult<Self> {
        let Some(last) = steps.last() else {
            return Err(ScopeError::NoSteps);
        };
        if !steps.windows(2).all(|w| w[0].id < w[1].id) {
            return Err(ScopeError::malformed("step ids must be strictly increasing"));
        }
        if !last.is_terminal() {
            return Err(ScopeError::malformed("trace must end in a terminal step"));
        }
        if steps.iter().filter(|s| s.is_terminal()).count() != 1 {
            return Err(ScopeError::malformed("trace has more than one terminal step"));
        }

        Ok(Self {
            algorithm: algorithm.into(),
            input,
            target,
            steps,
        })
    }

    /// Name of the generating algorithm.
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Input the trace was generated from.
    #[must_use]
    pub fn input(&self) -> &[i64] {
        &self.input
    }

    /// Search target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<i64> {
        self.target
    }

    /// Number of steps (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index of the last step.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Step at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// All steps in order.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Iterate over steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Terminal step.
    #[must_use]
    pub fn terminal(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Outcome recorded on the terminal step.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.terminal().and_then(|s| s.data.outcome)
    }

    /// Blake3 digest of the binary encoding. Equal traces have equal
    /// fingerprints, byte for byte.
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails.
    pub fn fingerprint(&self) -> ScopeResult<[u8; 32]> {
        let encoded =
            bincode::serialize(self).map_err(|e| ScopeError::serialization(e.to_string()))?;
        Ok(*blake3::hash(&encoded).as_bytes())
    }

    /// Hex form of [`Trace::fingerprint`].
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails.
    pub fn fingerprint_hex(&self) -> ScopeResult<String> {
        let encoded =
            bincode::serialize(self).map_err(|e| ScopeError::serialization(e.to_string()))?;
        Ok(blake3::hash(&encoded).to_hex().to_string())
    }

    /// Pretty JSON export.
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails.
    pub fn to_json(&self) -> ScopeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ScopeError::serialization(e.to_string()))
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
