//! Trace generators, one per algorithm family.
//!
//! Every generator implements [`TraceGenerator`] and guarantees:
//! - Deterministic output (same input, same steps, same ids)
//! - An initial step, one step per decision point, and exactly one terminal
//!   step carrying the [`Outcome`](crate::trace::Outcome)
//! - Self-contained steps, snapshotted through [`StepBuilder`]
//! - A valid trace for empty and single-element arrays
//!
//! # Generators
//!
//! 1. [`binary_search`] - halving a sorted range
//! 2. [`linear_search`] - scanning left to right
//! 3. [`bubble_sort`] - adjacent swaps with early exit
//! 4. [`insertion_sort`] - shifting into a sorted prefix
//! 5. [`selection_sort`] - selecting the minimum of the suffix
//! 6. [`quick_sort`] - Lomuto partitioning

pub mod binary_search;
pub mod bubble_sort;
pub mod insertion_sort;
pub mod linear_search;
pub mod quick_sort;
pub mod selection_sort;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};
use crate::trace::{Complexity, StepBuilder, Trace, TraceInput, TraceOptions};

pub use binary_search::BinarySearch;
pub use bubble_sort::BubbleSort;
pub use insertion_sort::InsertionSort;
pub use linear_search::LinearSearch;
pub use quick_sort::QuickSort;
pub use selection_sort::SelectionSort;

/// Contract shared by every trace generator.
pub trait TraceGenerator {
    /// Stable machine name, e.g. `"binary_search"`.
    fn name(&self) -> &'static str;

    /// Static complexity annotation.
    fn complexity(&self) -> Complexity;

    /// Whether the generator needs a search target.
    fn needs_target(&self) -> bool {
        false
    }

    /// Run the algorithm on `input`, recording each decision point.
    ///
    /// `input.target` is guaranteed present when [`Self::needs_target`] is true.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidInput`] for input the algorithm cannot
    /// accept.
    fn record(&self, input: &TraceInput, builder: &mut StepBuilder) -> ScopeResult<()>;

    /// Validate `input`, run [`Self::record`] and seal the trace.
    ///
    /// # Errors
    ///
    /// Returns an input error for oversized input or a missing target, and
    /// [`ScopeError::MalformedTrace`] if the recorded steps break the contract.
    fn generate(&self, input: &TraceInput, options: &TraceOptions) -> ScopeResult<Trace> {
        if input.values.len() > options.max_input_len {
            return Err(ScopeError::invalid_input(format!(
                "{} values given, at most {} allowed",
                input.values.len(),
                options.max_input_len
            )));
        }
        if self.needs_target() && input.target.is_none() {
            return Err(ScopeError::missing_target(self.name()));
        }

        let target = if self.needs_target() { input.target } else { None };
        let mut builder =
            StepBuilder::new(self.name(), self.complexity(), options).with_target(target);
        self.record(input, &mut builder)?;
        builder.finish(&input.values)
    }
}

/// Registry of the built-in generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// [`BinarySearch`]
    BinarySearch,
    /// [`LinearSearch`]
    LinearSearch,
    /// [`BubbleSort`]
    BubbleSort,
    /// [`InsertionSort`]
    InsertionSort,
    /// [`SelectionSort`]
    SelectionSort,
    /// [`QuickSort`]
    QuickSort,
}

impl Algorithm {
    /// Every registered algorithm, in display order.
    pub const ALL: [Self; 6] = [
        Self::BinarySearch,
        Self::LinearSearch,
        Self::BubbleSort,
        Self::InsertionSort,
        Self::SelectionSort,
        Self::QuickSort,
    ];

    /// The generator behind this entry.
    #[must_use]
    pub fn generator(self) -> &'static dyn TraceGenerator {
        match self {
            Self::BinarySearch => &BinarySearch,
            Self::LinearSearch => &LinearSearch,
            Self::BubbleSort => &BubbleSort,
            Self::InsertionSort => &InsertionSort,
            Self::SelectionSort => &SelectionSort,
            Self::QuickSort => &QuickSort,
        }
    }

    /// Machine name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.generator().name()
    }

    /// Whether a target must be supplied.
    #[must_use]
    pub fn needs_target(self) -> bool {
        self.generator().needs_target()
    }

    /// Generate a trace with this algorithm.
    ///
    /// # Errors
    ///
    /// See [`TraceGenerator::generate`].
    pub fn generate(self, input: &TraceInput, options: &TraceOptions) -> ScopeResult<Trace> {
        self.generator().generate(input, options)
    }
}

impl FromStr for Algorithm {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "binary_search" | "binary" => Ok(Self::BinarySearch),
            "linear_search" | "linear" => Ok(Self::LinearSearch),
            "bubble_sort" | "bubble" => Ok(Self::BubbleSort),
            "insertion_sort" | "insertion" => Ok(Self::InsertionSort),
            "selection_sort" | "selection" => Ok(Self::SelectionSort),
            "quick_sort" | "quicksort" | "quick" => Ok(Self::QuickSort),
            _ => Err(ScopeError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
