//! Bubble sort with early exit.
//!
//! A pass that makes no swaps proves the array sorted. When passes remain,
//! that pass ends in a single `EarlyExit` terminal step and no generic
//! completion step follows it. A quiet final pass skips nothing, so the run
//! completes normally.

use super::TraceGenerator;
use crate::error::ScopeResult;
use crate::trace::{Complexity, Markers, Outcome, StepBuilder, StepDraft, StepKind, TraceInput};

const CODE_COMPARE: &str = "if a[j] > a[j + 1]";
const CODE_SWAP: &str = "swap(a[j], a[j + 1]); swapped = true";
const CODE_PASS: &str = "for i in 0..n-1: swapped = false; for j in 0..n-1-i";
const CODE_EARLY_EXIT: &str = "if not swapped: break";
const CODE_DONE: &str = "return a";

/// Bubble sort generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct BubbleSort;

impl TraceGenerator for BubbleSort {
    fn name(&self) -> &'static str {
        "bubble_sort"
    }

    fn complexity(&self) -> Complexity {
        Complexity::new("O(n)", "O(n^2)", "O(n^2)", "O(1)")
    }

    fn record(&self, input: &TraceInput, builder: &mut StepBuilder) -> ScopeResult<()> {
        let mut a = input.values.clone();
        let n = a.len();
        let mut markers = Markers::new();

        builder.record(
            StepDraft::new(
                StepKind::Initial,
                "Start bubble sort",
                format!("Sorting {n} values. Each pass bubbles the largest unsorted value to the end."),
            ),
            &a,
            &markers,
        );

        if n <= 1 {
            markers.sort_all(n);
            builder.record(
                StepDraft::new(
                    StepKind::Complete,
                    "Already sorted",
                    format!("A list of {n} value(s) is sorted by definition."),
                )
                .code(CODE_DONE)
                .outcome(Outcome::Sorted { early_exit: false }),
                &a,
                &markers,
            );
            return Ok(());
        }

        for pass in 0..n - 1 {
            let mut swapped = false;

            for j in 0..n - 1 - pass {
                markers.clear_transient();
                markers.compare = Some((j, j + 1));
                let (left, right) = (a[j], a[j + 1]);
                builder.record(
                    StepDraft::new(
                        StepKind::Compare,
                        format!("Compare indices {j} and {}", j + 1),
                        format!("Pass {}: compare {left} and {right}.", pass + 1),
                    )
                    .highlight(if left > right {
                        format!("{left} > {right}, swap needed.")
                    } else {
                        "Already in order.".to_string()
                    })
                    .code(CODE_COMPARE),
                    &a,
                    &markers,
                );

                if left > right {
                    a.swap(j, j + 1);
                    swapped = true;
                    markers.compare = None;
                    markers.swap = Some((j, j + 1));
                    builder.record(
                        StepDraft::new(
                            StepKind::Swap,
                            format!("Swap {left} and {right}"),
                            format!("{left} moves right to index {}.", j + 1),
                        )
                        .code(CODE_SWAP),
                        &a,
                        &markers,
                    );
                }
            }

            markers.clear_transient();
            let passes_left = pass + 2 < n;
            if !swapped && passes_left {
                markers.sort_all(n);
                builder.record(
                    StepDraft::new(
                        StepKind::EarlyExit,
                        "No swaps occurred",
                        format!(
                            "Pass {} made no swaps, so the array is already sorted. Stopping early.",
                            pass + 1
                        ),
                    )
                    .code(CODE_EARLY_EXIT)
                    .outcome(Outcome::Sorted { early_exit: true }),
                    &a,
                    &markers,
                );
                return Ok(());
            }

            let fixed = n - 1 - pass;
            markers.sorted.insert(fixed);
            builder.record(
                StepDraft::new(
                    StepKind::PassComplete,
                    format!("Pass {} complete", pass + 1),
                    format!("{} is now in its final position at index {fixed}.", a[fixed]),
                )
                .code(CODE_PASS),
                &a,
                &markers,
            );
        }

        markers.sort_all(n);
        builder.record(
            StepDraft::new(
                StepKind::Complete,
                "Sorting complete",
                format!("All {} passes finished; the array is sorted.", n - 1),
            )
            .code(CODE_DONE)
            .outcome(Outcome::Sorted { early_exit: false }),
            &a,
            &markers,
        );
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::trace::TraceOptions;
    use proptest::prelude::*;

    proptest! {
        /// Falsification: the terminal step holds the sorted input.
        #[test]
        fn prop_terminal_is_sorted(values in prop::collection::vec(-100i64..100, 0..30)) {
            let mut expected = values.clone();
            expected.sort_unstable();

            let trace = BubbleSort.generate(&TraceInput::new(values), &TraceOptions::default());
            let last = trace.ok().and_then(|t| t.terminal().map(|s| s.data.values.clone()));
            prop_assert_eq!(last, Some(expected));
        }

        /// Falsification: exactly one terminal step, and it is last.
        #[test]
        fn prop_single_terminal(values in prop::collection::vec(-100i64..100, 0..30)) {
            let trace = BubbleSort.generate(&TraceInput::new(values), &TraceOptions::default());
            prop_assert!(trace.is_ok());
            if let Ok(trace) = trace {
                let terminals = trace.iter().filter(|s| s.is_terminal()).count();
                prop_assert_eq!(terminals, 1);
                prop_assert!(trace.terminal().is_some_and(|s| s.is_terminal()));
            }
        }
    }
}
