//! Quick sort with Lomuto partitioning.
//!
//! Recursion is replaced by an explicit work stack; the left sub-range is
//! always processed before the right one so traces are reproducible.

use super::TraceGenerator;
use crate::error::ScopeResult;
use crate::trace::{
    Complexity, IndexSpan, Markers, Outcome, StepBuilder, StepDraft, StepKind, TraceInput,
};

const CODE_PARTITION: &str = "pivot = a[hi]; i = lo";
const CODE_COMPARE: &str = "for j in lo..hi: if a[j] < pivot";
const CODE_SWAP: &str = "swap(a[i], a[j]); i = i + 1";
const CODE_PLACE: &str = "swap(a[i], a[hi])";
const CODE_SPLIT: &str = "quicksort(lo, i - 1); quicksort(i + 1, hi)";
const CODE_DONE: &str = "return a";

/// Quick sort generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickSort;

impl TraceGenerator for QuickSort {
    fn name(&self) -> &'static str {
        "quick_sort"
    }

    fn complexity(&self) -> Complexity {
        Complexity::new("O(n log n)", "O(n log n)", "O(n^2)", "O(log n)")
    }

    fn record(&self, input: &TraceInput, builder: &mut StepBuilder) -> ScopeResult<()> {
        let mut a = input.values.clone();
        let n = a.len();
        let mut markers = Markers::new();

        builder.record(
            StepDraft::new(
                StepKind::Initial,
                "Start quick sort",
                format!("Sorting {n} values by partitioning around the last value of each range."),
            ),
            &a,
            &markers,
        );

        let mut stack: Vec<(usize, usize)> = Vec::new();
        if n > 1 {
            stack.push((0, n - 1));
        }

        while let Some((lo, hi)) = stack.pop() {
            if lo == hi {
                markers.clear_transient();
                markers.partition = Some(IndexSpan::new(lo, hi));
                markers.pivot = None;
                markers.sorted.insert(lo);
                builder.record(
                    StepDraft::new(
                        StepKind::PassComplete,
                        format!("{} is in place", a[lo]),
                        format!("The range [{lo}, {hi}] has a single value, so it is already sorted."),
                    ),
                    &a,
                    &markers,
                );
                continue;
            }

            let pivot = a[hi];
            markers.clear_transient();
            markers.partition = Some(IndexSpan::new(lo, hi));
            markers.pivot = Some(hi);
            builder.record(
                StepDraft::new(
                    StepKind::Partition,
                    format!("Partition [{lo}, {hi}]"),
                    format!("Use {pivot} at index {hi} as the pivot. Smaller values move to the left."),
                )
                .code(CODE_PARTITION),
                &a,
                &markers,
            );

            let mut store = lo;
            for j in lo..hi {
                let value = a[j];
                markers.clear_transient();
                markers.compare = Some((j, hi));
                markers.current = Some(store);
                builder.record(
                    StepDraft::new(
                        StepKind::Compare,
                        format!("Compare {value} with pivot {pivot}"),
                        format!("Is a[{j}] = {value} smaller than the pivot?"),
                    )
                    .highlight(if value < pivot { "Yes, it belongs left." } else { "No, leave it." })
                    .code(CODE_COMPARE),
                    &a,
                    &markers,
                );

                if value < pivot {
                    if store != j {
                        a.swap(store, j);
                        markers.compare = None;
                        markers.swap = Some((store, j));
                        builder.record(
                            StepDraft::new(
                                StepKind::Swap,
                                format!("Swap {} and {}", a[j], a[store]),
                                format!("{value} moves to index {store}, inside the left part."),
                            )
                            .code(CODE_SWAP),
                            &a,
                            &markers,
                        );
                    }
                    store += 1;
                }
            }

            if store != hi {
                a.swap(store, hi);
                markers.clear_transient();
                markers.swap = Some((store, hi));
                markers.pivot = Some(store);
                builder.record(
                    StepDraft::new(
                        StepKind::Swap,
                        format!("Place pivot {pivot}"),
                        format!("Move the pivot to index {store}, between the two parts."),
                    )
                    .code(CODE_PLACE),
                    &a,
                    &markers,
                );
            }

            markers.clear_transient();
            markers.pivot = Some(store);
            markers.sorted.insert(store);
            let left_part = (store > lo).then(|| (lo, store - 1));
            let right_part = (store < hi).then(|| (store + 1, hi));
            builder.record(
                StepDraft::new(
                    StepKind::Split,
                    format!("Pivot {pivot} fixed at index {store}"),
                    split_description(left_part, right_part),
                )
                .code(CODE_SPLIT),
                &a,
                &markers,
            );

            // Pushed right first so the left part is processed first
            if let Some(range) = right_part {
                stack.push(range);
            }
            if let Some(range) = left_part {
                stack.push(range);
            }
        }

        markers.clear_transient();
        markers.pivot = None;
        markers.partition = None;
        markers.sort_all(n);
        builder.record(
            StepDraft::new(
                StepKind::Complete,
                "Sorting complete",
                "Every pivot is in place; the array is sorted.",
            )
            .code(CODE_DONE)
            .outcome(Outcome::Sorted { early_exit: false }),
            &a,
            &markers,
        );
        Ok(())
    }
}

fn split_description(left: Option<(usize, usize)>, right: Option<(usize, usize)>) -> String {
    match (left, right) {
        (Some((a, b)), Some((c, d))) => format!("Sort [{a}, {b}] and then [{c}, {d}]."),
        (Some((a, b)), None) | (None, Some((a, b))) => format!("Only [{a}, {b}] remains to sort."),
        (None, None) => "Nothing remains on either side.".to_string(),
    }
}
