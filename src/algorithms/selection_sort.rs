//! Selection sort.

use super::TraceGenerator;
use crate::error::ScopeResult;
use crate::trace::{Complexity, Markers, Outcome, StepBuilder, StepDraft, StepKind, TraceInput};

const CODE_START: &str = "min = i";
const CODE_COMPARE: &str = "for j in i+1..n: if a[j] < a[min]";
const CODE_NEW_MIN: &str = "min = j";
const CODE_SWAP: &str = "swap(a[i], a[min])";
const CODE_DONE: &str = "return a";

/// Selection sort generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionSort;

impl TraceGenerator for SelectionSort {
    fn name(&self) -> &'static str {
        "selection_sort"
    }

    fn complexity(&self) -> Complexity {
        Complexity::new("O(n^2)", "O(n^2)", "O(n^2)", "O(1)")
    }

    fn record(&self, input: &TraceInput, builder: &mut StepBuilder) -> ScopeResult<()> {
        let mut a = input.values.clone();
        let n = a.len();
        let mut markers = Markers::new();

        builder.record(
            StepDraft::new(
                StepKind::Initial,
                "Start selection sort",
                format!("Sorting {n} values. Each pass selects the smallest remaining value."),
            ),
            &a,
            &markers,
        );

        for i in 0..n.saturating_sub(1) {
            let mut min = i;
            markers.clear_transient();
            markers.current = Some(i);
            markers.min_index = Some(min);
            builder.record(
                StepDraft::new(
                    StepKind::Select,
                    format!("Pass {}: start at index {i}", i + 1),
                    format!("Assume {} at index {i} is the minimum of the unsorted part.", a[i]),
                )
                .code(CODE_START),
                &a,
                &markers,
            );

            for j in i + 1..n {
                markers.compare = Some((min, j));
                let smaller = a[j] < a[min];
                builder.record(
                    StepDraft::new(
                        StepKind::Compare,
                        format!("Compare {} with minimum {}", a[j], a[min]),
                        format!("Is a[{j}] = {} smaller than a[{min}] = {}?", a[j], a[min]),
                    )
                    .highlight(if smaller { "Yes, new minimum." } else { "No." })
                    .code(CODE_COMPARE),
                    &a,
                    &markers,
                );

                if smaller {
                    min = j;
                    markers.compare = None;
                    markers.min_index = Some(min);
                    builder.record(
                        StepDraft::new(
                            StepKind::Select,
                            format!("New minimum {}", a[min]),
                            format!("The smallest value seen this pass is now at index {min}."),
                        )
                        .code(CODE_NEW_MIN),
                        &a,
                        &markers,
                    );
                }
            }

            markers.compare = None;
            if min != i {
                a.swap(i, min);
                markers.swap = Some((i, min));
                markers.min_index = Some(i);
                builder.record(
                    StepDraft::new(
                        StepKind::Swap,
                        format!("Swap {} into index {i}", a[i]),
                        format!("Exchange a[{i}] and a[{min}] so the minimum sits at the front of the unsorted part."),
                    )
                    .code(CODE_SWAP),
                    &a,
                    &markers,
                );
            }

            markers.clear_transient();
            markers.min_index = None;
            markers.sorted.insert(i);
            builder.record(
                StepDraft::new(
                    StepKind::PassComplete,
                    format!("Index {i} fixed"),
                    format!("{} is in its final position.", a[i]),
                ),
                &a,
                &markers,
            );
        }

        markers.clear_transient();
        markers.sort_all(n);
        builder.record(
            StepDraft::new(
                StepKind::Complete,
                "Sorting complete",
                "The last remaining value is the largest; the array is sorted.",
            )
            .code(CODE_DONE)
            .outcome(Outcome::Sorted { early_exit: false }),
            &a,
            &markers,
        );
        Ok(())
    }
}
