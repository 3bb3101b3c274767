//! Insertion sort.
//!
//! The key is lifted out of the array (shown through the `held` marker) and
//! larger values shift right one slot at a time until the gap reaches the
//! key's position.

use super::TraceGenerator;
use crate::error::ScopeResult;
use crate::trace::{Complexity, Markers, Outcome, StepBuilder, StepDraft, StepKind, TraceInput};

const CODE_KEY: &str = "key = a[i]; j = i - 1";
const CODE_COMPARE: &str = "while j >= 0 and a[j] > key";
const CODE_SHIFT: &str = "a[j + 1] = a[j]; j = j - 1";
const CODE_INSERT: &str = "a[j + 1] = key";
const CODE_DONE: &str = "return a";

/// Insertion sort generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionSort;

impl TraceGenerator for InsertionSort {
    fn name(&self) -> &'static str {
        "insertion_sort"
    }

    fn complexity(&self) -> Complexity {
        Complexity::new("O(n)", "O(n^2)", "O(n^2)", "O(1)")
    }

    fn record(&self, input: &TraceInput, builder: &mut StepBuilder) -> ScopeResult<()> {
        let mut a = input.values.clone();
        let n = a.len();
        let mut markers = Markers::new();
        if n > 0 {
            markers.sorted.insert(0);
        }

        builder.record(
            StepDraft::new(
                StepKind::Initial,
                "Start insertion sort",
                format!("Sorting {n} values. The first value on its own is a sorted prefix."),
            ),
            &a,
            &markers,
        );

        for i in 1..n {
            let key = a[i];
            markers.clear_transient();
            markers.current = Some(i);
            markers.held = Some(key);
            builder.record(
                StepDraft::new(
                    StepKind::Select,
                    format!("Pick key {key}"),
                    format!("Take {key} from index {i} and insert it into the sorted prefix [0, {}].", i - 1),
                )
                .code(CODE_KEY),
                &a,
                &markers,
            );

            // `gap` is the empty slot the key will eventually fill
            let mut gap = i;
            while gap > 0 {
                let left = a[gap - 1];
                markers.current = Some(gap);
                markers.compare = Some((gap - 1, gap));
                builder.record(
                    StepDraft::new(
                        StepKind::Compare,
                        format!("Compare {left} with key {key}"),
                        format!("Is a[{}] = {left} larger than {key}?", gap - 1),
                    )
                    .highlight(if left > key {
                        format!("{left} > {key}, shift it right.")
                    } else {
                        format!("{left} <= {key}, the key goes here.")
                    })
                    .code(CODE_COMPARE),
                    &a,
                    &markers,
                );

                if left <= key {
                    break;
                }

                a[gap] = left;
                gap -= 1;
                markers.compare = None;
                markers.current = Some(gap);
                builder.record(
                    StepDraft::new(
                        StepKind::Shift,
                        format!("Shift {left} right"),
                        format!("{left} moves to index {}; the gap is now at index {gap}.", gap + 1),
                    )
                    .code(CODE_SHIFT),
                    &a,
                    &markers,
                );
            }

            a[gap] = key;
            markers.clear_transient();
            markers.held = None;
            markers.current = Some(gap);
            markers.sorted = (0..=i).collect();
            builder.record(
                StepDraft::new(
                    StepKind::Insert,
                    format!("Insert {key} at index {gap}"),
                    format!("The prefix [0, {i}] is now sorted."),
                )
                .code(CODE_INSERT),
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
                "Every key has been inserted; the array is sorted.",
            )
            .code(CODE_DONE)
            .outcome(Outcome::Sorted { early_exit: false }),
            &a,
            &markers,
        );
        Ok(())
    }
}
