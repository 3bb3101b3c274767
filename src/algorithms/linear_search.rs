//! Linear search, scanning left to right.

use super::TraceGenerator;
use crate::error::{ScopeError, ScopeResult};
use crate::trace::{Complexity, IndexSpan, Markers, Outcome, StepBuilder, StepDraft, StepKind, TraceInput};

const CODE_LOOP: &str = "for i in 0..n: if a[i] == target: return i";
const CODE_NOT_FOUND: &str = "return -1";

/// Linear search generator. Accepts unsorted input.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearSearch;

impl TraceGenerator for LinearSearch {
    fn name(&self) -> &'static str {
        "linear_search"
    }

    fn complexity(&self) -> Complexity {
        Complexity::new("O(1)", "O(n)", "O(n)", "O(1)")
    }

    fn needs_target(&self) -> bool {
        true
    }

    fn record(&self, input: &TraceInput, builder: &mut StepBuilder) -> ScopeResult<()> {
        let values = &input.values;
        let target = input
            .target
            .ok_or_else(|| ScopeError::missing_target(self.name()))?;
        let mut markers = Markers::new();

        builder.record(
            StepDraft::new(
                StepKind::Initial,
                "Start linear search",
                format!("Looking for {target} by checking each of the {} values in turn.", values.len()),
            ),
            values,
            &markers,
        );

        for (i, &value) in values.iter().enumerate() {
            markers.current = Some(i);
            let hit = value == target;
            builder.record(
                StepDraft::new(
                    StepKind::Compare,
                    format!("Check index {i}"),
                    format!("Compare a[{i}] = {value} with the target {target}."),
                )
                .highlight(if hit { "Match." } else { "No match, move on." })
                .code(CODE_LOOP),
                values,
                &markers,
            );

            if hit {
                builder.record(
                    StepDraft::new(
                        StepKind::Complete,
                        format!("Found at index {i}"),
                        format!("{target} found after {} comparisons.", i + 1),
                    )
                    .code(CODE_LOOP)
                    .outcome(Outcome::Found { index: i }),
                    values,
                    &markers,
                );
                return Ok(());
            }
            markers.eliminated = vec![IndexSpan::new(0, i)];
        }

        markers.current = None;
        builder.record(
            StepDraft::new(
                StepKind::Complete,
                "Not found",
                format!("Every value was checked; {target} is not in the array."),
            )
            .code(CODE_NOT_FOUND)
            .outcome(Outcome::NotFound),
            values,
            &markers,
        );
        Ok(())
    }
}
