use match3_core::{GameEngine, TileSource};
use match3_types::ActionGroup;

use crate::hint::find_swap;

/// Outcome of an [`autoplay`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoplayReport {
    pub swaps: u32,
    pub rounds: u32,
    pub removed: u32,
    pub generated: u32,
    /// The run ended because no legal swap was left.
    pub stuck: bool,
}

/// Play up to `max_swaps` legal swaps, handing every produced group to `on_group`.
///
/// Groups already pending when this is called are delivered first.
pub fn autoplay_with<S, F>(engine: &mut GameEngine<S>, max_swaps: u32, mut on_group: F) -> AutoplayReport
where
    S: TileSource,
    F: FnMut(&ActionGroup),
{
    let mut report = AutoplayReport::default();
    while let Some(group) = engine.pop_action_group() {
        on_group(&group);
    }

    while report.swaps < max_swaps {
        let Some((a, b)) = engine.board().and_then(find_swap) else {
            report.stuck = true;
            break;
        };

        if engine.swap_and_eliminate(a, b) {
            report.swaps += 1;
            if let Some(cascade) = engine.last_cascade() {
                report.rounds += cascade.rounds;
                report.removed += cascade.removed;
                report.generated += cascade.generated;
            }
        } else {
            // find_swap only proposes matching swaps.
            break;
        }

        while let Some(group) = engine.pop_action_group() {
            on_group(&group);
        }
    }
    report
}

/// [`autoplay_with`] discarding the produced groups.
pub fn autoplay<S: TileSource>(engine: &mut GameEngine<S>, max_swaps: u32) -> AutoplayReport {
    autoplay_with(engine, max_swaps, |_| {})
}
