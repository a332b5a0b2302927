//! Simulated player walking from door to door

use pd_core::difficulty::ActionKind;
use pd_core::{Generator, LevelHost};

/// Reach the first pending door until none are left or `max_doors` were opened
///
/// Returns the number of doors opened.
pub fn explore(generator: &mut Generator, host: &mut dyn LevelHost, max_doors: usize) -> usize {
    let mut opened = 0;
    while opened < max_doors {
        let Some(door) = generator.pending_doors().into_iter().next() else {
            break;
        };

        generator.record_action(ActionKind::Movement);
        if !generator.on_door_reached(door.probe, host) {
            tracing::warn!(from = door.from.0, to = door.to.0, "pending door did not open");
            break;
        }
        opened += 1;
    }
    opened
}
