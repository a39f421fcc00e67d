#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns expired fuses into detonation commands.

use std::collections::BTreeSet;

use bomber_core::{BombId, Command, Event};

/// Detonation system that queues one `Command::DetonateBomb` per expired fuse.
#[derive(Debug, Default)]
pub struct Detonation {
    scratch: BTreeSet<BombId>,
}

impl Detonation {
    /// Creates a new detonation system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits detonation commands for every `Event::FuseExpired` in the batch.
    ///
    /// Commands come out in bomb identifier order, which is placement order,
    /// and a bomb reported twice in one batch is only detonated once.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        self.scratch.clear();

        for event in events {
            match event {
                Event::FuseExpired { bomb } => {
                    let _ = self.scratch.insert(*bomb);
                }
                Event::BombDiscarded { bomb, .. } => {
                    let _ = self.scratch.remove(bomb);
                }
                _ => {}
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.extend(
            self.scratch
                .iter()
                .map(|bomb| Command::DetonateBomb { bomb: *bomb }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomber_core::CellCoord;
    use std::time::Duration;

    #[test]
    fn unrelated_events_are_silent() {
        let mut system = Detonation::new();
        let mut out = Vec::new();

        system.handle(
            &[
                Event::TimeAdvanced {
                    dt: Duration::from_millis(16),
                },
                Event::BombPlaced {
                    bomb: BombId::new(0),
                    cell: CellCoord::new(1, 1),
                    fuse: Duration::from_millis(4_000),
                },
            ],
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn expiries_are_emitted_in_identifier_order_without_duplicates() {
        let mut system = Detonation::new();
        let mut out = Vec::new();

        system.handle(
            &[
                Event::FuseExpired {
                    bomb: BombId::new(5),
                },
                Event::FuseExpired {
                    bomb: BombId::new(2),
                },
                Event::FuseExpired {
                    bomb: BombId::new(5),
                },
            ],
            &mut out,
        );

        assert_eq!(
            out,
            vec![
                Command::DetonateBomb {
                    bomb: BombId::new(2),
                },
                Command::DetonateBomb {
                    bomb: BombId::new(5),
                },
            ]
        );
    }

    #[test]
    fn bombs_discarded_in_the_same_batch_are_skipped() {
        let mut system = Detonation::new();
        let mut out = Vec::new();

        system.handle(
            &[
                Event::FuseExpired {
                    bomb: BombId::new(1),
                },
                Event::BombDiscarded {
                    bomb: BombId::new(1),
                    cell: CellCoord::new(1, 1),
                },
            ],
            &mut out,
        );

        assert!(out.is_empty());
    }
}
