//! Authoritative bomb storage and fuse scheduling.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use bomber_core::{BombId, CellCoord, PlacementRejection};

/// Bomb stored inside the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Bomb {
    pub(crate) id: BombId,
    pub(crate) cell: CellCoord,
    /// Simulation time at which the fuse runs out.
    pub(crate) due: Duration,
    /// Set once the fuse has been drained from the schedule.
    pub(crate) expired: bool,
}

/// Registry that owns live bombs, allocates identifiers and keeps the fuse
/// schedule ordered by due time.
#[derive(Debug)]
pub(crate) struct BombRegistry {
    entries: BTreeMap<BombId, Bomb>,
    schedule: BTreeSet<(Duration, BombId)>,
    next_bomb_id: BombId,
    clock: Duration,
}

impl BombRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            schedule: BTreeSet::new(),
            next_bomb_id: BombId::new(0),
            clock: Duration::ZERO,
        }
    }

    /// Number of live bombs, expired or not.
    pub(crate) fn len(&self) -> u32 {
        u32::try_from(self.entries.len()).unwrap_or(u32::MAX)
    }

    pub(crate) fn clock(&self) -> Duration {
        self.clock
    }

    pub(crate) fn occupant(&self, cell: CellCoord) -> Option<BombId> {
        self.entries
            .values()
            .find(|bomb| bomb.cell == cell)
            .map(|bomb| bomb.id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Bomb> {
        self.entries.values()
    }

    /// Places a bomb and schedules its fuse, or explains why it cannot.
    pub(crate) fn place(
        &mut self,
        cell: CellCoord,
        limit: u32,
        fuse: Duration,
    ) -> Result<BombId, PlacementRejection> {
        if self.len() >= limit {
            return Err(PlacementRejection::LimitReached);
        }
        if self.occupant(cell).is_some() {
            return Err(PlacementRejection::Occupied);
        }

        let id = self.next_bomb_id;
        self.next_bomb_id = BombId::new(id.get().saturating_add(1));
        let due = self.clock.saturating_add(fuse);
        let _ = self.entries.insert(
            id,
            Bomb {
                id,
                cell,
                due,
                expired: false,
            },
        );
        let _ = self.schedule.insert((due, id));
        Ok(id)
    }

    /// Advances the clock and drains every fuse that ran out, earliest first.
    pub(crate) fn advance(&mut self, dt: Duration) -> Vec<BombId> {
        self.clock = self.clock.saturating_add(dt);
        let mut expired = Vec::new();
        while let Some(&(due, id)) = self.schedule.first() {
            if due > self.clock {
                break;
            }
            let _ = self.schedule.pop_first();
            if let Some(bomb) = self.entries.get_mut(&id) {
                bomb.expired = true;
                expired.push(id);
            }
        }
        expired
    }

    /// Removes a bomb whose fuse already ran out.
    ///
    /// Unknown identifiers and bombs still ticking yield `None` and leave the
    /// registry untouched.
    pub(crate) fn take_expired(&mut self, id: BombId) -> Option<Bomb> {
        if !self.entries.get(&id)?.expired {
            return None;
        }
        self.entries.remove(&id)
    }

    /// Drops every bomb and pending fuse. Identifiers keep counting upward.
    pub(crate) fn clear(&mut self) -> Vec<Bomb> {
        self.schedule.clear();
        std::mem::take(&mut self.entries).into_values().collect()
    }
}
