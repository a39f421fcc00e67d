//! Blast footprint of a single detonation.

use bomber_core::{CellCoord, CellKind, Direction, WorldPoint};

use crate::grid::TileMap;

/// Cells reached by a bomb detonating at `origin`, center first.
///
/// A solid center produces no explosion at all. Each arm reaches exactly one
/// tile and is blocked by a solid neighbour or the grid edge.
pub(crate) fn blast_cells(map: &TileMap, origin: CellCoord) -> Vec<CellCoord> {
    match map.classify(origin) {
        Ok(CellKind::Empty | CellKind::Breakable) => {}
        Ok(CellKind::Solid) | Err(_) => return Vec::new(),
    }

    let mut cells = Vec::with_capacity(1 + Direction::BLAST_ORDER.len());
    cells.push(origin);
    for direction in Direction::BLAST_ORDER {
        let Some(neighbor) = origin.neighbor(direction) else {
            continue;
        };
        match map.classify(neighbor) {
            Ok(CellKind::Empty | CellKind::Breakable) => cells.push(neighbor),
            Ok(CellKind::Solid) | Err(_) => {}
        }
    }
    cells
}

/// Whether a player standing at `player` is caught by the blast on `cell`.
pub(crate) fn catches(player: WorldPoint, cell: CellCoord, tile_length: f32) -> bool {
    player.distance(cell.center(tile_length)) < tile_length
}
