//! Cell classification for the arena.

use bomber_core::{CellCoord, CellKind, GridError, MapLayout, SPAWN_CLEAR_ZONE};
use rand::Rng;

/// Fixed-size grid of cells. The shape never changes once built; only
/// breakable cells ever change kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl TileMap {
    /// A zero-sized map used before the first generation.
    pub(crate) fn empty() -> Self {
        Self {
            columns: 0,
            rows: 0,
            cells: Vec::new(),
        }
    }

    /// Builds a map whose border and even intersections are solid.
    ///
    /// Every other cell becomes breakable with `breakable_probability`, except
    /// the spawn clear-zone which is always left empty. One roll is drawn per
    /// free cell in row-major order so a seed reproduces the same map.
    pub(crate) fn generate<R: Rng>(
        columns: u32,
        rows: u32,
        breakable_probability: f64,
        rng: &mut R,
    ) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                let kind = if is_fixed_solid(cell, columns, rows) {
                    CellKind::Solid
                } else if rng.gen_bool(breakable_probability) && !SPAWN_CLEAR_ZONE.contains(&cell)
                {
                    CellKind::Breakable
                } else {
                    CellKind::Empty
                };
                cells.push(kind);
            }
        }
        Self {
            columns,
            rows,
            cells,
        }
    }

    pub(crate) fn from_layout(layout: &MapLayout) -> Self {
        Self {
            columns: layout.columns(),
            rows: layout.rows(),
            cells: layout.cells().to_vec(),
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports the kind of the provided cell.
    pub fn classify(&self, cell: CellCoord) -> Result<CellKind, GridError> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .ok_or(GridError::OutOfBounds {
                cell,
                columns: self.columns,
                rows: self.rows,
            })
    }

    /// Turns a breakable cell into an empty one.
    ///
    /// Returns `Ok(true)` when a wall was destroyed and `Ok(false)` when the
    /// cell was already empty or is solid.
    pub(crate) fn destroy(&mut self, cell: CellCoord) -> Result<bool, GridError> {
        let kind = self.classify(cell)?;
        if kind != CellKind::Breakable {
            return Ok(false);
        }
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            *slot = CellKind::Empty;
        }
        Ok(true)
    }

    /// Copies the current cells into a printable layout.
    #[must_use]
    pub fn to_layout(&self) -> Option<MapLayout> {
        MapLayout::from_cells(self.columns, self.rows, self.cells.clone())
    }

    /// Iterates over every wall cell in row-major order.
    pub fn walls(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| kind.is_wall())
            .map(move |(index, kind)| {
                let index = u32::try_from(index).unwrap_or(u32::MAX);
                (CellCoord::new(index % columns, index / columns), *kind)
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Whether generation always places a solid wall on the cell.
#[must_use]
pub fn is_fixed_solid(cell: CellCoord, columns: u32, rows: u32) -> bool {
    let (column, row) = (cell.column(), cell.row());
    let on_border = column == 0 || row == 0 || column + 1 == columns || row + 1 == rows;
    on_border || (column % 2 == 0 && row % 2 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn generate(probability: f64, seed: u64) -> TileMap {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        TileMap::generate(13, 11, probability, &mut rng)
    }

    #[test]
    fn border_and_even_intersections_are_solid() {
        for seed in 0..8 {
            let map = generate(0.7, seed);
            for row in 0..map.rows() {
                for column in 0..map.columns() {
                    let cell = CellCoord::new(column, row);
                    if is_fixed_solid(cell, map.columns(), map.rows()) {
                        assert_eq!(map.classify(cell), Ok(CellKind::Solid), "{cell:?}");
                    } else {
                        assert_ne!(map.classify(cell), Ok(CellKind::Solid), "{cell:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn layout_snapshot_round_trips_through_text() {
        let layout: MapLayout = "#####\n#.+.#\n#####".parse().expect("layout parses");
        let map = TileMap::from_layout(&layout);
        assert_eq!(map.to_layout(), Some(layout));
        assert_eq!(TileMap::empty().to_layout().map(|l| l.to_string()), Some(String::new()));
    }

    #[test]
    fn spawn_clear_zone_is_always_empty() {
        let map = generate(1.0, 3);
        for cell in SPAWN_CLEAR_ZONE {
            assert_eq!(map.classify(cell), Ok(CellKind::Empty));
        }
        assert_eq!(
            map.classify(CellCoord::new(3, 1)),
            Ok(CellKind::Breakable),
            "cells outside the clear-zone fill at probability one",
        );
    }

    #[test]
    fn zero_probability_leaves_interior_empty() {
        let map = generate(0.0, 11);
        assert!(map
            .walls()
            .all(|(cell, kind)| kind == CellKind::Solid
                && is_fixed_solid(cell, map.columns(), map.rows())));
    }

    #[test]
    fn same_seed_generates_same_map() {
        assert_eq!(generate(0.7, 99), generate(0.7, 99));
    }

    #[test]
    fn classify_rejects_cells_past_the_edge() {
        let map = generate(0.7, 1);
        assert_eq!(
            map.classify(CellCoord::new(13, 0)),
            Err(GridError::OutOfBounds {
                cell: CellCoord::new(13, 0),
                columns: 13,
                rows: 11,
            })
        );
        assert!(map.classify(CellCoord::new(12, 10)).is_ok());
        assert!(map.classify(CellCoord::new(0, 11)).is_err());
    }

    #[test]
    fn destroy_only_affects_breakable_cells() {
        let mut map = generate(1.0, 5);
        let breakable = CellCoord::new(3, 1);
        let solid = CellCoord::new(2, 2);

        assert_eq!(map.destroy(breakable), Ok(true));
        assert_eq!(map.classify(breakable), Ok(CellKind::Empty));
        assert_eq!(map.destroy(breakable), Ok(false), "second destroy is a no-op");
        assert_eq!(map.destroy(solid), Ok(false));
        assert_eq!(map.classify(solid), Ok(CellKind::Solid));
        assert!(map.destroy(CellCoord::new(40, 40)).is_err());
    }

    #[test]
    fn walls_report_coordinates_in_row_major_order() {
        let layout: MapLayout = "####\n#.+#\n####".parse().expect("layout parses");
        let map = TileMap::from_layout(&layout);
        let breakables: Vec<_> = map
            .walls()
            .filter(|(_, kind)| *kind == CellKind::Breakable)
            .map(|(cell, _)| cell)
            .collect();
        assert_eq!(breakables, vec![CellCoord::new(2, 1)]);
        assert_eq!(map.walls().count(), 11);
    }
}
