//! Hand-authored map layouts expressed as ASCII rows.

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::CellKind;

const SOLID_GLYPH: char = '#';
const BREAKABLE_GLYPH: char = '+';
const EMPTY_GLYPH: char = '.';

/// Rectangular cell layout loaded from text.
///
/// Each non-blank line is one row; `#` marks a solid wall, `+` a breakable
/// wall and `.` an empty cell. Leading and trailing whitespace is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapLayout {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl MapLayout {
    /// Builds a layout from row-major cells.
    ///
    /// Returns `None` when the cell count does not match the dimensions.
    #[must_use]
    pub fn from_cells(columns: u32, rows: u32, cells: Vec<CellKind>) -> Option<Self> {
        let expected = usize::try_from(columns)
            .ok()?
            .checked_mul(usize::try_from(rows).ok()?)?;
        (cells.len() == expected).then_some(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Number of columns in the layout.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the layout.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell kinds in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }
}

impl FromStr for MapLayout {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::new();
        let mut columns: Option<usize> = None;
        let mut rows = 0usize;

        for line in value.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let width = line.chars().count();
            match columns {
                None => columns = Some(width),
                Some(expected) if expected != width => {
                    return Err(LayoutError::Ragged {
                        row: rows,
                        expected,
                        found: width,
                    });
                }
                Some(_) => {}
            }

            for (column, glyph) in line.chars().enumerate() {
                let kind = match glyph {
                    SOLID_GLYPH => CellKind::Solid,
                    BREAKABLE_GLYPH => CellKind::Breakable,
                    EMPTY_GLYPH => CellKind::Empty,
                    other => {
                        return Err(LayoutError::UnknownGlyph {
                            glyph: other,
                            column,
                            row: rows,
                        });
                    }
                };
                cells.push(kind);
            }
            rows += 1;
        }

        let columns = columns.ok_or(LayoutError::Empty)?;
        Ok(Self {
            columns: u32::try_from(columns).map_err(|_| LayoutError::TooLarge)?,
            rows: u32::try_from(rows).map_err(|_| LayoutError::TooLarge)?,
            cells,
        })
    }
}

impl fmt::Display for MapLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.columns).map_err(|_| fmt::Error)?;
        if width == 0 {
            return Ok(());
        }
        for row in self.cells.chunks(width) {
            for kind in row {
                let glyph = match kind {
                    CellKind::Solid => SOLID_GLYPH,
                    CellKind::Breakable => BREAKABLE_GLYPH,
                    CellKind::Empty => EMPTY_GLYPH,
                };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Reasons a layout string fails to parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The input contained no rows.
    #[error("layout contains no rows")]
    Empty,
    /// A row was wider or narrower than the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character other than `#`, `+` or `.` appeared.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Character that was not recognised.
        glyph: char,
        /// Zero-based column of the glyph.
        column: usize,
        /// Zero-based row of the glyph.
        row: usize,
    },
    /// The layout does not fit 32-bit coordinates.
    #[error("layout dimensions exceed the coordinate range")]
    TooLarge,
}
