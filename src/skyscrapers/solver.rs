use crate::dlx::{DlxError, ExactCover, Memo, SearchHooks};
use itertools::Itertools;
use std::fmt::Display;
use std::io::{self, BufRead};
use std::path::Path;

/// Latin square constraints. Visibility clues are checked by the hooks instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Requirement {
    /// The cell holds a building.
    Cell {
        /// 0-based column.
        x: usize,
        /// 0-based row.
        y: usize,
    },
    /// Row `y` holds a building of `height`.
    Row {
        /// 0-based row.
        y: usize,
        /// Building height, from 1.
        height: usize,
    },
    /// Column `x` holds a building of `height`.
    Column {
        /// 0-based column.
        x: usize,
        /// Building height, from 1.
        height: usize,
    },
}

/// Putting a building of `height` on cell `x`, `y` (0-based, heights from 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Building {
    /// 0-based column.
    pub x: usize,
    /// 0-based row.
    pub y: usize,
    /// Height, from 1.
    pub height: usize,
}

/// Number of buildings seen from a side, `0` meaning no clue. Each list is indexed by
/// column (north, south) or row (west, east).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clues {
    /// Seen from the top, per column.
    pub north: Vec<usize>,
    /// Seen from the left, per row.
    pub west: Vec<usize>,
    /// Seen from the right, per row.
    pub east: Vec<usize>,
    /// Seen from the bottom, per column.
    pub south: Vec<usize>,
}

/// Counts the buildings visible when looking along `heights`: each one taller than
/// everything before it.
pub fn visible<I: IntoIterator<Item = usize>>(heights: I) -> usize {
    heights
        .into_iter()
        .fold((0, 0), |(tallest, seen), height| {
            if height > tallest {
                (height, seen + 1)
            } else {
                (tallest, seen)
            }
        })
        .1
}

fn clue_holds(clue: usize, seen: usize) -> bool {
    clue == 0 || clue == seen
}

/// A skyscrapers puzzle: grid size, clues and given heights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skyscrapers {
    size: usize,
    clues: Clues,
    givens: Vec<Vec<usize>>,
}

impl Skyscrapers {
    /// Checks that every clue list and the given grid fit an `size`×`size` puzzle.
    ///
    /// # Errors
    ///
    /// [`DlxError::InvalidPuzzle`] on a size mismatch or a value above `size`.
    pub fn new(size: usize, clues: Clues, givens: Vec<Vec<usize>>) -> Result<Self, DlxError> {
        if size == 0 {
            return Err(DlxError::InvalidPuzzle("size must be positive".to_owned()));
        }

        let sides = [
            ("north", &clues.north),
            ("west", &clues.west),
            ("east", &clues.east),
            ("south", &clues.south),
        ];
        for (side, values) in sides {
            if values.len() != size {
                return Err(DlxError::InvalidPuzzle(format!(
                    "{side} has {} clues, expected {size}",
                    values.len()
                )));
            }
            if values.iter().any(|&clue| clue > size) {
                return Err(DlxError::InvalidPuzzle(format!(
                    "{side} clue larger than {size}"
                )));
            }
        }

        if givens.len() != size || givens.iter().any(|row| row.len() != size) {
            return Err(DlxError::InvalidPuzzle(format!(
                "givens must be a {size}x{size} grid"
            )));
        }
        if givens.iter().flatten().any(|&height| height > size) {
            return Err(DlxError::InvalidPuzzle(format!(
                "given height larger than {size}"
            )));
        }

        Ok(Self {
            size,
            clues,
            givens,
        })
    }

    /// Puzzle side length.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Builds the Latin square part of the puzzle. A given cell only gets its given
    /// height.
    ///
    /// # Errors
    ///
    /// Never in practice; the construction is checked by [`ExactCover`].
    pub fn to_problem(&self) -> Result<ExactCover<Requirement, Building>, DlxError> {
        let n = self.size;
        let cells = (0..n).cartesian_product(0..n);

        let requirements = cells
            .clone()
            .map(|(y, x)| Requirement::Cell { x, y })
            .chain(
                (0..n)
                    .cartesian_product(1..=n)
                    .map(|(y, height)| Requirement::Row { y, height }),
            )
            .chain(
                (0..n)
                    .cartesian_product(1..=n)
                    .map(|(x, height)| Requirement::Column { x, height }),
            );

        let actions = cells.flat_map(|(y, x)| {
            let given = self.givens[y][x];
            let heights = if given == 0 { 1..=n } else { given..=given };
            heights.map(move |height| {
                (
                    Building { x, y, height },
                    [
                        Requirement::Cell { x, y },
                        Requirement::Row { y, height },
                        Requirement::Column { x, height },
                    ],
                )
            })
        });

        ExactCover::from_parts(requirements, actions, [])
    }

    /// Hooks that reject a branch as soon as a filled row or column breaks a clue.
    #[must_use]
    pub fn hooks(&self) -> VisibilityCheck<'_> {
        VisibilityCheck {
            puzzle: self,
            grid: vec![vec![0; self.size]; self.size],
        }
    }

    /// Lays the buildings of a solution out as a grid.
    #[must_use]
    pub fn decode(&self, solution: &[Building]) -> Grid {
        let mut grid = vec![vec![0; self.size]; self.size];
        for building in solution {
            if let Some(cell) = grid
                .get_mut(building.y)
                .and_then(|row| row.get_mut(building.x))
            {
                *cell = building.height;
            }
        }
        Grid(grid)
    }

    /// Whether a complete grid satisfies every clue.
    #[must_use]
    pub fn satisfies_clues(&self, grid: &Grid) -> bool {
        (0..self.size).all(|i| self.row_holds(&grid.0, i) && self.column_holds(&grid.0, i))
    }

    fn row_holds(&self, grid: &[Vec<usize>], y: usize) -> bool {
        let row = &grid[y];
        clue_holds(self.clues.west[y], visible(row.iter().copied()))
            && clue_holds(self.clues.east[y], visible(row.iter().rev().copied()))
    }

    fn column_holds(&self, grid: &[Vec<usize>], x: usize) -> bool {
        let column = grid.iter().map(|row| row[x]).collect_vec();
        clue_holds(self.clues.north[x], visible(column.iter().copied()))
            && clue_holds(self.clues.south[x], visible(column.iter().rev().copied()))
    }
}

/// Tracks the partially filled grid during the search and checks the clues of every
/// row and column that becomes full.
#[derive(Debug, Clone)]
pub struct VisibilityCheck<'a> {
    puzzle: &'a Skyscrapers,
    grid: Vec<Vec<usize>>,
}

impl SearchHooks<Building> for VisibilityCheck<'_> {
    type Token = ();

    fn on_row_selected(&mut self, building: &Building, memo: &mut Memo<()>) {
        let Building { x, y, height } = *building;
        self.grid[y][x] = height;

        let row_full = self.grid[y].iter().all(|&h| h != 0);
        let column_full = self.grid.iter().all(|row| row[x] != 0);

        if (row_full && !self.puzzle.row_holds(&self.grid, y))
            || (column_full && !self.puzzle.column_holds(&self.grid, x))
        {
            memo.mark_invalid();
        }
    }

    fn on_row_deselected(&mut self, building: &Building) {
        self.grid[building.y][building.x] = 0;
    }
}

/// Building heights by row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid(pub Vec<Vec<usize>>);

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines = self.0.iter().map(|row| row.iter().join(" "));
        write!(f, "{}", lines.format("\n"))
    }
}

/// Parses a puzzle: the size, then the north, west, east and south clue lines, then
/// `size` lines of given heights. `0` means no clue or an empty cell.
///
/// # Errors
///
/// [`DlxError::Parse`] for a missing line or a non-numeric value, and the errors of
/// [`Skyscrapers::new`].
pub fn parse_skyscrapers<B: BufRead>(reader: B) -> Result<Skyscrapers, DlxError> {
    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let numbers = line
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<usize>()
                    .map_err(|e| DlxError::parse(index + 1, format!("bad number `{token}`: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        lines.push((index + 1, numbers));
    }

    let end = lines.last().map_or(1, |(number, _)| number + 1);
    let mut lines = lines.into_iter();
    let mut next = |what: &str| {
        lines
            .next()
            .map(|(_, numbers)| numbers)
            .ok_or_else(|| DlxError::parse(end, format!("missing {what}")))
    };

    let size = match next("size")?.as_slice() {
        [size] => *size,
        _ => return Err(DlxError::parse(1, "first line must hold just the size")),
    };
    let clues = Clues {
        north: next("north clues")?,
        west: next("west clues")?,
        east: next("east clues")?,
        south: next("south clues")?,
    };
    let givens = (0..size)
        .map(|_| next("grid row"))
        .collect::<Result<Vec<_>, _>>()?;

    Skyscrapers::new(size, clues, givens)
}

/// Opens and parses a puzzle file.
///
/// # Errors
///
/// See [`parse_skyscrapers`].
pub fn parse_skyscrapers_file<P: AsRef<Path>>(path: P) -> Result<Skyscrapers, DlxError> {
    let file = std::fs::File::open(path)?;
    parse_skyscrapers(io::BufReader::new(file))
}
