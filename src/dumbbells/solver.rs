use crate::dlx::{DlxError, ExactCover, Memo, SearchHooks};
use itertools::Itertools;
use std::fmt::Display;
use std::io::{self, BufRead};
use std::path::Path;

/// Direction of a piece's long axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// Ends to the left and right of the centre.
    Horizontal,
    /// Ends above and below the centre.
    Vertical,
}

/// Cells to cover and pieces to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Requirement {
    /// The cell is covered. Mandatory for marked cells, optional for the rest.
    Cell {
        /// 0-based column.
        x: usize,
        /// 0-based row.
        y: usize,
    },
    /// The piece with this number is on the grid.
    Piece(usize),
}

/// A piece centred on `x`, `y`, covering that cell and its two neighbours along
/// `orientation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    /// Piece number, from 1.
    pub piece: usize,
    /// 0-based column of the centre.
    pub x: usize,
    /// 0-based row of the centre.
    pub y: usize,
    /// Direction of the long axis.
    pub orientation: Orientation,
}

impl Placement {
    /// The three cells covered, end, centre, end. `None` when an end would fall off
    /// the top or left edge.
    #[must_use]
    pub fn cells(self) -> Option<[(usize, usize); 3]> {
        let Self { x, y, .. } = self;
        match self.orientation {
            Orientation::Horizontal => Some([(x.checked_sub(1)?, y), (x, y), (x + 1, y)]),
            Orientation::Vertical => Some([(x, y.checked_sub(1)?), (x, y), (x, y + 1)]),
        }
    }

    fn requirements(self) -> Option<[Requirement; 4]> {
        let [(x0, y0), (x1, y1), (x2, y2)] = self.cells()?;
        Some([
            Requirement::Cell { x: x0, y: y0 },
            Requirement::Cell { x: x1, y: y1 },
            Requirement::Cell { x: x2, y: y2 },
            Requirement::Piece(self.piece),
        ])
    }
}

/// A grid of free and marked cells plus the number of pieces to place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dumbbells {
    pieces: usize,
    marked: Vec<Vec<bool>>,
}

impl Dumbbells {
    /// `marked[y][x]` is true for cells that must be covered by a piece end.
    ///
    /// # Errors
    ///
    /// [`DlxError::InvalidPuzzle`] for an empty or ragged grid.
    pub fn new(pieces: usize, marked: Vec<Vec<bool>>) -> Result<Self, DlxError> {
        let width = marked.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(DlxError::InvalidPuzzle("grid is empty".to_owned()));
        }
        if let Some(row) = marked.iter().position(|row| row.len() != width) {
            return Err(DlxError::InvalidPuzzle(format!(
                "grid row {} has {} cells, expected {width}",
                row + 1,
                marked[row].len()
            )));
        }
        Ok(Self { pieces, marked })
    }

    /// Columns in the grid.
    #[must_use]
    pub fn width(&self) -> usize {
        self.marked.first().map_or(0, Vec::len)
    }

    /// Rows in the grid.
    #[must_use]
    pub fn height(&self) -> usize {
        self.marked.len()
    }

    /// Builds the exact cover problem.
    ///
    /// Every piece and every marked cell is mandatory; unmarked cells are optional.
    /// A piece may not be centred on a marked cell or on a corner, and must fit on the
    /// grid.
    ///
    /// # Errors
    ///
    /// Never in practice; the construction is checked by [`ExactCover`].
    pub fn to_problem(&self) -> Result<ExactCover<Requirement, Placement>, DlxError> {
        let (width, height) = (self.width(), self.height());
        let cells = (0..height).cartesian_product(0..width).collect_vec();

        let (marked, free): (Vec<_>, Vec<_>) = cells
            .iter()
            .partition(|&&(y, x)| self.marked[y][x]);
        let cell = |&(y, x): &(usize, usize)| Requirement::Cell { x, y };

        let mandatory = (1..=self.pieces)
            .map(Requirement::Piece)
            .chain(marked.into_iter().map(cell));
        let optional = free.into_iter().map(cell);

        let actions = cells
            .iter()
            .filter(|&&(y, x)| !self.marked[y][x])
            .flat_map(|&(y, x)| {
                let x_side = x == 0 || x == width - 1;
                let y_side = y == 0 || y == height - 1;
                let orientations = [
                    (!x_side).then_some(Orientation::Horizontal),
                    (!y_side).then_some(Orientation::Vertical),
                ];
                (1..=self.pieces)
                    .cartesian_product(orientations.into_iter().flatten())
                    .filter_map(move |(piece, orientation)| {
                        let placement = Placement {
                            piece,
                            x,
                            y,
                            orientation,
                        };
                        Some((placement, placement.requirements()?))
                    })
            });

        ExactCover::from_parts(mandatory, actions, optional)
    }

    /// Lays a solution out on the grid. Cells off the grid are ignored.
    #[must_use]
    pub fn decode(&self, solution: &[Placement]) -> Layout {
        let mut grid = vec![vec!['.'; self.width()]; self.height()];
        for placement in solution {
            let Some([start, centre, end]) = placement.cells() else {
                continue;
            };
            let centre_mark = match placement.orientation {
                Orientation::Horizontal => '-',
                Orientation::Vertical => '|',
            };
            for ((x, y), mark) in [(start, 'o'), (centre, centre_mark), (end, 'o')] {
                if let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                    *cell = mark;
                }
            }
        }
        Layout(grid)
    }
}

impl Display for Dumbbells {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} piece(s)", self.pieces)?;
        let lines = self.marked.iter().map(|row| {
            row.iter()
                .map(|&marked| if marked { 'o' } else { '.' })
                .collect::<String>()
        });
        write!(f, "{}", lines.format("\n"))
    }
}

/// A solved grid: `o` piece ends, `-`/`|` piece centres, `.` uncovered floor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout(pub Vec<Vec<char>>);

impl Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines = self.0.iter().map(|row| row.iter().collect::<String>());
        write!(f, "{}", lines.format("\n"))
    }
}

/// Skips placements that only differ from an already explored one by piece number.
///
/// Each placement is remembered by position and orientation; trying the same spot
/// again with another piece at the same depth is pruned.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipSwappedPieces;

impl SearchHooks<Placement> for SkipSwappedPieces {
    type Token = (usize, usize, Orientation);

    fn on_row_selected(&mut self, placement: &Placement, memo: &mut Memo<Self::Token>) {
        memo.remember((placement.x, placement.y, placement.orientation));
    }
}

/// Parses a puzzle: the number of pieces on the first line, then the grid with `o`
/// marking cells a piece end must cover.
///
/// # Errors
///
/// [`DlxError::Parse`] for a bad piece count, and the errors of [`Dumbbells::new`].
pub fn parse_dumbbells<B: BufRead>(reader: B) -> Result<Dumbbells, DlxError> {
    let mut lines = reader.lines().enumerate();

    let pieces = loop {
        let Some((index, line)) = lines.next() else {
            return Err(DlxError::parse(1, "missing piece count"));
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        break trimmed
            .parse::<usize>()
            .map_err(|e| DlxError::parse(index + 1, format!("bad piece count: {e}")))?;
    };

    let mut marked = Vec::new();
    for (_, line) in lines {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            marked.push(trimmed.chars().map(|c| c == 'o').collect());
        }
    }

    Dumbbells::new(pieces, marked)
}

/// Opens and parses a puzzle file.
///
/// # Errors
///
/// See [`parse_dumbbells`].
pub fn parse_dumbbells_file<P: AsRef<Path>>(path: P) -> Result<Dumbbells, DlxError> {
    let file = std::fs::File::open(path)?;
    parse_dumbbells(io::BufReader::new(file))
}
